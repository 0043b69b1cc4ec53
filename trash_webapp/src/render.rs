use crate::session::Analysis;
use std::fmt::Write;
use trash_prediction::BinLabel;

const STYLE: &str = r#"
    body { font-family: sans-serif; max-width: 720px; margin: 0 auto; padding: 1rem; }
    .main-header { font-size: 2.5rem; color: #2E86AB; text-align: center; margin-bottom: 2rem; font-weight: bold; }
    .upload-section { border: 2px dashed #2E86AB; border-radius: 15px; padding: 2rem; text-align: center; margin: 2rem 0; background-color: #f8f9fa; }
    .result-badge { font-size: 1.3rem; padding: 0.5rem 1.5rem; border-radius: 20px; font-weight: bold; margin: 1rem 0; display: inline-block; color: white; }
    .confidence-track { background-color: #e9ecef; border-radius: 10px; height: 20px; }
    .confidence-fill { height: 100%; border-radius: 10px; transition: width 0.5s ease-in-out; }
    .refresh-button { background-color: #2E86AB; color: white; border: none; padding: 0.7rem 1.5rem; border-radius: 10px; font-size: 1rem; cursor: pointer; }
    .refresh-button:hover { background-color: #1a5a7a; }
    .error { color: #a94442; background-color: #f2dede; padding: 0.8rem; border-radius: 8px; }
    .warning { color: #8a6d3b; background-color: #fcf8e3; padding: 0.8rem; border-radius: 8px; }
    .info { color: #31708f; background-color: #d9edf7; padding: 0.8rem; border-radius: 8px; }
    .footer { text-align: center; color: #666; font-size: 0.9rem; }
"#;

pub struct Badge {
    pub color: &'static str,
    pub recommendation: &'static str,
}

pub fn badge(label: BinLabel) -> Badge {
    match label {
        BinLabel::Full => Badge {
            color: "#ff4444",
            recommendation: "Time to empty the bin!",
        },
        BinLabel::Empty => Badge {
            color: "#00C851",
            recommendation: "The bin can still be used.",
        },
    }
}

#[derive(Default)]
pub struct PageView<'a> {
    pub model_available: bool,
    pub model_downloadable: bool,
    pub analysis: Option<&'a Analysis>,
    pub error: Option<String>,
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_result(html: &mut String, analysis: &Analysis) -> std::fmt::Result {
    let verdict = &analysis.verdict;
    let badge = badge(verdict.label);

    write!(
        html,
        r#"<h3>Result</h3>
{preview}<p>Analyzed image: {name} ({width}&times;{height})</p>
<div style="text-align: center;">
  <div class="result-badge" style="background-color: {color};">Bin {label}</div>
</div>
<p><strong>Confidence: {confidence:.1}%</strong></p>
<div class="confidence-track"><div class="confidence-fill" style="width: {confidence:.1}%; background-color: {color};"></div></div>
<p><strong>Score:</strong> <code>{score:.3}</code></p>
<p class="info">{recommendation}</p>
<hr>
<form method="post" action="/reset" style="text-align: center;">
  <button class="refresh-button" type="submit">New analysis</button>
</form>
"#,
        preview = analysis
            .preview
            .as_deref()
            .map(|uri| format!(
                "<p style=\"text-align: center;\"><img src=\"{}\" alt=\"Analyzed image\" style=\"max-width: 100%;\"></p>\n",
                escape_html(uri)
            ))
            .unwrap_or_default(),
        name = escape_html(&analysis.file_name),
        width = analysis.width,
        height = analysis.height,
        color = badge.color,
        label = verdict.label.as_str().to_uppercase(),
        confidence = verdict.confidence_percent(),
        score = verdict.raw_score,
        recommendation = badge.recommendation,
    )
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut html, view);
    html
}

fn write_page(html: &mut String, view: &PageView) -> std::fmt::Result {
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Smart Trash Bin Detection</title>
<style>{STYLE}</style>
</head>
<body>
<div class="main-header">Trash Bin Detection</div>
"#
    )?;

    if !view.model_available {
        html.push_str(r#"<p class="error">The model is not available. Image analysis is disabled.</p>"#);
    }

    html.push_str(
        r#"<div class="upload-section">
<h3>Upload a picture of a trash bin</h3>
<p>Supported formats: JPG, JPEG, PNG</p>
<form method="post" action="/predict" enctype="multipart/form-data">
  <input type="file" name="image" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
"#,
    );
    if view.model_available {
        html.push_str(r#"  <button class="refresh-button" type="submit">Analyze</button>"#);
    } else {
        html.push_str(r#"  <button class="refresh-button" type="submit" disabled>Analyze</button>"#);
    }
    html.push_str("\n</form>\n</div>\n");

    if let Some(error) = &view.error {
        write!(html, "<p class=\"error\">{}</p>\n", escape_html(error))?;
    }

    if let Some(analysis) = view.analysis {
        render_result(html, analysis)?;
    }

    html.push_str("<hr>\n<h3>Download the model</h3>\n");
    if view.model_downloadable {
        html.push_str(r#"<p><a class="refresh-button" href="/model" download>Download the AI model</a></p>"#);
    } else {
        html.push_str(r#"<p class="warning">Model not available for download</p>"#);
    }

    html.push_str(
        r#"
<details>
<summary>Technical information</summary>
<p><strong>How to use:</strong></p>
<ol>
  <li>Take a picture of your trash bin</li>
  <li>Upload the image</li>
  <li>The classifier tells whether it is empty or full</li>
</ol>
<p><strong>Specifications:</strong></p>
<ul>
  <li>Architecture: EfficientNetB0</li>
  <li>Type: binary classification</li>
  <li>Input size: 224x224 pixels</li>
  <li>Format: ONNX</li>
</ul>
</details>
<hr>
<div class="footer">Smart trash bin detection | axum &amp; ONNX Runtime</div>
</body>
</html>
"#,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn analysis(score: f32) -> Analysis {
        test_support::analysis("<bin>.png", score)
    }

    #[test]
    fn test_full_bin_page() {
        let analysis = analysis(0.82);
        let html = render_page(&PageView {
            model_available: true,
            model_downloadable: true,
            analysis: Some(&analysis),
            error: None,
        });

        assert!(html.contains("#ff4444"));
        assert!(html.contains("Bin FULL"));
        assert!(html.contains("Confidence: 82.0%"));
        assert!(html.contains("<code>0.820</code>"));
        assert!(html.contains("Time to empty the bin!"));
        assert!(html.contains(r#"action="/reset""#));
        assert!(html.contains("&lt;bin&gt;.png"));
    }

    #[test]
    fn test_empty_bin_page() {
        let analysis = analysis(0.10);
        let html = render_page(&PageView {
            model_available: true,
            model_downloadable: true,
            analysis: Some(&analysis),
            error: None,
        });

        assert!(html.contains("#00C851"));
        assert!(html.contains("Bin EMPTY"));
        assert!(html.contains("Confidence: 90.0%"));
        assert!(html.contains("The bin can still be used."));
    }

    #[test]
    fn test_result_shows_preview() {
        let mut analysis = analysis(0.82);
        analysis.preview = Some("data:image/png;base64,AAAA".into());
        let html = render_page(&PageView {
            model_available: true,
            analysis: Some(&analysis),
            ..PageView::default()
        });

        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA" alt="Analyzed image""#));
    }

    #[test]
    fn test_initial_page_has_no_result() {
        let html = render_page(&PageView {
            model_available: true,
            model_downloadable: true,
            ..PageView::default()
        });

        assert!(!html.contains("result-badge\" style"));
        assert!(!html.contains(r#"action="/reset""#));
        assert!(html.contains(r#"href="/model""#));
    }

    #[test]
    fn test_unavailable_model_disables_analysis() {
        let html = render_page(&PageView::default());

        assert!(html.contains("The model is not available"));
        assert!(html.contains("disabled>Analyze"));
        assert!(html.contains("Model not available for download"));
    }
}
