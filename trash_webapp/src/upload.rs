use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

const PREVIEW_SIZE: u32 = 320;

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// Extension and, when the client sent one, MIME type must both name JPEG or PNG.
    pub fn is_accepted_format(&self) -> bool {
        let extension_ok = std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);

        let mime_ok = match &self.content_type {
            Some(mime) if mime != "application/octet-stream" => {
                ACCEPTED_MIME_TYPES.contains(&mime.to_lowercase().as_str())
            }
            _ => true,
        };

        extension_ok && mime_ok
    }
}

/// Downscales the upload to fit `PREVIEW_SIZE` and encodes it as a PNG `data:` URI.
pub fn preview_data_uri(image: &DynamicImage) -> Result<String, image::ImageError> {
    let preview = image.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE);
    let mut png_data: Vec<u8> = Vec::new();
    preview.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png_data)))
}
