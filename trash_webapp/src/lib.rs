mod render;
mod routes;
mod server;
mod session;
mod telemetry;
mod upload;

#[cfg(test)]
mod test_support;

pub mod app;
pub mod config;

pub use app::start_app;
