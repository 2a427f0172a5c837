pub mod app;
pub mod config;
pub mod models;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use services::FileServiceClient;
