use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub max_file_size: usize,
    pub chat_api_url: String,
    pub demo_username: String,
    pub demo_password: String,
}

pub fn load_config() -> Result<Config> {
    // Load .env file first
    dotenv().ok();

    let max_file_size = std::env::var("MAX_FILE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(default_max_file_size);

    let chat_api_url = std::env::var("CHAT_API_URL")
        .unwrap_or_else(|_| "http://localhost:8081/api/chat".to_string());

    // Demo credentials: a fixed compare, not an auth system
    let demo_username = std::env::var("DEMO_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let demo_password = std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "demo1234".to_string());

    Ok(Config {
        max_file_size,
        chat_api_url,
        demo_username,
        demo_password,
    })
}
