use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub seoul_api_key: String,
    pub kakao_rest_api_key: String,
    pub dataset_name: String,
    pub contract_year: u32,
    pub district_code_path: String,
    pub page_size: u64,
    pub page_delay_ms: u64,
    pub cache_ttl_seconds: u64,
    pub fail_fast: bool,
    pub export_dir: Option<String>,
    pub seoul_base_url: Option<String>,
    pub kakao_base_url: Option<String>,
}

pub fn create_test_config() -> Config {
    Config {
        seoul_api_key: "xxx".to_string(),
        kakao_rest_api_key: "xxx".to_string(),
        dataset_name: "tbLnOpendataRentV".to_string(),
        contract_year: 2025,
        district_code_path: "code.csv".to_string(),
        page_size: 1000,
        page_delay_ms: 0,
        cache_ttl_seconds: 3600,
        fail_fast: false,
        export_dir: None,
        seoul_base_url: None,
        kakao_base_url: None,
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
