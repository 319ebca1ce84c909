use crate::errors::ApiError;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_VK_PATH: &str = "data/verification_key.json";
pub const DEFAULT_MAX_BATCH_SIZE: usize = 64;

/// Start-up settings, read once from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub addr: String,
    /// A `.json` file is read as a snarkjs `verification_key.json`, anything else as the binary layout.
    pub vk_path: PathBuf,
    pub max_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ApiError> {
        let addr = env::var("BACKEND_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let vk_path = env::var("VK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_VK_PATH));
        let max_batch_size = match env::var("MAX_BATCH_SIZE") {
            Ok(raw) => parse_batch_size(&raw)?,
            Err(_) => DEFAULT_MAX_BATCH_SIZE,
        };

        Ok(Self {
            addr,
            vk_path,
            max_batch_size,
        })
    }

    pub fn vk_is_json(&self) -> bool {
        self.vk_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

fn parse_batch_size(raw: &str) -> Result<usize, ApiError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ApiError::Config("MAX_BATCH_SIZE must be at least 1".to_string())),
        Ok(n) => Ok(n),
        Err(_) => Err(ApiError::Config(format!("MAX_BATCH_SIZE is not a number: {raw:?}"))),
    }
}
