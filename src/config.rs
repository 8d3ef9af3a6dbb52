use std::env;
use std::path::PathBuf;

// Validation constraints shared by the validators and the entity handlers.
pub const MAX_NAME_LENGTH: usize = 64;
pub const MAX_DESCRIPTION_LENGTH: usize = 128;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;
pub const MAX_DISPLAY_NAME_UPDATE_LENGTH: usize = 128;
pub const MAX_TEAM_MEMBERS: usize = 50;

#[derive(Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub bind_addr: String,
    pub frontend_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "db".to_string())
                .into(),
            export_dir: env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "out".to_string())
                .into(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}
