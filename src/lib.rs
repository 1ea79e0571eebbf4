pub mod cli;
pub mod client;
pub mod command;
pub mod config;
pub mod csv_parser;
pub mod error;
pub mod json;
pub mod model;
pub mod progress;
pub mod value;

pub use error::{Error, Result};

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_REGION: &str = "DB_REGION";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_AWS_PROFILE: &str = "AWS_PROFILE";
pub const ENV_CONFIG_PATH: &str = "DB_ASSISTANT_CONFIG";
