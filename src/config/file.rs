use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;
use validator::Validate;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub local: Option<LocalSection>,
    pub cloud: Option<CloudSection>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Validate)]
pub struct LocalSection {
    #[validate(url)]
    pub host: Option<String>,
    #[validate(length(min = 1))]
    pub region: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Validate)]
pub struct CloudSection {
    #[validate(length(min = 1))]
    pub region: Option<String>,
    #[validate(length(min = 1))]
    pub profile: Option<String>,
}

impl ConfigFile {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Self {
        path.map(read_config).unwrap_or_default()
    }
}

fn read_config<P: AsRef<Path>>(path: P) -> ConfigFile {
    _read_config(path).unwrap_or_else(|err| {
        warn!("{err}");
        warn!("Skip reading config file.");
        ConfigFile::default()
    })
}

fn _read_config<P: AsRef<Path>>(path: P) -> Result<ConfigFile, String> {
    let content = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read: {}. {err}", path.as_ref().to_string_lossy()))?;
    let config: ConfigFile = serde_yaml::from_str(&content)
        .map_err(|err| format!("Failed to deserialize config file: {err}"))?;

    if let Some(local) = config.local.as_ref() {
        local
            .validate()
            .map_err(|err| format!("Invalid `local` section: {err}"))?;
    }
    if let Some(cloud) = config.cloud.as_ref() {
        cloud
            .validate()
            .map_err(|err| format!("Invalid `cloud` section: {err}"))?;
    }

    Ok(config)
}
