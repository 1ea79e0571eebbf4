use std::fmt;
use std::path::{Path, PathBuf};

mod file;

pub use file::{CloudSection, ConfigFile, LocalSection};

pub const DEFAULT_HOST: &str = "http://localhost:8000";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Where a command sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Local {
        host: String,
        region: String,
    },
    /// Unset fields fall back to the AWS provider chain.
    Cloud {
        region: Option<String>,
        profile: Option<String>,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Local { host, region } => {
                write!(f, "Local DynamoDB ({host}, region: {region})")
            }
            Target::Cloud { region, profile } => write!(
                f,
                "AWS DynamoDB (region: {}, profile: {})",
                region.as_deref().unwrap_or("default"),
                profile.as_deref().unwrap_or("default")
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct Config {
    file: ConfigFile,
}

impl Config {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Self {
        Self {
            file: ConfigFile::new(path),
        }
    }

    /// Resolves the local instance. Arguments already carry flag and env values.
    pub fn local_target(&self, host: Option<String>, region: Option<String>) -> Target {
        let section = self.file.local.clone().unwrap_or_default();
        Target::Local {
            host: host
                .or(section.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            region: region
                .or(section.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }

    pub fn cloud_target(&self, region: Option<String>, profile: Option<String>) -> Target {
        let section = self.file.cloud.clone().unwrap_or_default();
        Target::Cloud {
            region: region.or(section.region),
            profile: profile.or(section.profile),
        }
    }

    /// Export path: the explicit one, or `<table>.json` under `output_dir`.
    pub fn output_path(&self, table_name: &str, output: Option<PathBuf>) -> PathBuf {
        output.unwrap_or_else(|| {
            let file_name = format!("{table_name}.json");
            match self.file.output_dir.as_ref() {
                Some(dir) => Path::new(dir).join(file_name),
                None => PathBuf::from(file_name),
            }
        })
    }
}
