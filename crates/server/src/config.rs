use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub env: Environment,
    pub data_path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    /// Base URL under which this instance is reachable, used when handing
    /// the caller their derived feed URL.
    pub public_url: String,
}

impl Config {
    pub fn new(
        env: Environment,
        data_path: impl AsRef<Path>,
        port: u16,
        public_url: Option<String>,
    ) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let database_url = format!("sqlite:{}?mode=rwc", data_path.join("recast.db").display());
        let public_url = public_url.unwrap_or_else(|| format!("http://localhost:{port}"));
        Self {
            env,
            data_path,
            database_url,
            max_connections: 5,
            public_url,
        }
    }

    /// The public URL at which a registered feed is served.
    pub fn feed_url(&self, id: &str) -> String {
        format!("{}/feed/{}", self.public_url.trim_end_matches('/'), id)
    }
}
