use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_CONFIG_FILE: &str = "perfchart.toml";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Raster resolution of every written figure.
    pub dpi: u32,
    /// Sampling window of the network benchmark, used for cycles per byte.
    pub duration_seconds: f64,
    /// Thread count held fixed when sweeping message size.
    pub threads: u64,
    /// Message size held fixed when sweeping thread count.
    pub msg_size: u64,
    pub font_family: String,
    /// Replaces the dataset's own system description in figure annotations.
    pub system_info: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dpi: 150,
            duration_seconds: 10.0,
            threads: 4,
            msg_size: 16384,
            font_family: "sans-serif".into(),
            system_info: None,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `PERFCHART_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("PERFCHART_"))
            .extract()?)
    }
}
