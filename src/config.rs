use crate::error::Result;
use crate::session::ScanSettings;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "lamp-analyzer";
const ENV_PREFIX: &str = "LAMP";

/// Which frame-to-sample reduction the session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    Random,
    MeanPixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub frame_count: usize,
    pub frame_interval_ms: u64,
    pub sampler: SamplerKind,
    pub pixel_stride: u32,
    pub log_level: String,
    pub output: OutputFormat,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            frame_count: 30,
            frame_interval_ms: 33,
            sampler: SamplerKind::Random,
            pixel_stride: 4,
            log_level: "info".to_string(),
            output: OutputFormat::Text,
            frame_width: 64,
            frame_height: 36,
        }
    }
}

impl Configuration {
    /// Defaults, then the config file (explicit path, or an optional
    /// `lamp-analyzer.*` in the working directory), then `LAMP_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let builder = config::Config::builder()
            .add_source(file)
            .add_source(Self::environment());
        Self::from_builder(builder)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).try_parsing(true)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let configuration = builder.build()?.try_deserialize::<Configuration>()?;
        Ok(configuration)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings::default()
            .frame_count(self.frame_count)
            .frame_interval(self.frame_interval())
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO)
    }
}
