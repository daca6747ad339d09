use anyhow::{Context, Result};
use faceroc_vision::{preprocess::DEFAULT_INPUT_SIZE, InputSpec, TensorLayout};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub static CONFIG_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("FACEROC_CONFIG_PATH").unwrap_or("faceroc.toml"))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model_path: PathBuf,
    pub data_dir: PathBuf,
    pub same_dir: String,
    pub diff_dir: String,
    pub input_width: u32,
    pub input_height: u32,
    pub layout: TensorLayout,
    pub chart_path: PathBuf,
    pub output_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/facenet.onnx"),
            data_dir: PathBuf::from("data"),
            same_dir: "same".to_string(),
            diff_dir: "diff".to_string(),
            input_width: DEFAULT_INPUT_SIZE,
            input_height: DEFAULT_INPUT_SIZE,
            layout: TensorLayout::Nhwc,
            chart_path: PathBuf::from("roc.svg"),
            output_path: None,
        }
    }
}

impl Config {
    pub fn input_spec(&self) -> InputSpec {
        InputSpec {
            width: self.input_width,
            height: self.input_height,
            layout: self.layout,
        }
    }

    /// Size of the blank image substituted for a missing file.
    pub fn placeholder_size(&self) -> (u32, u32) {
        (self.input_width, self.input_height)
    }
}

/// Load the config, falling back to defaults when the file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn to_toml(cfg: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
