use std::{env, path::PathBuf};

use color_eyre::{Result, eyre::Context};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

pub const DEFAULT_MASK_CHAR: char = '•';

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Settings for the login page
#[derive(Clone, Debug, Deserialize)]
pub struct LoginConfig {
    #[serde(default)]
    mask_char: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            mask_char: DEFAULT_MASK_CHAR.to_string(),
        }
    }
}

impl LoginConfig {
    /// Symbol drawn in place of each hidden password character.
    /// Only the first character of the configured value is used.
    pub fn mask_char(&self) -> char {
        self.mask_char.chars().next().unwrap_or(DEFAULT_MASK_CHAR)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

impl Config {
    /// Layers, lowest priority first: built-in defaults, `config.*` in the
    /// config directory (optional, any format the `config` crate knows), CLI.
    pub fn new(cli_source: Option<crate::cli::ClapSource>) -> Result<Self> {
        let data_dir = get_data_dir();
        let config_dir = cli_source
            .as_ref()
            .and_then(|cli| cli.config_dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(get_config_dir);

        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .set_default("login.mask_char", DEFAULT_MASK_CHAR.to_string())?
            .add_source(config::File::from(config_dir.join("config")).required(false));

        // Add CLI source last (highest priority)
        if let Some(cli_source) = cli_source {
            builder = builder.add_source(cli_source);
        }

        let cfg: Self = builder
            .build()
            .context("Error building config")?
            .try_deserialize()
            .context("Error deserialize config")?;

        Ok(cfg)
    }
}

fn dir_from_env(suffix: &str) -> Option<PathBuf> {
    env::var(format!("{}_{}", PROJECT_NAME.clone(), suffix))
        .ok()
        .map(PathBuf::from)
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = dir_from_env("DATA") {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = dir_from_env("CONFIG") {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "medi-center", env!("CARGO_PKG_NAME"))
}
