use clap::Parser;
use color_eyre::Result;
use config::Source;

use crate::config::{get_config_dir, get_data_dir};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0, value_parser = parse_rate)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0, value_parser = parse_rate)]
    pub frame_rate: f64,

    /// Path to the data directory (logs are written here)
    #[arg(short, long, value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Path to the directory holding `config.toml` (or json5, yaml, ...)
    #[arg(short, long, value_name = "PATH")]
    pub config_dir: Option<String>,

    /// Symbol drawn for each password character while it is hidden
    #[arg(short, long, value_name = "CHAR")]
    pub mask_char: Option<char>,
}

/// A per-second rate; the terminal turns it into an interval, so it must be
/// positive and finite
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("rate must be a positive finite number, got `{s}`"))
    }
}

const VERSION_MESSAGE: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    let author = clap::crate_authors!();

    let data_dir_path = get_data_dir().display().to_string();
    let config_dir_path = get_config_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}

/// Command line overrides, the highest priority layer of [`crate::config::Config`]
#[derive(Debug, Clone, Default)]
pub(crate) struct ClapSource {
    pub data_dir: Option<String>,
    pub config_dir: Option<String>,
    pub mask_char: Option<char>,
}

impl ClapSource {
    pub fn new(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            config_dir: cli.config_dir.clone(),
            mask_char: cli.mask_char,
        }
    }
}

impl Source for ClapSource {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut map = config::Map::new();
        if let Some(data_dir) = &self.data_dir {
            map.insert(
                "data_dir".to_string(),
                config::Value::new(None, data_dir.clone()),
            );
        }
        if let Some(config_dir) = &self.config_dir {
            map.insert(
                "config_dir".to_string(),
                config::Value::new(None, config_dir.clone()),
            );
        }
        if let Some(mask_char) = self.mask_char {
            map.insert(
                "login.mask_char".to_string(),
                config::Value::new(None, mask_char.to_string()),
            );
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["medi_center"]);
        assert_eq!(cli.tick_rate, 4.0);
        assert_eq!(cli.frame_rate, 60.0);
        assert!(cli.mask_char.is_none());
        assert!(ClapSource::new(&cli).collect().unwrap().is_empty());
    }

    #[test]
    fn collects_overrides() {
        let cli = Cli::parse_from(["medi_center", "--data-dir", "/tmp/mc", "--mask-char", "*"]);
        let map = ClapSource::new(&cli).collect().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("login.mask_char").unwrap().clone().into_string().unwrap(),
            "*"
        );
        assert_eq!(
            map.get("data_dir").unwrap().clone().into_string().unwrap(),
            "/tmp/mc"
        );
    }

    #[test]
    fn rejects_unusable_rates() {
        for bad in ["0", "-1", "NaN", "inf", "fast"] {
            assert!(Cli::try_parse_from(["medi_center", "--tick-rate", bad]).is_err());
            assert!(Cli::try_parse_from(["medi_center", "--frame-rate", bad]).is_err());
        }
        let cli = Cli::try_parse_from(["medi_center", "-t", "0.5", "-f", "30"]).unwrap();
        assert_eq!(cli.tick_rate, 0.5);
        assert_eq!(cli.frame_rate, 30.0);
    }

    #[test]
    fn rejects_multi_char_mask() {
        assert!(Cli::try_parse_from(["medi_center", "--mask-char", "ab"]).is_err());
    }
}
