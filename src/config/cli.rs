use crate::config::FoodgramConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "foodgram")]
#[command(about = "Foodgram shopping list service")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override server.port from config
    #[arg(long)]
    pub port: Option<u16>,

    /// Override store.fixtures_path from config
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Override document.font_path from config
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入設定檔 (若有) 並套用命令列覆蓋
    pub fn load(&self) -> Result<FoodgramConfig> {
        let mut config = match &self.config {
            Some(path) => FoodgramConfig::from_file(path)?,
            None => FoodgramConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut FoodgramConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(fixtures) = &self.fixtures {
            config.store.fixtures_path = Some(fixtures.clone());
        }
        if let Some(font) = &self.font {
            config.document.font_path = Some(font.clone());
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = CliConfig::parse_from([
            "foodgram",
            "--port",
            "9000",
            "--fixtures",
            "data/fixtures.json",
            "--json-logs",
        ]);

        let config = cli.load().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.store.fixtures_path,
            Some(PathBuf::from("data/fixtures.json"))
        );
        assert!(config.logging.json);
        assert!(config.document.font_path.is_none());
    }

    #[test]
    fn test_logging_format_comes_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[logging]\njson = true\n").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = CliConfig::parse_from(["foodgram", "--config", path.as_str()]);
        assert!(!cli.json_logs);

        let config = cli.load().unwrap();
        assert!(config.logging.json);
    }
}
