use crate::core::layout::LayoutSettings;
use crate::utils::error::{FoodgramError, Result};
use crate::utils::validation::{
    parse_hex_color, validate_hex_color, validate_non_empty_string, validate_path,
    validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodgramConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub document: DocumentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_max_age_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_max_age_seconds: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub fixtures_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub font_path: Option<PathBuf>,
    pub background_color: String,
    pub header_color: String,
    pub header_prefix: String,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub min_font_size: f32,
    pub footer_font_size: f32,
    pub max_line_width: f32,
    pub line_height: f32,
    pub footer_lines: Vec<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let layout = LayoutSettings::default();
        Self {
            font_path: None,
            background_color: "#D1E6FA".to_string(),
            header_color: "#007FFF".to_string(),
            header_prefix: layout.header_prefix,
            header_font_size: layout.header_font_size,
            body_font_size: layout.body_font_size,
            min_font_size: layout.min_body_font_size,
            footer_font_size: layout.footer_font_size,
            max_line_width: layout.max_line_width,
            line_height: layout.line_height,
            footer_lines: layout.footer_lines,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSON lines instead of the compact console format.
    pub json: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

/// A `${VAR}` left in a path means the variable was not set when the file was loaded.
fn validate_resolved_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    validate_path(field_name, &text)?;

    if let Some(caps) = env_var_pattern().captures(&text) {
        return Err(FoodgramError::MissingConfigError {
            field: format!("{} (environment variable {} is not set)", field_name, &caps[1]),
        });
    }
    Ok(())
}

impl FoodgramConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FoodgramError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FoodgramError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FOODGRAM_PORT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;

        if let Some(path) = &self.store.fixtures_path {
            validate_resolved_path("store.fixtures_path", path)?;
        }

        let doc = &self.document;
        if let Some(path) = &doc.font_path {
            validate_resolved_path("document.font_path", path)?;
        }
        validate_hex_color("document.background_color", &doc.background_color)?;
        validate_hex_color("document.header_color", &doc.header_color)?;
        validate_positive_number("document.header_font_size", doc.header_font_size)?;
        validate_positive_number("document.footer_font_size", doc.footer_font_size)?;
        validate_positive_number("document.max_line_width", doc.max_line_width)?;
        validate_positive_number("document.line_height", doc.line_height)?;
        validate_positive_number("document.min_font_size", doc.min_font_size)?;
        validate_range(
            "document.body_font_size",
            doc.body_font_size,
            doc.min_font_size,
            f32::MAX,
        )?;

        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn layout_settings(&self) -> Result<LayoutSettings> {
        let doc = &self.document;
        Ok(LayoutSettings {
            background: parse_hex_color("document.background_color", &doc.background_color)?
                .into(),
            header_color: parse_hex_color("document.header_color", &doc.header_color)?.into(),
            header_prefix: doc.header_prefix.clone(),
            header_font_size: doc.header_font_size,
            body_font_size: doc.body_font_size,
            min_body_font_size: doc.min_font_size,
            footer_font_size: doc.footer_font_size,
            max_line_width: doc.max_line_width,
            line_height: doc.line_height,
            footer_lines: doc.footer_lines.clone(),
            ..LayoutSettings::default()
        })
    }
}

impl Validate for FoodgramConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
