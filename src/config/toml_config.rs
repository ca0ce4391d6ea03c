use crate::utils::error::{RadarError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_LISTINGS_BASE_URL: &str = "https://www.indeed.com";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub llm: LlmConfig,
    pub scrape: ScrapeConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            timeout_seconds: 60,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub pages: usize,
    pub location: String,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LISTINGS_BASE_URL.to_string(),
            pages: 2,
            location: String::new(),
            min_delay_ms: 2000,
            max_delay_ms: 5000,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub keywords: usize,
    pub top_n: usize,
    pub chart_top_n: usize,
    pub discover_new_skills: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keywords: 5,
            top_n: 50,
            chart_top_n: 30,
            discover_new_skills: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub bundle: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "output".to_string(),
            bundle: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: bool,
}

impl RadarConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RadarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GROQ_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RadarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key from the file, or `GROQ_API_KEY` when the file has none.
    /// Unsubstituted `${...}` placeholders count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.llm
            .api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
            .cloned()
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_endpoint("llm.base_url", &self.llm.base_url)?;
        validation::validate_name("llm.model", &self.llm.model)?;
        validation::validate_count("llm.max_retries", self.llm.max_retries as usize, 1, 10)?;

        validation::validate_endpoint("scrape.base_url", &self.scrape.base_url)?;
        validation::validate_count("scrape.pages", self.scrape.pages, 1, 100)?;
        validation::validate_delay_window(self.scrape.min_delay_ms, self.scrape.max_delay_ms)?;

        validation::validate_count("analysis.keywords", self.analysis.keywords, 1, 50)?;
        validation::validate_count("analysis.top_n", self.analysis.top_n, 1, usize::MAX)?;
        validation::validate_count("analysis.chart_top_n", self.analysis.chart_top_n, 1, usize::MAX)?;

        validation::validate_output_dir("output.output_path", &self.output.output_path)?;

        validation::require_api_key(API_KEY_ENV, &self.resolved_api_key())?;

        Ok(())
    }
}

impl Validate for RadarConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[llm]
api_key = "test-key"

[scrape]
pages = 4
location = "Remote"

[analysis]
keywords = 3
"#;

        let config = RadarConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.scrape.pages, 4);
        assert_eq!(config.scrape.location, "Remote");
        assert_eq!(config.analysis.keywords, 3);
        // 未指定的欄位使用預設值
        assert_eq!(config.llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(config.analysis.top_n, 50);
        assert_eq!(config.output_path(), "output");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RADAR_TEST_LISTINGS_URL", "https://listings.test");

        let toml_content = r#"
[scrape]
base_url = "${RADAR_TEST_LISTINGS_URL}"
"#;

        let config = RadarConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.scrape.base_url, "https://listings.test");

        std::env::remove_var("RADAR_TEST_LISTINGS_URL");
    }

    #[test]
    fn test_invalid_delays_rejected() {
        let toml_content = r#"
[llm]
api_key = "test-key"

[scrape]
min_delay_ms = 500
max_delay_ms = 100
"#;

        let config = RadarConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsubstituted_placeholder_is_not_a_key() {
        let mut config = RadarConfig::default();
        config.llm.api_key = Some("${RADAR_TEST_UNSET_KEY_VARIABLE}".to_string());
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(config.resolved_api_key().is_none());
        }
        config.llm.api_key = Some("gsk_live".to_string());
        assert_eq!(config.resolved_api_key().as_deref(), Some("gsk_live"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
output_path = "./reports"
bundle = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = RadarConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./reports");
        assert!(config.output.bundle);
    }

    #[test]
    fn test_bundled_sample_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/skill-radar.toml");
        let config = RadarConfig::from_file(path).unwrap();

        assert_eq!(config.llm.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.analysis.chart_top_n, 30);
        assert!(config.llm.api_key.is_some());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RadarConfig::load_or_default("/nonexistent/skill-radar.toml").unwrap();
        assert_eq!(config.scrape.base_url, DEFAULT_LISTINGS_BASE_URL);
        assert_eq!(config.scrape.pages, 2);
    }
}
