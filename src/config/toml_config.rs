use crate::core::source::is_remote_input;
use crate::core::ConfigProvider;
use crate::domain::sample::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_provider, validate_required_field, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const DEFAULT_DATA_PATH: &str = "data";
const DEFAULT_OUTPUT_FILE: &str = "datos_procesados.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local file when present, sample data otherwise.
    #[default]
    Auto,
    File,
    Url,
    Sample,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    pub input: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleConfig {
    pub size: Option<usize>,
    pub seed: Option<u64>,
    pub save_raw: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadConfig {
    pub data_path: Option<String>,
    pub output_file: Option<String>,
    pub summary_file: Option<String>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Option<Regex>> = OnceLock::new();
        let Some(re) = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok())
            .as_ref()
        else {
            return content.to_string();
        };

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.source.kind {
            SourceKind::File => {
                let input = validate_required_field("source.input", &self.source.input)?;
                if is_remote_input(input) {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "source.input".to_string(),
                        value: input.to_string(),
                        reason: "kind \"file\" expects a local path, use kind \"url\" for remote CSV"
                            .to_string(),
                    });
                }
            }
            SourceKind::Url => {
                let input = validate_required_field("source.input", &self.source.input)?;
                validate_url("source.input", input)?;
            }
            SourceKind::Auto | SourceKind::Sample => {}
        }

        validate_provider(self)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn data_path(&self) -> &str {
        self.load.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH)
    }

    fn input_file(&self) -> Option<&str> {
        match self.source.kind {
            SourceKind::Sample => None,
            _ => self.source.input.as_deref(),
        }
    }

    fn output_file(&self) -> &str {
        self.load.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn summary_file(&self) -> Option<&str> {
        self.load.summary_file.as_deref()
    }

    fn archive_output(&self) -> bool {
        self.load.archive.unwrap_or(false)
    }

    fn sample_size(&self) -> usize {
        self.sample.size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }

    fn sample_seed(&self) -> u64 {
        self.sample.seed.unwrap_or(DEFAULT_SEED)
    }

    fn save_raw_sample(&self) -> bool {
        self.sample.save_raw.unwrap_or(false)
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn fallback_to_sample(&self) -> bool {
        self.source.kind == SourceKind::Auto
    }
}

impl Validate for TomlConfig {
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
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[pipeline]
name = "taller"
version = "1.0.0"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "taller");
        assert_eq!(config.source.kind, SourceKind::Auto);
        assert_eq!(config.data_path(), "data");
        assert_eq!(config.output_file(), "datos_procesados.csv");
        assert_eq!(config.sample_size(), 1000);
        assert_eq!(config.sample_seed(), 42);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pipeline]
name = "taller"
description = "Producción mensual"
version = "1.0.0"

[source]
kind = "file"
input = "data/raw/trabajos.csv"
timeout_seconds = 20

[sample]
size = 200
seed = 7
save_raw = true

[load]
data_path = "salida"
output_file = "trabajos.csv"
summary_file = "resumen.json"
archive = true

[monitoring]
enabled = true
json_logs = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input_file(), Some("data/raw/trabajos.csv"));
        assert_eq!(config.request_timeout_seconds(), Some(20));
        assert_eq!(config.sample_size(), 200);
        assert!(config.save_raw_sample());
        assert_eq!(config.data_path(), "salida");
        assert_eq!(config.summary_file(), Some("resumen.json"));
        assert!(config.archive_output());
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_kind_ignores_input() {
        let toml_content = r#"
[pipeline]
name = "t"
version = "1"

[source]
kind = "sample"
input = "ignored.csv"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.input_file().is_none());
        assert!(!config.fallback_to_sample());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("IMPRENTA_TEST_INPUT", "https://datos.example.com/trabajos.csv");

        let toml_content = r#"
[pipeline]
name = "t"
version = "1"

[source]
kind = "url"
input = "${IMPRENTA_TEST_INPUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.input_file(),
            Some("https://datos.example.com/trabajos.csv")
        );
        assert!(config.validate().is_ok());

        std::env::remove_var("IMPRENTA_TEST_INPUT");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let substituted = TomlConfig::substitute_env_vars("input = \"${IMPRENTA_NOT_SET_ANYWHERE}\"");
        assert_eq!(substituted, "input = \"${IMPRENTA_NOT_SET_ANYWHERE}\"");
    }

    #[test]
    fn test_config_validation() {
        let missing_input = r#"
[pipeline]
name = "t"
version = "1"

[source]
kind = "file"
"#;
        let config = TomlConfig::from_toml_str(missing_input).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));

        let bad_url = r#"
[pipeline]
name = "t"
version = "1"

[source]
kind = "url"
input = "ftp://example.com/trabajos.csv"
"#;
        let config = TomlConfig::from_toml_str(bad_url).unwrap();
        assert!(config.validate().is_err());

        let url_as_file = r#"
[pipeline]
name = "t"
version = "1"

[source]
kind = "file"
input = "https://example.com/trabajos.csv"
"#;
        let config = TomlConfig::from_toml_str(url_as_file).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { field, .. }) if field == "source.input"
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[pipeline\nname = ");
        assert!(matches!(
            result,
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[pipeline]\nname = \"file-test\"\nversion = \"1.0\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }
}
