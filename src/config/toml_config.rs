use crate::config::{Settings, DEFAULT_MANIFEST_FILE};
use crate::domain::model::{DuplicatePolicy, DEFAULT_NOISY_FIELD};
use crate::utils::error::{ReconcileError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub namespaces: NamespacesConfig,
    pub compare: Option<CompareConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacesConfig {
    pub beta: String,
    pub test: String,
    pub manifest_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    pub noisy_fields: Option<Vec<String>>,
    pub names_only: Option<bool>,
    pub duplicate_policy: Option<DuplicatePolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReconcileError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReconcileError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CELLS_BETA_ROOT})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReconcileError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn noisy_fields(&self) -> Vec<String> {
        self.compare
            .as_ref()
            .and_then(|c| c.noisy_fields.clone())
            .unwrap_or_else(|| vec![DEFAULT_NOISY_FIELD.to_string()])
    }

    pub fn names_only(&self) -> bool {
        self.compare.as_ref().and_then(|c| c.names_only).unwrap_or(false)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.compare
            .as_ref()
            .and_then(|c| c.duplicate_policy)
            .unwrap_or_default()
    }

    pub fn into_settings(self) -> Settings {
        let noisy_fields = self.noisy_fields();
        let names_only = self.names_only();
        let duplicate_policy = self.duplicate_policy();

        Settings {
            roots: crate::config::NamespaceRoots::new(self.namespaces.beta, self.namespaces.test),
            manifest_file: self
                .namespaces
                .manifest_file
                .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string()),
            noisy_fields,
            names_only,
            duplicate_policy,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[namespaces]
beta = "/data/beta"
test = "/data/test"

[compare]
noisy_fields = ["metaFields", "quickGenes"]
names_only = true
duplicate_policy = "last_wins"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.namespaces.beta, "/data/beta");
        assert!(config.names_only());
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::LastWins);
        assert_eq!(config.noisy_fields(), vec!["metaFields", "quickGenes"]);
    }

    #[test]
    fn test_defaults_when_compare_section_missing() {
        let toml_content = r#"
[namespaces]
beta = "/data/beta"
test = "/data/test"
"#;

        let settings = TomlConfig::from_toml_str(toml_content).unwrap().into_settings();

        assert_eq!(settings.manifest_file, "dataset.json");
        assert_eq!(settings.noisy_fields, vec!["metaFields"]);
        assert!(!settings.names_only);
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RECONCILER_TEST_BETA_ROOT", "/mnt/beta");

        let toml_content = r#"
[namespaces]
beta = "${RECONCILER_TEST_BETA_ROOT}"
test = "${RECONCILER_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.namespaces.beta, "/mnt/beta");
        assert_eq!(config.namespaces.test, "${RECONCILER_TEST_UNSET_VAR}");

        std::env::remove_var("RECONCILER_TEST_BETA_ROOT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[namespaces]
beta = ""
test = "/data/test"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[namespaces]
beta = "/data/beta"
test = "/data/test"
manifest_file = "dataset.yaml"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[namespaces]
beta = "/data/beta"
test = "/data/test"

[compare]
noisy_fields = []
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = TomlConfig::from_toml_str("[namespaces]\nbeta = ");
        assert!(matches!(
            result,
            Err(ReconcileError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[namespaces]
beta = "/file/beta"
test = "/file/test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let settings = TomlConfig::from_file(temp_file.path()).unwrap().into_settings();
        assert_eq!(settings.roots.beta, PathBuf::from("/file/beta"));
        assert_eq!(settings.roots.test, PathBuf::from("/file/test"));
    }
}
