pub mod toml_config;

use crate::domain::model::{DuplicatePolicy, Namespace, DEFAULT_NOISY_FIELD};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

pub use toml_config::TomlConfig;

pub const DEFAULT_BETA_ROOT: &str = "/var/www/cells-beta";
pub const DEFAULT_TEST_ROOT: &str = "/var/www/cells-test";
pub const DEFAULT_MANIFEST_FILE: &str = "dataset.json";

/// Where each namespace's manifests live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRoots {
    pub beta: PathBuf,
    pub test: PathBuf,
}

impl NamespaceRoots {
    pub fn new(beta: impl Into<PathBuf>, test: impl Into<PathBuf>) -> Self {
        Self {
            beta: beta.into(),
            test: test.into(),
        }
    }

    pub fn get(&self, namespace: Namespace) -> &Path {
        match namespace {
            Namespace::Beta => &self.beta,
            Namespace::Test => &self.test,
        }
    }
}

impl Default for NamespaceRoots {
    fn default() -> Self {
        Self::new(DEFAULT_BETA_ROOT, DEFAULT_TEST_ROOT)
    }
}

/// Fully resolved settings: CLI flags over TOML file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub roots: NamespaceRoots,
    pub manifest_file: String,
    pub noisy_fields: Vec<String>,
    pub names_only: bool,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roots: NamespaceRoots::default(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            noisy_fields: vec![DEFAULT_NOISY_FIELD.to_string()],
            names_only: false,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl ConfigProvider for Settings {
    fn namespace_root(&self, namespace: Namespace) -> &Path {
        self.roots.get(namespace)
    }

    fn manifest_file(&self) -> &str {
        &self.manifest_file
    }

    fn noisy_fields(&self) -> &[String] {
        &self.noisy_fields
    }

    fn names_only(&self) -> bool {
        self.names_only
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        for namespace in [Namespace::Beta, Namespace::Test] {
            let root = self.roots.get(namespace).to_string_lossy();
            validation::validate_path(&format!("namespaces.{}", namespace), &root)?;
        }
        validation::validate_path("namespaces.manifest_file", &self.manifest_file)?;
        validation::validate_file_extension("namespaces.manifest_file", &self.manifest_file, &["json"])?;
        validation::validate_non_empty_list("compare.noisy_fields", &self.noisy_fields)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::{Settings, TomlConfig};
    use crate::domain::model::DuplicatePolicy;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Default, Parser)]
    #[command(name = "dataset-diff")]
    #[command(about = "Compare dataset manifests between the beta and test deployments")]
    pub struct CliConfig {
        /// Actually run the comparison
        #[arg(long)]
        pub run: bool,

        /// Only print the names of datasets that differ
        #[arg(long)]
        pub names_only: bool,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Root directory of the beta deployment
        #[arg(long)]
        pub beta_root: Option<PathBuf>,

        /// Root directory of the test deployment
        #[arg(long)]
        pub test_root: Option<PathBuf>,

        /// Field whose differences are reported without values (repeatable)
        #[arg(long = "noisy-field")]
        pub noisy_fields: Vec<String>,

        /// Let later sub-datasets replace earlier ones with the same name
        #[arg(long)]
        pub allow_duplicates: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 合併設定：命令列 > TOML 檔 > 預設值
        pub fn resolve(&self) -> Result<Settings> {
            let mut settings = match &self.config {
                Some(path) => TomlConfig::from_file(path)?.into_settings(),
                None => Settings::default(),
            };

            if let Some(beta) = &self.beta_root {
                settings.roots.beta = beta.clone();
            }
            if let Some(test) = &self.test_root {
                settings.roots.test = test.clone();
            }
            if !self.noisy_fields.is_empty() {
                settings.noisy_fields = self.noisy_fields.clone();
            }
            if self.names_only {
                settings.names_only = true;
            }
            if self.allow_duplicates {
                settings.duplicate_policy = DuplicatePolicy::LastWins;
            }

            settings.validate()?;
            Ok(settings)
        }
    }

}
