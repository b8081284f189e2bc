use crate::config::NamespaceRoots;
use crate::domain::model::{json_kind, Namespace, Record, DATASETS_KEY, NAME_KEY};
use crate::domain::ports::{ConfigProvider, RecordLoader};
use crate::utils::error::{ReconcileError, Result};
use std::path::{Component, Path, PathBuf};

/// Reads manifests laid out as `<root>/<manifest>` (the index) and
/// `<root>/<dataset name>/<manifest>` (one per dataset).
#[derive(Debug, Clone)]
pub struct FsLoader {
    roots: NamespaceRoots,
    manifest_file: String,
}

impl FsLoader {
    pub fn new(roots: NamespaceRoots, manifest_file: impl Into<String>) -> Self {
        Self {
            roots,
            manifest_file: manifest_file.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            NamespaceRoots::new(
                config.namespace_root(Namespace::Beta),
                config.namespace_root(Namespace::Test),
            ),
            config.manifest_file(),
        )
    }

    pub fn index_path(&self, namespace: Namespace) -> PathBuf {
        self.roots.get(namespace).join(&self.manifest_file)
    }

    /// Sub-dataset names such as `parent/child` resolve to nested directories.
    /// Names must stay inside the namespace root.
    pub fn record_path(&self, namespace: Namespace, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::ParentDir | Component::Prefix(_)));
        if name.is_empty() || escapes {
            return Err(ReconcileError::MalformedManifest {
                path: self.index_path(namespace).display().to_string(),
                reason: format!("dataset name '{}' must be a relative path inside the root", name),
            });
        }
        Ok(self.roots.get(namespace).join(relative).join(&self.manifest_file))
    }

    fn read_json(path: &Path) -> Result<serde_json::Value> {
        tracing::debug!("Reading manifest {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_record(path: &Path) -> Result<Record> {
        match Self::read_json(path)? {
            serde_json::Value::Object(map) => Ok(Record::from(map)),
            other => Err(ReconcileError::MalformedManifest {
                path: path.display().to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }
}

impl RecordLoader for FsLoader {
    fn dataset_names(&self, namespace: Namespace) -> Result<Vec<String>> {
        let path = self.index_path(namespace);
        let index = Self::read_record(&path)?;
        let malformed = |reason: String| ReconcileError::MalformedManifest {
            path: path.display().to_string(),
            reason,
        };

        let entries = index
            .sub_datasets()
            .ok_or_else(|| malformed(format!("index has no '{}' list", DATASETS_KEY)))?;

        // 索引裡的項目可以是字串，也可以是帶 name 的物件
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .as_str()
                    .or_else(|| entry.as_record().and_then(Record::name))
                    .map(str::to_string)
                    .ok_or_else(|| malformed(format!("entry {} has no '{}'", i, NAME_KEY)))
            })
            .collect()
    }

    fn load_record(&self, namespace: Namespace, name: &str) -> Result<Record> {
        Self::read_record(&self.record_path(namespace, name)?)
    }
}
