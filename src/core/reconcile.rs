use crate::core::diff::diff_records;
use crate::core::flatten::flatten;
use crate::domain::model::{Collection, DatasetDiff, DuplicatePolicy, Namespace, Report, DEFAULT_NOISY_FIELD};
use crate::domain::ports::{ConfigProvider, RecordLoader};
use crate::utils::error::{ReconcileError, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub noisy_fields: BTreeSet<String>,
    pub names_only: bool,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            noisy_fields: BTreeSet::from([DEFAULT_NOISY_FIELD.to_string()]),
            names_only: false,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl CompareOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            noisy_fields: config.noisy_fields().iter().cloned().collect(),
            names_only: config.names_only(),
            duplicate_policy: config.duplicate_policy(),
        }
    }
}

pub struct Reconciler<L: RecordLoader> {
    loader: L,
    options: CompareOptions,
}

impl<L: RecordLoader> Reconciler<L> {
    pub fn new(loader: L, options: CompareOptions) -> Self {
        Self { loader, options }
    }

    /// Loads the index and every listed dataset of `namespace`, then flattens it.
    pub fn load_collection(&self, namespace: Namespace) -> Result<Collection> {
        let mut collection = Collection::new(namespace);
        for name in self.loader.dataset_names(namespace)? {
            let record = self.loader.load_record(namespace, &name)?;
            collection.insert(name, record);
        }
        tracing::debug!("Loaded {} top-level datasets from {}", collection.len(), namespace);

        let flat = flatten(&collection, &self.loader, self.options.duplicate_policy)?;
        tracing::info!("{}: {} datasets after flattening", namespace, flat.len());
        Ok(flat)
    }

    pub fn run(&self) -> Result<Report> {
        tracing::info!("Starting dataset comparison");

        let beta = self.load_collection(Namespace::Beta)?;
        let test = self.load_collection(Namespace::Test)?;

        self.compare(&beta, &test)
    }

    /// Compares two already-flattened collections.
    pub fn compare(&self, beta: &Collection, test: &Collection) -> Result<Report> {
        let test_only: BTreeSet<String> = test.names().difference(&beta.names()).cloned().collect();
        if !test_only.is_empty() {
            tracing::debug!("{} datasets only in test", test_only.len());
        }

        let mut mismatches = Vec::new();
        for (name, beta_record) in &beta.datasets {
            let test_record = test
                .get(name)
                .ok_or_else(|| ReconcileError::MissingCounterpartDataset { name: name.clone() })?;

            if beta_record == test_record {
                continue;
            }

            // names-only 模式完全跳過欄位比對
            let entries = if self.options.names_only {
                None
            } else {
                Some(diff_records(name, beta_record, test_record, &self.options.noisy_fields)?)
            };
            tracing::debug!("Dataset '{}' differs", name);
            mismatches.push(DatasetDiff {
                name: name.clone(),
                entries,
            });
        }

        tracing::info!(
            "Compared {} datasets: {} differ",
            beta.len(),
            mismatches.len()
        );

        Ok(Report {
            test_only,
            mismatches,
        })
    }
}
