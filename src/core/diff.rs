use crate::domain::model::{DiffEntry, Record, Value};
use crate::utils::error::{ReconcileError, Result};
use std::collections::BTreeSet;

/// Lists every leaf field of `beta` whose value differs in `test`.
///
/// Keys come from `beta` and are visited in order. Nested records are
/// walked recursively. Any other value is compared by deep equality. A key
/// that `test` lacks is an error, not a difference. Differences on a
/// field in `noisy` are reported as [`DiffEntry::Suppressed`].
pub fn diff_records(
    dataset: &str,
    beta: &Record,
    test: &Record,
    noisy: &BTreeSet<String>,
) -> Result<Vec<DiffEntry>> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    walk(dataset, beta, test, noisy, &mut path, &mut entries)?;
    Ok(entries)
}

fn walk(
    dataset: &str,
    beta: &Record,
    test: &Record,
    noisy: &BTreeSet<String>,
    path: &mut Vec<String>,
    entries: &mut Vec<DiffEntry>,
) -> Result<()> {
    for (key, beta_value) in beta.iter() {
        path.push(key.clone());

        let test_value = test
            .get(key)
            .ok_or_else(|| ReconcileError::MissingCounterpartKey {
                dataset: dataset.to_string(),
                path: path.join("."),
            })?;

        match (beta_value, test_value) {
            (Value::Record(b), Value::Record(t)) => walk(dataset, b, t, noisy, path, entries)?,
            (b, t) if b == t => {}
            (_, _) if noisy.contains(key) => entries.push(DiffEntry::Suppressed { path: path.clone() }),
            (b, t) => entries.push(DiffEntry::Changed {
                path: path.clone(),
                beta: b.clone(),
                test: t.clone(),
            }),
        }

        path.pop();
    }
    Ok(())
}
