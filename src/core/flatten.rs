use crate::domain::model::{Collection, DuplicatePolicy, Record, DATASETS_KEY, NAME_KEY};
use crate::domain::ports::RecordLoader;
use crate::utils::error::{ReconcileError, Result};

/// Promotes the sub-datasets of every collection record to top-level entries.
///
/// Each child listed under a parent's `"datasets"` key is loaded on its own
/// through `loader` (the inline object is only used for its name) and
/// registered under that name. Only one level is expanded. The input is
/// left untouched.
///
/// Name collisions with a different record follow `policy`. Registering a
/// record identical to the one already present is never a conflict, which
/// keeps flattening idempotent.
pub fn flatten<L: RecordLoader>(
    collection: &Collection,
    loader: &L,
    policy: DuplicatePolicy,
) -> Result<Collection> {
    let mut flat = collection.clone();

    for (parent, record) in &collection.datasets {
        let Some(children) = record.sub_datasets() else {
            continue;
        };
        tracing::debug!(
            "Collection '{}' in {} declares {} sub-datasets",
            parent,
            collection.namespace,
            children.len()
        );

        for (i, child) in children.iter().enumerate() {
            let name = child
                .as_record()
                .and_then(Record::name)
                .ok_or_else(|| ReconcileError::MalformedManifest {
                    path: format!("{}:{}[{}]", parent, DATASETS_KEY, i),
                    reason: format!("sub-dataset entry has no string '{}'", NAME_KEY),
                })?;

            let child_record = loader.load_record(collection.namespace, name)?;
            register(&mut flat, parent, name, child_record, policy)?;
        }
    }

    Ok(flat)
}

fn register(
    flat: &mut Collection,
    parent: &str,
    name: &str,
    record: Record,
    policy: DuplicatePolicy,
) -> Result<()> {
    let conflict = match flat.get(name) {
        Some(existing) if *existing == record => return Ok(()),
        Some(_) => true,
        None => false,
    };

    if conflict {
        match policy {
            DuplicatePolicy::Reject => {
                return Err(ReconcileError::DuplicateSubDataset {
                    name: name.to_string(),
                    parent: parent.to_string(),
                })
            }
            DuplicatePolicy::LastWins => {
                tracing::debug!("Sub-dataset '{}' from '{}' replaces an earlier entry", name, parent);
            }
        }
    }

    flat.insert(name, record);
    Ok(())
}
