use anyhow::Result;
use dataset_reconciler::core::report::render_to_string;
use dataset_reconciler::{
    CompareOptions, DuplicatePolicy, FsLoader, NamespaceRoots, ReconcileError, Reconciler, Settings,
};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn write_manifest(root: &Path, rel: &str, value: serde_json::Value) -> Result<()> {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

struct Deployments {
    beta: TempDir,
    test: TempDir,
}

impl Deployments {
    fn new() -> Result<Self> {
        Ok(Self {
            beta: TempDir::new()?,
            test: TempDir::new()?,
        })
    }

    fn loader(&self) -> FsLoader {
        FsLoader::new(
            NamespaceRoots::new(self.beta.path(), self.test.path()),
            "dataset.json",
        )
    }
}

/// beta 有 {A, B}，test 有 {A, B, C}
fn abc_scenario(beta_a_size: i64) -> Result<Deployments> {
    let d = Deployments::new()?;

    write_manifest(d.beta.path(), "dataset.json", json!({"datasets": [{"name": "A"}, {"name": "B"}]}))?;
    write_manifest(d.beta.path(), "A/dataset.json", json!({"name": "A", "size": beta_a_size}))?;
    write_manifest(d.beta.path(), "B/dataset.json", json!({"name": "B", "size": 1}))?;

    write_manifest(d.test.path(), "dataset.json", json!({"datasets": ["A", "B", "C"]}))?;
    write_manifest(d.test.path(), "A/dataset.json", json!({"name": "A", "size": 20}))?;
    write_manifest(d.test.path(), "B/dataset.json", json!({"name": "B", "size": 1}))?;
    write_manifest(d.test.path(), "C/dataset.json", json!({"name": "C"}))?;

    Ok(d)
}

#[test]
fn test_equal_datasets_print_nothing() -> Result<()> {
    let d = abc_scenario(20)?;

    let report = Reconciler::new(d.loader(), CompareOptions::default()).run()?;

    assert_eq!(render_to_string(&report)?, "Datasets only in test: C\n");
    Ok(())
}

#[test]
fn test_size_difference_is_reported() -> Result<()> {
    let d = abc_scenario(10)?;

    let report = Reconciler::new(d.loader(), CompareOptions::default()).run()?;

    assert_eq!(
        render_to_string(&report)?,
        "Datasets only in test: C\nA\n    size: 10 -> 20\n"
    );
    Ok(())
}

#[test]
fn test_names_only_prints_headers() -> Result<()> {
    let d = abc_scenario(10)?;
    let options = CompareOptions {
        names_only: true,
        ..Default::default()
    };

    let report = Reconciler::new(d.loader(), options).run()?;

    assert_eq!(render_to_string(&report)?, "Datasets only in test: C\nA\n");
    Ok(())
}

#[test]
fn test_collection_children_and_noisy_fields() -> Result<()> {
    let d = Deployments::new()?;

    for root in [d.beta.path(), d.test.path()] {
        write_manifest(root, "dataset.json", json!({"datasets": [{"name": "brain"}]}))?;
        write_manifest(
            root,
            "brain/dataset.json",
            json!({"name": "brain", "datasets": [{"name": "brain/adult"}, {"name": "brain/fetal"}]}),
        )?;
        write_manifest(root, "brain/fetal/dataset.json", json!({"name": "brain/fetal", "cells": 5}))?;
    }
    write_manifest(
        d.beta.path(),
        "brain/adult/dataset.json",
        json!({"name": "brain/adult", "metaFields": [{"name": "cluster", "arr": [1, 2]}], "desc": {"title": "old"}}),
    )?;
    write_manifest(
        d.test.path(),
        "brain/adult/dataset.json",
        json!({"name": "brain/adult", "metaFields": [{"name": "cluster", "arr": [1, 3]}], "desc": {"title": "new"}}),
    )?;

    let report = Reconciler::new(d.loader(), CompareOptions::default()).run()?;

    assert_eq!(
        render_to_string(&report)?,
        "Datasets only in test: none\nbrain/adult\n    desc.title: \"old\" -> \"new\"\n    metaFields: differs (suppressed)\n"
    );
    Ok(())
}

#[test]
fn test_dataset_missing_from_test_aborts() -> Result<()> {
    let d = abc_scenario(20)?;
    write_manifest(
        d.beta.path(),
        "dataset.json",
        json!({"datasets": ["A", "B", "D"]}),
    )?;
    write_manifest(d.beta.path(), "D/dataset.json", json!({"name": "D"}))?;

    let result = Reconciler::new(d.loader(), CompareOptions::default()).run();

    assert!(matches!(
        result,
        Err(ReconcileError::MissingCounterpartDataset { ref name }) if name == "D"
    ));
    Ok(())
}

#[test]
fn test_missing_manifest_aborts() -> Result<()> {
    let d = Deployments::new()?;
    write_manifest(d.beta.path(), "dataset.json", json!({"datasets": ["A"]}))?;

    let result = Reconciler::new(d.loader(), CompareOptions::default()).run();

    assert!(matches!(result, Err(ReconcileError::IoError(_))));
    Ok(())
}

#[test]
fn test_duplicate_children_follow_configured_policy() -> Result<()> {
    let d = Deployments::new()?;

    for root in [d.beta.path(), d.test.path()] {
        write_manifest(root, "dataset.json", json!({"datasets": ["x", "y"]}))?;
        write_manifest(root, "x/dataset.json", json!({"name": "x", "datasets": [{"name": "y"}]}))?;
        write_manifest(root, "y/dataset.json", json!({"name": "y"}))?;
    }

    // 同名且內容相同的子資料集不算衝突
    let report = Reconciler::new(d.loader(), CompareOptions::default()).run()?;
    assert!(report.mismatches.is_empty());

    let options = CompareOptions {
        duplicate_policy: DuplicatePolicy::LastWins,
        ..Default::default()
    };
    assert!(Reconciler::new(d.loader(), options).run().is_ok());
    Ok(())
}

#[test]
fn test_loader_from_settings() -> Result<()> {
    let d = abc_scenario(10)?;
    let settings = Settings {
        roots: NamespaceRoots::new(d.beta.path(), d.test.path()),
        noisy_fields: vec!["size".to_string()],
        ..Default::default()
    };

    let loader = FsLoader::from_config(&settings);
    let report = Reconciler::new(loader, CompareOptions::from_config(&settings)).run()?;

    assert_eq!(
        render_to_string(&report)?,
        "Datasets only in test: C\nA\n    size: differs (suppressed)\n"
    );
    Ok(())
}
