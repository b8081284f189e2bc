use crate::domain::model::{DiffEntry, Report};
use crate::utils::error::Result;
use std::io::Write;

/// Writes the human-readable report: the test-only names, then one header
/// per differing dataset followed by its field lines.
pub fn render<W: Write>(report: &Report, out: &mut W) -> Result<()> {
    if report.test_only.is_empty() {
        writeln!(out, "Datasets only in test: none")?;
    } else {
        let names: Vec<&str> = report.test_only.iter().map(String::as_str).collect();
        writeln!(out, "Datasets only in test: {}", names.join(", "))?;
    }

    for mismatch in &report.mismatches {
        writeln!(out, "{}", mismatch.name)?;
        for entry in mismatch.entries.iter().flatten() {
            writeln!(out, "    {}", format_entry(entry))?;
        }
    }

    Ok(())
}

pub fn format_entry(entry: &DiffEntry) -> String {
    match entry {
        DiffEntry::Changed { beta, test, .. } => {
            format!("{}: {} -> {}", entry.dotted_path(), beta, test)
        }
        DiffEntry::Suppressed { .. } => format!("{}: differs (suppressed)", entry.dotted_path()),
    }
}

pub fn render_to_string(report: &Report) -> Result<String> {
    let mut buf = Vec::new();
    render(report, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
