use crate::utils::error::Result;
use crate::utils::validation::validate_file_extension;
use std::path::{Path, PathBuf};

pub const TRANSPOSED_SUFFIX: &str = "transposed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Picks the delimiter from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = path.to_string_lossy();
        match validate_file_extension("input", &file, &["csv", "tsv", "tab"])?.as_str() {
            "csv" => Ok(Delimiter::Comma),
            _ => Ok(Delimiter::Tab),
        }
    }

    /// TSV has no quoting convention, so `"` is an ordinary character there.
    pub fn quotes(&self) -> bool {
        matches!(self, Delimiter::Comma)
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Swaps rows and columns. Short rows are padded with empty cells.
pub fn transpose_rows(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    (0..width)
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

pub fn output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(TRANSPOSED_SUFFIX);
    PathBuf::from(name)
}

/// Reads `input` whole (no header row) and writes its transpose to
/// `<input>.transposed` with the same delimiter.
pub fn transpose_file(input: &Path) -> Result<PathBuf> {
    let delimiter = Delimiter::from_path(input)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .quoting(delimiter.quotes())
        .from_path(input)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    tracing::debug!("Read {} rows from {}", rows.len(), input.display());

    let transposed = transpose_rows(&rows);
    let output = output_path(input);

    let quote_style = if delimiter.quotes() {
        csv::QuoteStyle::Necessary
    } else {
        csv::QuoteStyle::Never
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .quote_style(quote_style)
        .from_path(&output)?;
    for row in &transposed {
        writer.write_record(row)?;
    }
    writer.flush()?;

    tracing::info!(
        "Wrote {} x {} matrix to {}",
        transposed.len(),
        rows.len(),
        output.display()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_transpose_rectangular() {
        let input = rows(&[&["gene", "c1", "c2"], &["ACTB", "1", "2"]]);
        assert_eq!(
            transpose_rows(&input),
            rows(&[&["gene", "ACTB"], &["c1", "1"], &["c2", "2"]])
        );
    }

    #[test]
    fn test_transpose_pads_ragged_rows() {
        let input = rows(&[&["a", "b", "c"], &["d"]]);
        assert_eq!(
            transpose_rows(&input),
            rows(&[&["a", "d"], &["b", ""], &["c", ""]])
        );
    }

    #[test]
    fn test_transpose_empty() {
        assert!(transpose_rows(&[]).is_empty());
    }

    #[test]
    fn test_delimiter_from_extension() {
        assert_eq!(Delimiter::from_path(Path::new("m.csv")).unwrap(), Delimiter::Comma);
        assert_eq!(Delimiter::from_path(Path::new("m.tsv")).unwrap(), Delimiter::Tab);
        assert!(Delimiter::from_path(Path::new("m.xlsx")).is_err());
    }

    #[test]
    fn test_output_path_appends_suffix() {
        assert_eq!(
            output_path(Path::new("/tmp/matrix.tsv")),
            PathBuf::from("/tmp/matrix.tsv.transposed")
        );
    }
}
