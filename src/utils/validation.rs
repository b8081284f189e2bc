use crate::utils::error::{ReconcileError, Result};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReconcileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ReconcileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檢查副檔名，回傳小寫後的副檔名
pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<String> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match Path::new(file).extension().and_then(|ext| ext.to_str()) {
        Some(extension) => {
            let extension = extension.to_ascii_lowercase();
            if allowed_set.contains(extension.as_str()) {
                Ok(extension)
            } else {
                Err(ReconcileError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.to_string(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                })
            }
        }
        None => Err(ReconcileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReconcileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list(field_name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(ReconcileError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for value in values {
        validate_non_empty_string(field_name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("namespaces.beta", "/var/www/cells-beta").is_ok());
        assert!(validate_path("namespaces.beta", "").is_err());
        assert!(validate_path("namespaces.beta", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert_eq!(
            validate_file_extension("input", "matrix.TSV", &["csv", "tsv"]).unwrap(),
            "tsv"
        );
        assert!(validate_file_extension("input", "matrix.txt", &["csv", "tsv"]).is_err());
        assert!(validate_file_extension("input", "matrix", &["csv", "tsv"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_list() {
        assert!(validate_non_empty_list("compare.noisy_fields", &["metaFields".to_string()]).is_ok());
        assert!(validate_non_empty_list("compare.noisy_fields", &[]).is_err());
        assert!(validate_non_empty_list("compare.noisy_fields", &["  ".to_string()]).is_err());
    }
}
