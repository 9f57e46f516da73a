use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub const MAX_WORKERS: usize = 64;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<()> {
    validate_path(field_name, file)?;

    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 所有輸入來源共用的檢查：路徑、副檔名、worker 數
pub fn validate_sources<C: crate::domain::ports::ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("data_dir", config.data_dir())?;
    validate_file_extension("plans_file", config.plans_file(), &["csv"])?;
    validate_file_extension("zips_file", config.zips_file(), &["csv"])?;
    validate_file_extension("slcsp_file", config.slcsp_file(), &["csv"])?;
    validate_file_extension("output_file", config.output_file(), &["csv"])?;
    validate_range("workers", config.workers(), 1, MAX_WORKERS)?;
    Ok(())
}
