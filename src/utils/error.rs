use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumnError { table: String, column: String },

    #[error("Malformed row in '{table}' at line {line}: {message}")]
    MalformedRowError {
        table: String,
        line: u64,
        message: String,
    },

    #[error("Invalid rate '{value}' at line {line}: {reason}")]
    InvalidRateError {
        line: u64,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Input,
    Data,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 兩個 CLI 共用的結束碼；Low 視為警告，仍以 0 結束
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            EtlError::CsvError(_) | EtlError::MissingColumnError { .. } => ErrorCategory::Input,
            EtlError::MalformedRowError { .. } | EtlError::InvalidRateError { .. } => {
                ErrorCategory::Data
            }
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config | ErrorCategory::Input | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            // 檔案暫時不可讀時重跑即可
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("無法讀取或寫入檔案: {}", e),
            EtlError::CsvError(e) => format!("CSV 格式錯誤: {}", e),
            EtlError::MissingColumnError { table, column } => {
                format!("資料表 '{}' 缺少必要欄位 '{}'", table, column)
            }
            EtlError::MalformedRowError {
                table,
                line,
                message,
            } => format!("資料表 '{}' 第 {} 行格式錯誤: {}", table, line, message),
            EtlError::InvalidRateError { line, value, .. } => {
                format!("第 {} 行的費率 '{}' 不是有效的數字", line, value)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => "Check the command-line flags or the TOML configuration file",
            ErrorCategory::Input => {
                "Make sure every input file is a CSV with a header row containing the required columns"
            }
            ErrorCategory::Data => "Fix the offending row in the source table and run again",
            ErrorCategory::Io => "Verify the data directory exists and the files are readable",
            ErrorCategory::Internal => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_are_high_severity() {
        let err = EtlError::InvalidRateError {
            line: 7,
            value: "abc".to_string(),
            reason: "Invalid decimal".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("abc"));
    }

    #[test]
    fn test_io_errors_are_retryable() {
        let err = EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "plans.csv",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let io = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "zips.csv"));
        let data = EtlError::MalformedRowError {
            table: "plans".to_string(),
            line: 4,
            message: "required field 'state' is empty".to_string(),
        };
        let internal = EtlError::ProcessingError {
            message: "Resolution task failed".to_string(),
        };

        assert_eq!(io.severity().exit_code(), 2);
        assert_eq!(data.severity().exit_code(), 1);
        assert_eq!(internal.severity().exit_code(), 3);
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
    }

    #[test]
    fn test_missing_column_message() {
        let err = EtlError::MissingColumnError {
            table: "zips".to_string(),
            column: "rate_area".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Table 'zips' is missing required column 'rate_area'"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
    }
}
