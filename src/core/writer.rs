use crate::core::resolver::format_rate;
use crate::domain::model::SlcspRow;
use crate::utils::error::{EtlError, Result};
use csv::WriterBuilder;

pub const OUTPUT_HEADER: [&str; 2] = ["zipcode", "rate"];

/// 產生 `zipcode,rate` CSV；無法解析的 ZIP 寫出空的 rate 欄位
pub fn write_rows(rows: &[SlcspRow]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(OUTPUT_HEADER)?;

    for row in rows {
        let rate = row.rate.map(format_rate).unwrap_or_default();
        writer.write_record([row.zipcode.as_str(), rate.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })?;

    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_write_rows() {
        let rows = vec![
            SlcspRow {
                zipcode: "64148".to_string(),
                rate: Some(Decimal::from_str("245.2").unwrap()),
            },
            SlcspRow {
                zipcode: "07001".to_string(),
                rate: None,
            },
        ];

        let output = write_rows(&rows).unwrap();
        assert_eq!(output, "zipcode,rate\n64148,245.20\n07001,\n");
    }

    #[test]
    fn test_write_no_rows() {
        assert_eq!(write_rows(&[]).unwrap(), "zipcode,rate\n");
    }
}
