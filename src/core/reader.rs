use crate::domain::model::{PlanRecord, QueryRecord, ZipRecord};
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

pub const PLAN_COLUMNS: &[&str] = &["state", "rate_area", "metal_level", "rate"];
pub const ZIP_COLUMNS: &[&str] = &["zipcode", "state", "rate_area"];
pub const QUERY_COLUMNS: &[&str] = &["zipcode"];

pub fn read_plans(data: &[u8]) -> Result<Vec<PlanRecord>> {
    let rows = read_table_with_lines::<PlanRecord>("plans", data, PLAN_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|(line, mut plan)| {
            plan.line = line;
            plan
        })
        .collect())
}

pub fn read_zips(data: &[u8]) -> Result<Vec<ZipRecord>> {
    read_table("zips", data, ZIP_COLUMNS)
}

/// 查詢表的 rate 欄位（原始檔中為空白）會被忽略
pub fn read_queries(data: &[u8]) -> Result<Vec<QueryRecord>> {
    read_table("slcsp", data, QUERY_COLUMNS)
}

/// 解析帶標題列的 CSV。缺少必要欄位、或必要欄位為空白時整批失敗，
/// 不做部分輸出。多餘的欄位（plan_id、county_code 等）略過。
pub fn read_table<T: DeserializeOwned>(
    table: &str,
    data: &[u8],
    required_columns: &[&str],
) -> Result<Vec<T>> {
    let rows = read_table_with_lines(table, data, required_columns)?;
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

/// 同 `read_table`，但每列附上 CSV 讀取器回報的實際行號（空白行也計入）
pub fn read_table_with_lines<T: DeserializeOwned>(
    table: &str,
    data: &[u8],
    required_columns: &[&str],
) -> Result<Vec<(u64, T)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let required_positions = locate_columns(table, &headers, required_columns)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        for (column, position) in required_columns.iter().zip(&required_positions) {
            if record.get(*position).map_or(true, str::is_empty) {
                return Err(EtlError::MalformedRowError {
                    table: table.to_string(),
                    line,
                    message: format!("required field '{}' is empty", column),
                });
            }
        }

        let row: T = record.deserialize(Some(&headers))?;
        rows.push((line, row));
    }

    tracing::debug!("Read {} rows from '{}'", rows.len(), table);
    Ok(rows)
}

fn locate_columns(table: &str, headers: &StringRecord, required: &[&str]) -> Result<Vec<usize>> {
    required
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == *column)
                .ok_or_else(|| EtlError::MissingColumnError {
                    table: table.to_string(),
                    column: column.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_plans_ignores_extra_columns() {
        let data = b"plan_id,state,metal_level,rate,rate_area\n\
                     74449NR9870320,GA,Silver,298.62,7\n\
                     26325VH2723968,FL, Gold ,421.43,60\n";

        let plans = read_plans(data).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].state, "GA");
        assert_eq!(plans[0].rate_area, "7");
        assert_eq!(plans[0].rate, "298.62");
        assert_eq!(plans[1].metal_level, "Gold");
    }

    #[test]
    fn test_read_plans_keeps_source_lines_across_blank_lines() {
        let data = b"state,rate_area,metal_level,rate\nMS,3,Silver,1.00\n\nMS,3,Silver,abc\n";

        let plans = read_plans(data).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].line, 2);
        assert_eq!(plans[1].line, 4);
    }

    #[test]
    fn test_read_zips_preserves_leading_zeros() {
        let data = b"zipcode,state,county_code,name,rate_area\n\
                     07001,NJ,34023,Middlesex,1\n";

        let zips = read_zips(data).unwrap();
        assert_eq!(zips[0].zipcode, "07001");
        assert_eq!(zips[0].rate_area, "1");
    }

    #[test]
    fn test_read_queries_with_blank_rate_column() {
        let data = b"zipcode,rate\n64148,\n67118,\n";

        let queries = read_queries(data).unwrap();
        let zipcodes: Vec<&str> = queries.iter().map(|q| q.zipcode.as_str()).collect();
        assert_eq!(zipcodes, vec!["64148", "67118"]);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let data = b"zipcode,state\n38849,MS\n";

        match read_zips(data) {
            Err(EtlError::MissingColumnError { table, column }) => {
                assert_eq!(table, "zips");
                assert_eq!(column, "rate_area");
            }
            other => panic!("expected MissingColumnError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_required_field_is_fatal() {
        let data = b"zipcode,state,rate_area\n38849,MS,3\n38850,,3\n";

        match read_zips(data) {
            Err(EtlError::MalformedRowError { table, line, .. }) => {
                assert_eq!(table, "zips");
                assert_eq!(line, 3);
            }
            other => panic!("expected MalformedRowError, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let data = b"zipcode,state,rate_area\n38849,MS\n";
        assert!(matches!(read_zips(data), Err(EtlError::CsvError(_))));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let queries = read_queries(b"zipcode,rate\n").unwrap();
        assert!(queries.is_empty());
    }
}
