use crate::domain::model::{PlanRecord, RateAreaKey, SILVER_METAL_LEVEL};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// 費率區 -> 不重複的 Silver 費率集合
///
/// 費率以 `Decimal` 數值存放，"345.5" 與 "345.50" 視為同一筆。
/// `BTreeSet` 以數值排序，第二小的費率可直接依序讀取。
#[derive(Debug, Clone, Default)]
pub struct SilverRateIndex {
    rates: HashMap<RateAreaKey, BTreeSet<Decimal>>,
}

impl SilverRateIndex {
    /// 從方案列建立索引，只收 metal_level 完全等於 "Silver" 的列。
    ///
    /// Silver 列的費率不是純十進位數字時整批失敗，錯誤帶上該列的來源行號；
    /// 非 Silver 列不做任何檢查。
    pub fn build(plans: &[PlanRecord]) -> Result<Self> {
        let pattern = Regex::new(RATE_PATTERN).map_err(|e| EtlError::ProcessingError {
            message: format!("Invalid rate pattern: {}", e),
        })?;
        let mut rates: HashMap<RateAreaKey, BTreeSet<Decimal>> = HashMap::new();

        for plan in plans {
            if plan.metal_level != SILVER_METAL_LEVEL {
                continue;
            }

            let rate = parse_rate(&pattern, &plan.rate, plan.line)?;
            rates
                .entry(RateAreaKey::new(plan.state.as_str(), plan.rate_area.as_str()))
                .or_default()
                .insert(rate);
        }

        tracing::debug!(
            "Silver rate index built: {} rate areas from {} plans",
            rates.len(),
            plans.len()
        );

        Ok(Self { rates })
    }

    pub fn get(&self, key: &RateAreaKey) -> Option<&BTreeSet<Decimal>> {
        self.rates.get(key)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// `Decimal::from_str` 會接受 "2_84.50"、"1e3" 之類的寫法，先以此樣式把關
const RATE_PATTERN: &str = r"^[+-]?\d+(\.\d+)?$";

fn parse_rate(pattern: &Regex, raw: &str, line: u64) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EtlError::InvalidRateError {
            line,
            value: raw.to_string(),
            reason: "Rate is empty".to_string(),
        });
    }

    if !pattern.is_match(trimmed) {
        return Err(EtlError::InvalidRateError {
            line,
            value: raw.to_string(),
            reason: "Rate must be a plain decimal number".to_string(),
        });
    }

    Decimal::from_str(trimmed)
        .map(|rate| rate.normalize())
        .map_err(|e| EtlError::InvalidRateError {
            line,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(state: &str, rate_area: &str, metal_level: &str, rate: &str) -> PlanRecord {
        plan_at(0, state, rate_area, metal_level, rate)
    }

    fn plan_at(line: u64, state: &str, rate_area: &str, metal_level: &str, rate: &str) -> PlanRecord {
        PlanRecord {
            state: state.to_string(),
            rate_area: rate_area.to_string(),
            metal_level: metal_level.to_string(),
            rate: rate.to_string(),
            line,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_duplicate_rates_count_once() {
        let plans = vec![
            plan("CA", "11", "Silver", "345.51"),
            plan("CA", "11", "Silver", "345.51"),
            plan("CA", "11", "Silver", "375.66"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        let rates = index.get(&RateAreaKey::new("CA", "11")).unwrap();
        assert_eq!(rates.len(), 2);
    }

    #[test]
    fn test_textually_different_rates_collapse() {
        let plans = vec![
            plan("MS", "3", "Silver", "345.50"),
            plan("MS", "3", "Silver", "345.5"),
            plan("MS", "3", "Silver", "0345.500"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        let rates = index.get(&RateAreaKey::new("MS", "3")).unwrap();
        assert_eq!(rates.len(), 1);
        assert!(rates.contains(&dec("345.5")));
    }

    #[test]
    fn test_non_silver_plans_are_ignored() {
        let plans = vec![
            plan("WV", "9", "Gold", "not-a-number"),
            plan("WV", "9", "silver", "100.00"),
            plan("WV", "9", "Bronze", "90.00"),
            plan("WV", "9", "Silver", "250.00"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        assert_eq!(index.len(), 1);
        let rates = index.get(&RateAreaKey::new("WV", "9")).unwrap();
        assert_eq!(rates.iter().copied().collect::<Vec<_>>(), vec![dec("250")]);
    }

    #[test]
    fn test_rates_are_numerically_ordered() {
        let plans = vec![
            plan("NY", "1", "Silver", "1000.00"),
            plan("NY", "1", "Silver", "99.99"),
            plan("NY", "1", "Silver", "250"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        let rates: Vec<Decimal> = index
            .get(&RateAreaKey::new("NY", "1"))
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(rates, vec![dec("99.99"), dec("250"), dec("1000")]);
    }

    #[test]
    fn test_rate_areas_are_scoped_by_state() {
        let plans = vec![
            plan("MO", "3", "Silver", "200.00"),
            plan("MS", "3", "Silver", "300.00"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&RateAreaKey::new("MO", "3")).unwrap().len(), 1);
        assert_eq!(index.get(&RateAreaKey::new("MS", "3")).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_silver_rate_is_fatal() {
        let plans = vec![
            plan_at(2, "AL", "1", "Silver", "200.00"),
            plan_at(4, "AL", "1", "Silver", "twelve"),
        ];

        match SilverRateIndex::build(&plans) {
            Err(EtlError::InvalidRateError { line, value, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(value, "twelve");
            }
            other => panic!("expected InvalidRateError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_silver_rate_is_fatal() {
        let plans = vec![plan_at(2, "AL", "1", "Silver", "")];
        assert!(matches!(
            SilverRateIndex::build(&plans),
            Err(EtlError::InvalidRateError { line: 2, .. })
        ));
    }

    #[test]
    fn test_loosely_formatted_silver_rates_are_fatal() {
        for raw in ["2_84.50", "1e3", "1,000", "284.", ".50", "$284.50"] {
            let plans = vec![plan_at(5, "MS", "3", "Silver", raw)];
            match SilverRateIndex::build(&plans) {
                Err(EtlError::InvalidRateError { line, value, .. }) => {
                    assert_eq!(line, 5);
                    assert_eq!(value, raw);
                }
                other => panic!("expected InvalidRateError for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_padded_rates_are_accepted() {
        let plans = vec![
            plan("MS", "3", "Silver", " 284.50 "),
            plan("MS", "3", "Silver", "300"),
        ];

        let index = SilverRateIndex::build(&plans).unwrap();
        let rates: Vec<Decimal> = index
            .get(&RateAreaKey::new("MS", "3"))
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(rates, vec![dec("284.5"), dec("300")]);
    }
}
