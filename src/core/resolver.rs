use crate::core::plan_index::SilverRateIndex;
use crate::core::zip_index::ZipAreaIndex;
use crate::domain::model::{RateAreaKey, ResolutionStats};
use rust_decimal::{Decimal, RoundingStrategy};

/// 單一 ZIP 的解析結果。輸出時除了 `Rate` 以外一律是空欄位，
/// 這裡保留原因供日誌與統計使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Rate(Decimal),
    UnknownZip,
    AmbiguousZip { rate_areas: usize },
    NoSilverPlans { area: RateAreaKey },
    InsufficientRates { area: RateAreaKey, distinct: usize },
}

impl Resolution {
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            Resolution::Rate(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn record(&self, stats: &mut ResolutionStats) {
        match self {
            Resolution::Rate(_) => stats.resolved += 1,
            Resolution::UnknownZip => stats.unknown_zip += 1,
            Resolution::AmbiguousZip { .. } => stats.ambiguous_zip += 1,
            Resolution::NoSilverPlans { .. } => stats.no_silver_plans += 1,
            Resolution::InsufficientRates { .. } => stats.insufficient_rates += 1,
        }
    }
}

/// 判定 ZIP 的第二低 Silver 費率；兩個索引都只讀不寫。
pub fn classify(zipcode: &str, zip_index: &ZipAreaIndex, rate_index: &SilverRateIndex) -> Resolution {
    let areas = match zip_index.get(zipcode) {
        Some(areas) => areas,
        None => return Resolution::UnknownZip,
    };

    let area = match areas.iter().next() {
        Some(area) if areas.len() == 1 => area,
        _ => {
            return Resolution::AmbiguousZip {
                rate_areas: areas.len(),
            }
        }
    };

    let rates = match rate_index.get(area) {
        Some(rates) => rates,
        None => return Resolution::NoSilverPlans { area: area.clone() },
    };

    // BTreeSet 依數值遞增，第二個元素即第二低費率
    match rates.iter().nth(1) {
        Some(second_lowest) => Resolution::Rate(*second_lowest),
        None => Resolution::InsufficientRates {
            area: area.clone(),
            distinct: rates.len(),
        },
    }
}

pub fn resolve(zipcode: &str, zip_index: &ZipAreaIndex, rate_index: &SilverRateIndex) -> Option<Decimal> {
    classify(zipcode, zip_index, rate_index).rate()
}

/// 四捨六入五成雙到小數兩位，保留尾端的 0（234.5 -> "234.50"）
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{:.2}", rounded)
}
