use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SILVER_METAL_LEVEL: &str = "Silver";

/// plans.csv 的一列；rate 保留原始字串，建索引時才解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub state: String,
    pub rate_area: String,
    pub metal_level: String,
    pub rate: String,
    /// 來源檔中的行號（含標題列，從 1 起算），錯誤訊息使用
    #[serde(skip)]
    pub line: u64,
}

/// zips.csv 的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRecord {
    pub zipcode: String,
    pub state: String,
    pub rate_area: String,
}

/// slcsp.csv 的一列（待查詢的 ZIP）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub zipcode: String,
}

/// 州 + 費率區
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RateAreaKey {
    pub state: String,
    pub rate_area: String,
}

impl RateAreaKey {
    pub fn new(state: impl Into<String>, rate_area: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            rate_area: rate_area.into(),
        }
    }
}

/// 輸出列；rate 為 None 時寫出空欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlcspRow {
    pub zipcode: String,
    pub rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub plans: Vec<PlanRecord>,
    pub zips: Vec<ZipRecord>,
    pub queries: Vec<QueryRecord>,
}

/// 各種解析結果的計數，僅供日誌使用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub resolved: usize,
    pub unknown_zip: usize,
    pub ambiguous_zip: usize,
    pub no_silver_plans: usize,
    pub insufficient_rates: usize,
}

impl ResolutionStats {
    pub fn total(&self) -> usize {
        self.resolved
            + self.unknown_zip
            + self.ambiguous_zip
            + self.no_silver_plans
            + self.insufficient_rates
    }

    pub fn unresolved(&self) -> usize {
        self.total() - self.resolved
    }

    pub fn merge(&mut self, other: &ResolutionStats) {
        self.resolved += other.resolved;
        self.unknown_zip += other.unknown_zip;
        self.ambiguous_zip += other.ambiguous_zip;
        self.no_silver_plans += other.no_silver_plans;
        self.insufficient_rates += other.insufficient_rates;
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<SlcspRow>,
    pub csv_output: String,
    pub stats: ResolutionStats,
}
