use crate::domain::model::{RateAreaKey, ZipRecord};
use std::collections::{BTreeSet, HashMap};

/// ZIP -> 所屬費率區集合。一個 ZIP 可能跨多個費率區（跨郡），
/// 這正是之後判定「無法確定費率區」的依據。
#[derive(Debug, Clone, Default)]
pub struct ZipAreaIndex {
    areas: HashMap<String, BTreeSet<RateAreaKey>>,
}

impl ZipAreaIndex {
    pub fn build(zips: &[ZipRecord]) -> Self {
        let mut areas: HashMap<String, BTreeSet<RateAreaKey>> = HashMap::new();

        for record in zips {
            areas
                .entry(record.zipcode.clone())
                .or_default()
                .insert(RateAreaKey::new(record.state.as_str(), record.rate_area.as_str()));
        }

        let ambiguous = areas.values().filter(|set| set.len() > 1).count();
        tracing::debug!(
            "ZIP area index built: {} ZIP codes ({} span multiple rate areas)",
            areas.len(),
            ambiguous
        );

        Self { areas }
    }

    pub fn get(&self, zipcode: &str) -> Option<&BTreeSet<RateAreaKey>> {
        self.areas.get(zipcode)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
