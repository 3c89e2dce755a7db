//! In-memory factor lookup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{StationFactors, StationKey};

use super::error::FactorStoreError;
use super::loader::{FactorRecord, load_fixture};

/// Read-only factor records indexed by normalized station name.
///
/// Names are normalized with [`StationKey::from_name`], the same rule
/// discovery uses, so "강남역" in the fixture matches a "강남역 2호선" hit.
///
/// A key must identify exactly one record. Keys shared by several records
/// are ambiguous and resolve to nothing.
#[derive(Debug, Clone, Default)]
pub struct FactorStore {
    by_key: HashMap<StationKey, StationFactors>,
    ambiguous: HashSet<StationKey>,
}

impl FactorStore {
    /// Build a store from records. Keys claimed by more than one record are
    /// withdrawn and remembered as ambiguous.
    pub fn from_records(records: impl IntoIterator<Item = FactorRecord>) -> Self {
        let mut by_key: HashMap<StationKey, StationFactors> = HashMap::new();
        let mut ambiguous = HashSet::new();

        for record in records {
            let Some(key) = StationKey::from_name(&record.station_name) else {
                warn!(code = %record.station_code, "skipping factor record with blank name");
                continue;
            };

            if ambiguous.contains(&key) {
                warn!(code = %record.station_code, %key, "another factor record for an ambiguous name");
                continue;
            }

            if let Some(first) = by_key.remove(&key) {
                warn!(
                    name = %record.station_name,
                    first = %first.station_code,
                    second = %record.station_code,
                    "factor records share a name, neither will be used"
                );
                ambiguous.insert(key);
                continue;
            }

            by_key.insert(key, record.into_factors());
        }

        Self { by_key, ambiguous }
    }

    /// Load a fixture file from disk.
    pub fn load(path: &Path) -> Result<Self, FactorStoreError> {
        let store = Self::from_records(load_fixture(path)?);
        info!(path = %path.display(), stations = store.len(), "loaded factor data");
        Ok(store)
    }

    /// Factors for a station key. `None` for unknown and ambiguous keys.
    pub fn get(&self, key: &StationKey) -> Option<&StationFactors> {
        self.by_key.get(key)
    }

    /// Factors for a raw station name, normalized first.
    pub fn get_by_name(&self, name: &str) -> Option<&StationFactors> {
        StationKey::from_name(name).and_then(|key| self.get(&key))
    }

    /// Whether several records claimed this key.
    pub fn is_ambiguous(&self, key: &StationKey) -> bool {
        self.ambiguous.contains(key)
    }

    /// Number of uniquely named stations.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(code: &str, name: &str, factor_3: f64) -> FactorRecord {
        FactorRecord {
            station_code: code.to_string(),
            station_name: name.to_string(),
            x: 127.0,
            y: 37.5,
            factor_2: 0.0,
            factor_3,
            factor_4: 0.0,
            factor_5: 0.0,
            factor_6: 0.0,
            factor_7: 0.0,
        }
    }

    #[test]
    fn lookup_normalizes_names() {
        let store = FactorStore::from_records([record("222", "강남역", 0.9)]);

        assert_eq!(store.get_by_name("강남").unwrap().factor_3, 0.9);
        assert_eq!(store.get_by_name("강남역 2호선").unwrap().station_code, "222");
        assert!(store.get_by_name("역삼").is_none());
        assert!(store.get_by_name("").is_none());
    }

    #[test]
    fn english_names_are_case_insensitive() {
        let store = FactorStore::from_records([record("1", "Gangnam", 0.5)]);
        let key = StationKey::from_name("GANGNAM Station Exit 3").unwrap();
        assert!(store.get(&key).is_some());
    }

    #[test]
    fn shared_names_resolve_to_nothing() {
        let store = FactorStore::from_records([
            record("222", "강남", 0.1),
            record("D07", "강남역", 5.0),
            record("239", "홍대입구", 0.8),
        ]);

        assert!(store.get_by_name("강남역 2호선").is_none());
        assert!(store.get_by_name("강남").is_none());
        assert!(store.is_ambiguous(&StationKey::from_name("강남").unwrap()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_name("홍대입구").unwrap().station_code, "239");
    }

    #[test]
    fn third_record_keeps_name_ambiguous() {
        let store = FactorStore::from_records([
            record("A", "서울역", 0.1),
            record("B", "서울", 0.2),
            record("C", "서울역 (경의선)", 0.3),
        ]);

        assert!(store.get_by_name("서울").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn blank_names_are_skipped() {
        let store = FactorStore::from_records([record("X", "  ", 0.1)]);
        assert!(store.is_empty());
    }

    #[test]
    fn load_from_fixture_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"model": "m", "pk": 1, "fields": {{"station_code": "239",
                "station_name": "홍대입구", "x": 126.9245, "y": 37.5572,
                "factor_2": 1.0, "factor_3": 0.8, "factor_4": 0.9,
                "factor_5": 0.4, "factor_6": 0.3, "factor_7": 0.7}}}}]"#
        )
        .unwrap();

        let store = FactorStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_name("홍대입구역").unwrap().factor_2, 1.0);
    }
}
