//! Factor fixture parsing.
//!
//! The fixture is a JSON array of model dumps:
//!
//! ```json
//! [{"model": "stations.station", "pk": 1,
//!   "fields": {"station_code": "222", "station_name": "강남",
//!              "x": 127.0276, "y": 37.4979,
//!              "factor_2": 0.8, "factor_3": 0.9, "factor_4": 0.7,
//!              "factor_5": 0.6, "factor_6": 0.5, "factor_7": 0.4}}]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::domain::StationFactors;

use super::error::FactorStoreError;

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fields: FactorRecord,
}

/// One station's row in the fixture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactorRecord {
    #[serde(deserialize_with = "code_as_string")]
    pub station_code: String,
    pub station_name: String,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
    pub factor_2: f64,
    pub factor_3: f64,
    pub factor_4: f64,
    pub factor_5: f64,
    pub factor_6: f64,
    pub factor_7: f64,
}

impl FactorRecord {
    pub fn into_factors(self) -> StationFactors {
        StationFactors {
            station_code: self.station_code,
            station_name: self.station_name,
            factor_2: self.factor_2,
            factor_3: self.factor_3,
            factor_4: self.factor_4,
            factor_5: self.factor_5,
            factor_6: self.factor_6,
            factor_7: self.factor_7,
        }
    }
}

/// Station codes appear both as strings and as bare numbers.
fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(s) => s,
        Code::Number(n) => n.to_string(),
    })
}

/// Parse fixture JSON into records, in file order.
pub fn parse_fixture(json: &str) -> Result<Vec<FactorRecord>, FactorStoreError> {
    let entries: Vec<FixtureEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(|e| e.fields).collect())
}

/// Read and parse a fixture file.
pub fn load_fixture(path: &Path) -> Result<Vec<FactorRecord>, FactorStoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FactorStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fixture(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"[
        {"model": "FindBestStation.station", "pk": 1,
         "fields": {"station_code": "222", "station_name": "강남",
                    "x": 127.0276, "y": 37.4979,
                    "factor_2": 0.8, "factor_3": 0.9, "factor_4": 0.7,
                    "factor_5": 0.6, "factor_6": 0.5, "factor_7": 0.4}},
        {"model": "FindBestStation.station", "pk": 2,
         "fields": {"station_code": 150, "station_name": "서울역",
                    "x": 126.9707, "y": 37.5547,
                    "factor_2": 0.1, "factor_3": 0.2, "factor_4": 0.3,
                    "factor_5": 0.4, "factor_6": 0.5, "factor_7": 0.6}}
    ]"#;

    #[test]
    fn parses_fixture_entries() {
        let records = parse_fixture(FIXTURE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station_code, "222");
        assert_eq!(records[0].station_name, "강남");
        assert_eq!(records[0].x, 127.0276);
        assert_eq!(records[1].station_code, "150");
        assert_eq!(records[1].factor_7, 0.6);
    }

    #[test]
    fn converts_to_station_factors() {
        let record = parse_fixture(FIXTURE).unwrap().remove(0);
        let factors = record.into_factors();

        assert_eq!(factors.station_name, "강남");
        assert_eq!(factors.factor_3, 0.9);
    }

    #[test]
    fn rejects_missing_factor_columns() {
        let json = r#"[{"model": "m", "pk": 1,
            "fields": {"station_code": "1", "station_name": "A", "x": 0, "y": 0}}]"#;
        assert!(matches!(parse_fixture(json), Err(FactorStoreError::Json(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let records = load_fixture(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_fixture(Path::new("/nonexistent/factor.json")).unwrap_err();
        assert!(matches!(err, FactorStoreError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/factor.json"));
    }
}
