//! Amenity factors and their per-request weights.

use std::collections::HashMap;
use std::fmt;

/// Error returned when parsing a factor id outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid factor id {0}: must be between 2 and 7")]
pub struct InvalidFactorId(pub i64);

/// Identifier of an amenity factor.
///
/// Factor ids form the fixed set `2..=7`, one per `factor_N` column of the
/// station factor data. Any `FactorId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use meetpoint_server::domain::FactorId;
///
/// let dining = FactorId::new(3).unwrap();
/// assert_eq!(dining.get(), 3);
///
/// assert!(FactorId::new(1).is_err());
/// assert!(FactorId::new(8).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactorId(u8);

impl FactorId {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 7;

    /// Parse a factor id, rejecting anything outside `2..=7`.
    pub fn new(id: i64) -> Result<Self, InvalidFactorId> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&id) {
            Ok(Self(id as u8))
        } else {
            Err(InvalidFactorId(id))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactorId({})", self.0)
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amenity appeal values for one station.
///
/// Reference data owned by the factor store; read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct StationFactors {
    /// Provider station code.
    pub station_code: String,
    /// Station name as stored.
    pub station_name: String,
    pub factor_2: f64,
    pub factor_3: f64,
    pub factor_4: f64,
    pub factor_5: f64,
    pub factor_6: f64,
    pub factor_7: f64,
}

impl StationFactors {
    /// The stored value for a factor.
    pub fn value(&self, id: FactorId) -> f64 {
        match id.get() {
            2 => self.factor_2,
            3 => self.factor_3,
            4 => self.factor_4,
            5 => self.factor_5,
            6 => self.factor_6,
            _ => self.factor_7,
        }
    }
}

/// Per-request weights for factor ids.
///
/// Unspecified factors weigh 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorWeights {
    weights: HashMap<FactorId, f64>,
}

impl FactorWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight for a factor, replacing any previous value.
    pub fn set(&mut self, id: FactorId, weight: f64) {
        self.weights.insert(id, weight);
    }

    /// Builder-style variant of [`FactorWeights::set`].
    pub fn with(mut self, id: FactorId, weight: f64) -> Self {
        self.set(id, weight);
        self
    }

    /// The weight for a factor, defaulting to 1.0.
    pub fn weight(&self, id: FactorId) -> f64 {
        self.weights
            .get(&id)
            .copied()
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> StationFactors {
        StationFactors {
            station_code: "S1".to_string(),
            station_name: "Test".to_string(),
            factor_2: 0.2,
            factor_3: 0.3,
            factor_4: 0.4,
            factor_5: 0.5,
            factor_6: 0.6,
            factor_7: 0.7,
        }
    }

    #[test]
    fn parse_valid_ids() {
        for id in 2..=7 {
            assert_eq!(FactorId::new(id).unwrap().get() as i64, id);
        }
    }

    #[test]
    fn reject_invalid_ids() {
        assert_eq!(FactorId::new(0), Err(InvalidFactorId(0)));
        assert!(FactorId::new(1).is_err());
        assert!(FactorId::new(8).is_err());
        assert!(FactorId::new(-3).is_err());
        assert!(FactorId::new(i64::MAX).is_err());
    }

    #[test]
    fn value_maps_id_to_field() {
        let f = factors();
        for id in (2..=7).map(|i| FactorId::new(i).unwrap()) {
            let expected = id.get() as f64 / 10.0;
            assert!((f.value(id) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn weights_default_to_one() {
        let three = FactorId::new(3).unwrap();
        let five = FactorId::new(5).unwrap();
        let weights = FactorWeights::new().with(three, 2.5);

        assert_eq!(weights.weight(three), 2.5);
        assert_eq!(weights.weight(five), 1.0);
    }
}
