//! Validated meeting request.

use super::{FactorId, FactorWeights, Location, ValidationError};

/// Minimum number of people in a meeting.
pub const MIN_LOCATIONS: usize = 2;

/// Maximum number of people in a meeting.
pub const MAX_LOCATIONS: usize = 5;

/// Maximum number of factors per request (one per factor id).
pub const MAX_FACTORS: usize = 6;

/// A meeting request that passed boundary validation.
///
/// Holds 2..=5 locations and up to six distinct factor ids with their
/// weights. Construct through [`MeetingRequest::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRequest {
    locations: Vec<Location>,
    factors: Vec<FactorId>,
    weights: FactorWeights,
}

impl MeetingRequest {
    /// Validate raw coordinates, factor ids and weights.
    ///
    /// `locations` are `(longitude, latitude)` pairs; `weights` are
    /// `(factor id, weight)` pairs and may mention factors not in `factors`
    /// (those are ignored by scoring).
    pub fn new(
        locations: &[(f64, f64)],
        factors: &[i64],
        weights: &[(i64, f64)],
    ) -> Result<Self, ValidationError> {
        if !(MIN_LOCATIONS..=MAX_LOCATIONS).contains(&locations.len()) {
            return Err(ValidationError::LocationCount(locations.len()));
        }
        if factors.len() > MAX_FACTORS {
            return Err(ValidationError::FactorCount(factors.len()));
        }

        let locations = locations
            .iter()
            .enumerate()
            .map(|(index, &(lon, lat))| {
                Location::new(lon, lat).map_err(|source| ValidationError::Location { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut parsed: Vec<FactorId> = Vec::with_capacity(factors.len());
        for &raw in factors {
            let id = FactorId::new(raw)?;
            if parsed.contains(&id) {
                return Err(ValidationError::DuplicateFactor(id.get()));
            }
            parsed.push(id);
        }

        let mut factor_weights = FactorWeights::new();
        for &(raw, weight) in weights {
            let id = FactorId::new(raw)?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(ValidationError::Weight {
                    factor: id.get(),
                    weight,
                });
            }
            factor_weights.set(id, weight);
        }

        Ok(Self {
            locations,
            factors: parsed,
            weights: factor_weights,
        })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Requested factor ids, in request order.
    pub fn factors(&self) -> &[FactorId] {
        &self.factors
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEOUL: (f64, f64) = (126.9780, 37.5665);
    const GANGNAM: (f64, f64) = (127.0276, 37.4979);

    #[test]
    fn valid_request() {
        let req = MeetingRequest::new(&[SEOUL, GANGNAM], &[3, 5], &[(3, 2.0)]).unwrap();

        assert_eq!(req.locations().len(), 2);
        assert_eq!(
            req.factors().iter().map(|f| f.get()).collect::<Vec<_>>(),
            vec![3, 5]
        );
        assert_eq!(req.weights().weight(FactorId::new(3).unwrap()), 2.0);
        assert_eq!(req.weights().weight(FactorId::new(5).unwrap()), 1.0);
    }

    #[test]
    fn no_factors_is_valid() {
        assert!(MeetingRequest::new(&[SEOUL, GANGNAM], &[], &[]).is_ok());
    }

    #[test]
    fn rejects_location_count() {
        assert_eq!(
            MeetingRequest::new(&[SEOUL], &[], &[]),
            Err(ValidationError::LocationCount(1))
        );
        assert_eq!(
            MeetingRequest::new(&[SEOUL; 6], &[], &[]),
            Err(ValidationError::LocationCount(6))
        );
    }

    #[test]
    fn rejects_too_many_factors() {
        assert_eq!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[2, 3, 4, 5, 6, 7, 2], &[]),
            Err(ValidationError::FactorCount(7))
        );
    }

    #[test]
    fn rejects_unknown_and_duplicate_factors() {
        assert!(matches!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[1], &[]),
            Err(ValidationError::Factor(_))
        ));
        assert_eq!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[3, 3], &[]),
            Err(ValidationError::DuplicateFactor(3))
        );
    }

    #[test]
    fn rejects_bad_coordinates_with_index() {
        let err = MeetingRequest::new(&[SEOUL, (127.0, 91.0)], &[], &[]).unwrap_err();
        assert!(matches!(err, ValidationError::Location { index: 1, .. }));
    }

    #[test]
    fn rejects_bad_weights() {
        assert!(matches!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[3], &[(3, -0.5)]),
            Err(ValidationError::Weight { factor: 3, .. })
        ));
        assert!(matches!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[3], &[(3, f64::NAN)]),
            Err(ValidationError::Weight { .. })
        ));
        assert!(matches!(
            MeetingRequest::new(&[SEOUL, GANGNAM], &[3], &[(9, 1.0)]),
            Err(ValidationError::Factor(_))
        ));
    }
}
