//! Kakao Local API response DTOs.
//!
//! Coordinates arrive as decimal strings (`x` is longitude, `y` latitude).

use serde::Deserialize;

/// Response from `/v2/local/search/keyword.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSearchResponse {
    pub documents: Vec<PlaceDocument>,
}

/// A place returned by keyword search.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDocument {
    pub id: String,
    pub place_name: String,
    pub x: String,
    pub y: String,

    /// `"SW8"` for subway stations. Empty for uncategorised places.
    #[serde(default)]
    pub category_group_code: String,
}

/// Response from `/v2/local/geo/coord2regioncode.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionCodeResponse {
    pub documents: Vec<RegionDocument>,
}

/// One region classification of a coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionDocument {
    /// `"H"` for administrative dong, `"B"` for legal dong.
    pub region_type: String,
    pub region_1depth_name: String,
    pub region_2depth_name: String,
}
