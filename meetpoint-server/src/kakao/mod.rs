//! Kakao Local API client.
//!
//! Provides station search around a point and administrative region lookup,
//! implementing [`PlaceSearch`](crate::finder::PlaceSearch) and
//! [`RegionProvider`](crate::finder::RegionProvider).

mod client;
mod error;
mod types;

pub use client::{KakaoClient, KakaoConfig};
pub use error::KakaoError;
