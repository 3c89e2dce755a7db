//! Meeting-point station finder server.
//!
//! A web application that answers: "we are in these places, which transit
//! station should we meet at?"

pub mod cache;
pub mod domain;
pub mod factors;
pub mod finder;
pub mod geo;
pub mod kakao;
pub mod odsay;
pub mod web;
