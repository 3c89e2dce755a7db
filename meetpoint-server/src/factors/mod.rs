//! Station amenity factor reference data.
//!
//! Factor records are loaded once at startup from a JSON fixture and looked
//! up by normalized station name.

mod error;
mod loader;
mod store;

pub use error::FactorStoreError;
pub use loader::{FactorRecord, load_fixture, parse_fixture};
pub use store::FactorStore;
