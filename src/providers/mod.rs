//! Location search provider implementations

pub mod google_places;

// Re-export providers for convenience
pub use google_places::{GooglePlacesConfig, GooglePlacesProvider};
