// ABOUTME: Leadflow offers library - offer catalogue and question flow lookups
// ABOUTME: Provides the typed registry keyed by offer and intent used by the chat engine

pub mod builtin;
pub mod error;
pub mod registry;

pub use builtin::{builtin, HOME_VALUATION, REAL_ESTATE_TIMELINE};
pub use error::{RegistryError, Result};
pub use registry::{OfferRegistry, OfferRegistryBuilder};
