//! Adapter implementations
//!
//! Adapters implement the port traits:
//! - Random (UUID v4) identifiers for identity-based de-duplication
//! - Content fingerprint identifiers for content-based de-duplication

pub mod ids;

pub use ids::{FingerprintIds, RandomIds};
