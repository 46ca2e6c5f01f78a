//! Protection bounded context.
//!
//! Converts mitigations to EUR and nets each exposure against them.

pub mod mitigation;
pub mod protected_exposure;

pub use mitigation::{Mitigation, MitigationType};
pub use protected_exposure::ProtectedExposure;
