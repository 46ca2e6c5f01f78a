//! Domain Layer
//!
//! Pure business logic with no I/O. Organized by bounded context:
//!
//! - `valuation` - exchange rates and the per-batch rate cache
//! - `protection` - mitigation conversion and exposure netting
//! - `analysis` - shares, breakdowns, HHI and the portfolio analysis aggregate
//! - `classification` - country to geographic region mapping
//! - `parameters` - the bank's risk parameters aggregate
//! - `compliance` - interpretation of an analysis against the parameters

pub mod analysis;
pub mod classification;
pub mod compliance;
pub mod events;
pub mod parameters;
pub mod protection;
pub mod shared;
pub mod valuation;

pub use events::RiskCalculationEvent;
