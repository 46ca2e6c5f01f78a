//! Application Layer
//!
//! Orchestrates the domain through use cases:
//!
//! - **Ports**: Interfaces for storage, event consumers and rate sources
//! - **Use Cases**: The batch risk calculation
//! - **DTOs**: Calculation requests and result documents

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
