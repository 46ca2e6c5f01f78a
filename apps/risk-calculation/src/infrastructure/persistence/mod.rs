//! Persistence adapters.

mod in_memory_parameters;

pub use in_memory_parameters::InMemoryRiskParametersRepository;
