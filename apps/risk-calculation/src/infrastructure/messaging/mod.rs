//! Event publishing adapters.

mod in_memory_publisher;

pub use in_memory_publisher::InMemoryEventPublisher;
