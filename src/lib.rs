// Library exports for pe-resource-dump

pub mod config;
pub mod dump_worker;
pub mod pipeline;
pub mod resource;

pub use pipeline::{dump, icocur, sniff};
pub use resource::{MemoryResources, PeResources, ResourceId, ResourceProvider, TypeId};
