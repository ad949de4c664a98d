pub mod partition;
pub mod store;

pub use partition::{partition, IdentifierSet, Partition};
pub use store::{Record, RecordCollection, RecordId, RecordStore};
