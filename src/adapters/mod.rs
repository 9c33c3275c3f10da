// Adapters layer: concrete implementations of the domain ports (storage, snapshot repository).

pub mod memory;
pub mod snapshot;
pub mod storage;

pub use memory::SnapshotRepository;
pub use snapshot::Snapshot;
pub use storage::LocalStorage;
