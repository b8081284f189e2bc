// Adapters layer: concrete RecordLoader implementations.

pub mod fs;
pub mod memory;

pub use fs::FsLoader;
pub use memory::MemoryLoader;
