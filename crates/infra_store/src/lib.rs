//! Infrastructure Store Layer
//!
//! In-memory implementations of the `DocumentStore` and `BlobStore` port
//! traits from `core_kernel`. These back the dev server binary and every
//! test; production deployments plug the managed store behind the same
//! traits.

pub mod blob;
pub mod memory;

pub use blob::MemoryBlobStore;
pub use memory::MemoryStore;
