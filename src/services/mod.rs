//! Business logic services.

pub mod populate;
pub mod storage;
pub mod upload;

pub use populate::PopulateService;
pub use storage::MediaStorage;
