pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::CafeService;
pub use domain::cafe::{Cafe, CafeError, CafeField, ErrorKind};
pub use infra::{ApiDocumentation, ApiKey, AppConfig};
pub use storage::{CafeStore, MemoryCafeStore, PostgresCafeStore};
