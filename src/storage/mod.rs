// Storage backends shared by the repositories
//
// `MemoryStore` implements every repository trait in one process; `mysql` holds the
// pool-level pieces (migrations, readiness probe) used next to the per-module MySQL
// repositories.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::{run_migrations, MySqlHealthProbe};
