#![forbid(unsafe_code)]
//! Storage collaborators for the solution catalog.
//!
//! [`SqliteStore`] persists the `naturebasedsolution`, `adaptationtarget`
//! and `nbs_target_assoc` tables. [`MemoryStore`] keeps the same records in
//! an id-keyed arena for tests and ephemeral runs.

mod error;
mod memory;
mod schema;
mod sqlite;
mod url;

pub use error::{StoreError, StoreErrorCode};
pub use memory::MemoryStore;
pub use schema::{SCHEMA_SQL, SQLITE_SCHEMA_VERSION};
pub use sqlite::SqliteStore;
pub use url::{parse_database_url, DatabaseLocation};

pub const CRATE_NAME: &str = "nbs-store";
