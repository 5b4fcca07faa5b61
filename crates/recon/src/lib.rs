//! `idflags-recon` — Deleted-flag conflict reconciliation engine.
//!
//! Groups identity records by `(empid, login_id, emp_type)` and splits the
//! groups into valid conflicts and excluded groups. The engine itself is pure;
//! the `io` module holds the thin CSV adapters used by the CLI.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod io;
pub mod model;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{
    ClassifiedTables, ConflictRow, DeletionMarker, Group, IdentityKey, NonConflictRow, RawRecord,
    ReconResult, Status,
};
