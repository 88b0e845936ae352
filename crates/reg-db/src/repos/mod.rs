//! Repository modules implementing persistence for registrar entities.
//!
//! Each module adds methods to `RegService` via `impl RegService` blocks.

pub mod student;
