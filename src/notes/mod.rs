//! Notes module
//!
//! Free-form notes filed under at most one PARA parent, plus the directed
//! connection graph between them.

pub mod manager;
pub mod models;

pub use manager::NoteManager;
pub use models::*;
