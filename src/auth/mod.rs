//! Authentication module: password accounts + JWT
//!
//! Provides:
//! - JWT token encoding/decoding (`jwt` submodule)
//! - Bearer-token gate for protected routes (`middleware` submodule)
//! - `AuthUser` handler extractor (`extractor` submodule)

pub mod extractor;
pub mod jwt;
pub mod middleware;
