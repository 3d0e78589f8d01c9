//! Middleware modules.

pub mod cors;
pub mod error;
