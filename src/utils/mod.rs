//! Utils - Shared Utilities

pub mod format;
