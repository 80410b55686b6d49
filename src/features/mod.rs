//! Features - Page Controllers
//!
//! One controller per page concern. Controllers own their state behind a
//! lock, call the service layer, and surface every failure as a notice while
//! leaving prior state untouched.

pub mod device;
pub mod history;
pub mod panel;
pub mod roster;
