//! Domain - Core Data Types
//!
//! Plain data types shared between the service and state layers.

pub mod device;
pub mod history;
pub mod template;
