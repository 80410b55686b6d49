//! Connection - Configuration and Credentials

mod config;
mod credential;

pub use config::*;
pub use credential::*;
