//! Thing Console - IoT Device Management Client
//!
//! Client library for a device management service: token-based session,
//! device snapshot and live property readings, template-driven property
//! writes, a paginated device roster and a property history query engine.
//!
//! Layering mirrors the page it drives: `services` talks to the API,
//! `state` holds plain data behind locks, and `features` hosts the
//! controllers that tie the two together and surface failures as notices.

pub mod connection;
pub mod constants;
pub mod domain;
pub mod error;
pub mod features;
pub mod helpers;
pub mod services;
pub mod state;
pub mod utils;
