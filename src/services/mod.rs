//! Service Layer
//!
//! Abstraction over the cloud HTTP API: token lifecycle, envelope decoding,
//! the per-endpoint fetchers and writers, and the event channel toward the
//! front end.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ServiceHub                            │
//! │  ┌──────────┐ ┌───────────┐ ┌─────────┐ ┌──────────────┐    │
//! │  │ TokenMgr │ │ DeviceApi │ │ Writer  │ │ Roster/Hist/ │    │
//! │  │ (bearer) │ │ (fetch)   │ │ (batch) │ │ Control APIs │    │
//! │  └──────────┘ └───────────┘ └─────────┘ └──────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ ServiceEvent
//! ┌──────────────────────────────────────────────────────────────┐
//! │               Controllers + State Layer                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod control;
mod device;
mod envelope;
mod events;
mod history;
mod hub;
mod roster;
mod token;
pub mod transport;
mod writer;

pub use control::*;
pub use device::*;
pub use envelope::*;
pub use events::*;
pub use history::*;
pub use hub::*;
pub use roster::*;
pub use token::*;
pub use transport::*;
pub use writer::*;
