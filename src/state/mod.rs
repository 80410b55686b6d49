//! State - Application State Modules
//!
//! Each state module is a plain struct owned by its controller behind a lock;
//! the host scheduling model is cooperative, so consistency relies on short
//! lock scopes that never span an await.

pub mod device_state;
pub mod history_state;
pub mod roster_state;
pub mod tabs_state;
