//! Core library components.
//!
//! The auth scope state machine and the SSO group provisioner, plus the
//! clients they drive. Nothing here reads the environment or prints.

pub mod config;
pub mod constants;
pub mod container;
pub mod directory;
pub mod pause;
pub mod provision;
pub mod scope;
pub mod sso;
pub mod store;
pub mod types;
pub mod validation;
