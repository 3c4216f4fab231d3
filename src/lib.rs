//! lain-auth - toggle auth for a LAIN cluster and bootstrap SSO app groups.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create SSO groups for apps
//! │   ├── open          # Enable console/registry auth
//! │   ├── close         # Disable console/registry auth
//! │   └── status        # Show auth state per scope
//! └── core/             # Core library components
//!     ├── scope         # Auth scope state machine
//!     ├── provision     # SSO group provisioning
//!     ├── config        # Settings (defaults, TOML file, env)
//!     ├── store/        # Config store backends
//!     │   ├── etcd      # etcd v2 keys API
//!     │   └── memory    # In-process map
//!     ├── container/    # Container control
//!     │   └── docker    # docker CLI
//!     ├── sso           # SSO login and group creation
//!     └── directory     # App listings (static, console API)
//! ```
//!
//! # Scopes
//!
//! - **console**: settings at `/config/auth/console`, read by the console on
//!   every request
//! - **registry**: settings at `/config/auth/registry`, applied by restarting
//!   the registry container

pub mod cli;
pub mod core;
pub mod error;
