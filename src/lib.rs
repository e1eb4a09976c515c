//! # AICP
//!
//! Access-control core for residential communities.
//!
//! ## Quick Start
//!
//! ```rust
//! use aicp::{decode, SubjectType};
//!
//! let token = decode(r#"{"t":"visitor","id":42}"#).unwrap();
//! assert_eq!(token.subject_type, SubjectType::Visitor);
//! assert_eq!(token.subject_id, "42");
//!
//! let invalid = decode("{}").unwrap_err();
//! assert_eq!(invalid.reason(), "missing type or id");
//! ```
//!
//! ## Payload shapes
//!
//! Scanners hand over whatever the QR image encodes:
//!
//! 1. **JSON**: `{"t":"event","id":9}`
//! 2. **URL-embedded JSON**: `https://host/qr?data=%7B...%7D`, encoded once or twice
//! 3. **Salvage**: a numeric `id` found in an otherwise broken `data` fragment
//!    becomes a resident pass
//!
//! ## Modules
//!
//! - `qr`: pure payload decoding
//! - `scan`: lookup-backed resolution and the visitor presence cycle
//! - `stats`: category datasets and access aggregation for charts
//! - `format`: Spanish date/time labels

pub mod config;
pub mod fallback;
pub mod format;
pub mod logging;
pub mod qr;
pub mod scan;
pub mod stats;

pub use qr::{decode, parse_payload, AccessToken, InvalidPayload, PayloadSource, SubjectType};
pub use scan::{
    DirectoryLookup, LookupError, PresenceStatus, ScanOutcome, ScanResolver, SubjectDetails,
    SubjectLookup,
};
pub use stats::{AccessRecord, AccessStats, ChartDataset};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
