//! # raspy
//!
//! Rust driver for UART optical fingerprint sensor modules.
//!
//! ## Features
//!
//! - Typed requests for the full command set
//! - Async/await API using Tokio
//! - Three-step enrollment and template transfer workflows
//! - Warn-and-proceed handling of framing faults, hard errors on bad lengths
//!
//! ## Quick Start
//!
//! ```no_run
//! use raspy::{Identification, Sensor, TcpTransport};
//!
//! #[tokio::main]
//! async fn main() -> raspy::Result<()> {
//!     // Serial bridge in front of the module
//!     let transport = TcpTransport::connect("192.168.1.50", 4001).await?;
//!     let mut sensor = Sensor::new(transport);
//!
//!     match sensor.identify().await? {
//!         Identification::Match { user, permission } => {
//!             println!("User {} (permission {})", user, permission)
//!         }
//!         Identification::NoMatch => println!("Unknown finger"),
//!     }
//!
//!     sensor.close().await?;
//!     Ok(())
//! }
//! ```

pub mod directory;
pub mod enroll;
pub mod error;
pub mod request;
pub mod sensor;

mod transfer;

#[cfg(test)]
mod testing;

// Re-exports
pub use directory::decode_users;
pub use enroll::{EnrollReport, EnrollState, FinalStep};
pub use error::{Error, Result};
pub use request::{CountKind, EnrollStep, PayloadLen, Request, Setting};
pub use sensor::Sensor;

// Re-export protocol and domain types
pub use raspy_core::{AckStatus, Command, Response, Session, SessionStats};
pub use raspy_transport::{SerialSettings, StreamTransport, TcpTransport, Transport};
pub use raspy_types::{
    CaptureTimeout, ComparisonLevel, DuplicateMode, Eigenvalues, Identification, Image,
    Permission, UserId, UserRecord,
};
