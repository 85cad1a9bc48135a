//! Type definitions for raspy

pub mod error;
pub mod image;
pub mod settings;
pub mod template;
pub mod user;

pub use error::{Error, Result};
pub use image::Image;
pub use settings::{CaptureTimeout, ComparisonLevel, DuplicateMode};
pub use template::Eigenvalues;
pub use user::{Identification, Permission, UserId, UserRecord};
