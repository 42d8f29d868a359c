//! Profile data along a network route for side view charts.

pub mod densify;
pub mod error;
pub mod io;
pub mod levels;
pub mod profile;
pub mod range;
pub mod settings;

pub use densify::{densify, densify_with_offset, STRUCTURE_OFFSET};
pub use error::ProfileError;
pub use profile::Profile;
