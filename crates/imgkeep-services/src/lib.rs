//! imgkeep Services Library
//!
//! Image lifecycle workflows composed over the image repository, the resize
//! service and the authenticator.

pub mod fan_out;
pub mod images;

pub use fan_out::join_pair;
pub use images::{ImageFiles, ImageUpdate, ImagesService};
