//! Harbor Media - external media hosting
//!
//! Uploads staged local files to a Cloudinary-compatible image host and
//! hands back hosted URLs. Uploads are fallible and never retried; the
//! staged temp file is removed whether or not the upload succeeds.

pub mod cloudinary;
pub mod error;
pub mod uploader;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};
pub use error::MediaConfigError;
pub use uploader::{MediaUploader, UploadedMedia};
