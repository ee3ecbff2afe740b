//! Services module
//!
//! Business logic services that coordinate between HTTP handlers and the
//! repository and upload store.

pub mod content;
pub mod documents;

pub use content::ContentService;
pub use documents::{CategoryOption, DocumentListing, DocumentsService, FileUpload};
