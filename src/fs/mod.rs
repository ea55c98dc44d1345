//! Filesystem module.
//!
//! Provides:
//! - Temp artifacts and their cleanup
//! - Work directory paths
//! - Filename generation and manipulation

pub mod artifact;
pub mod naming;
pub mod paths;

pub use artifact::{remove_quietly, LocalArtifact};
pub use naming::{
    delivery_filename, make_unique_filename, picker_filename, sanitize_filename, title_to_stem,
};
pub use paths::{download_path, ensure_dir, extraction_template, remove_attempt_files};
