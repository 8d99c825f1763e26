//! Sequence construction: parameters, manifest files, and cross-file validation.

/// JSON manifest config.
pub mod manifest;
/// Construction parameters.
pub mod options;
/// Header-only validation of the whole file list.
pub mod validate;
