//! Frame memory: the reusable decode buffer, host-owned planar output frames, and the transforms
//! between them.

/// Reusable decode scratch buffer.
pub mod buffer;
/// Planar output frames.
pub mod output;
/// Packed-to-planar repack routines.
pub mod repack;
