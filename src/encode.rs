//! Encode-phase collaborators.
//!
//! The harness hands the finished canvas to an [`codec::ImageCodec`] and the resulting stream to
//! an [`sink::ArtifactSink`].

/// Codec trait and the `image`-backed JPEG codec.
pub mod codec;
/// Artifact sinks (file and in-memory).
pub mod sink;
