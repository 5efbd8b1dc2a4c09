//! Thumbnail generation pipeline
//!
//! The pipeline takes already-decoded upload buffers from the web layer and
//! drives decode → resize → encode → store for every requested size,
//! returning metadata for each persisted variant. All validation of user
//! input happens here, not in the HTTP handlers.

pub mod codec;
pub mod resize;
pub mod service;

pub use service::ThumbnailService;
