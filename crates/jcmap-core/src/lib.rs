//! JCMap Core — domain models, error taxonomy, repository traits, and
//! the image-storage collaborator seam.
//!
//! This crate has no database or HTTP dependency; the `jcmap-db` crate
//! implements the repository traits and `jcmap-service` builds the
//! domain rules on top of them.

pub mod error;
pub mod media;
pub mod models;
pub mod repository;
