//! Anime metadata from the Jikan API (MyAnimeList unofficial API).

pub mod client;
pub mod types;

pub use client::{JikanClient, MetadataError};
pub use types::*;
