//! Dub provider backends for the anime portal.
//!
//! A dub provider is one source of localized video for an anime episode.
//! This crate defines the provider contract, the concrete providers
//! (AniDub, AnimeVost and a network-free mock), the page scraper used as a
//! first resolution step, and the registry that maps provider names to
//! instances.

mod api;
pub mod anidub;
pub mod animevost;
pub mod error;
pub mod mock;
pub mod provider;
pub mod registry;
pub mod scrape;

pub use anidub::AniDubProvider;
pub use animevost::AnimeVostProvider;
pub use error::ProviderError;
pub use mock::MockProvider;
pub use provider::{default_qualities, DubProvider, EpisodeOptions, DEFAULT_QUALITIES, FALLBACK_URL};
pub use registry::{ProviderEndpoints, ProviderRegistry, RegistryMode};
