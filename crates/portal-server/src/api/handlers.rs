mod anime;
mod providers;

pub use anime::*;
pub use providers::*;

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}
