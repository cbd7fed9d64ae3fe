pub mod client;
pub mod error;
pub mod types;

pub use client::{ProviderClient, SeriesSource};
pub use error::ProviderError;
pub use types::{EndStatePlayer, EndStateTeam, SeriesEndState};
