//! HTTP client for the public character catalog.

mod client;
mod error;
mod types;

pub use client::CatalogClient;
pub use error::ApiError;
pub use types::{
    Character, CharacterPage, CharacterQuery, Episode, GenderFilter, PageInfo, Place,
    StatusBreakdown, StatusFilter,
};
