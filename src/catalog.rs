//! Remote catalog access: search results and track URL resolution.
//!
//! `Catalog` is the seam the player talks to; `HttpCatalog` is the
//! blocking HTTP implementation used at runtime.

mod client;
mod model;

pub use client::{Catalog, CatalogError, HttpCatalog};
pub use model::{Track, TrackId};

#[cfg(test)]
mod tests;
