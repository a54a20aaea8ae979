//! In-process caching of full collections.
//!
//! One cache per entity kind, holding the last full collection fetched from
//! the store. Writes through the facade drop the cache for their kind; the
//! next read fetches again.

mod layer;
mod traits;

pub use layer::CollectionCache;
pub use traits::{ListSource, Listing};
