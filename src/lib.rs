//! tarkov-data library: fetches Escape from Tarkov companion collections
//! from the tarkov.dev GraphQL API and shapes them for display.

pub mod catalog;
pub mod collection;
pub mod data;
pub mod fetch;
pub mod graphql;
pub mod icons;
pub mod objective;
pub mod tasks;
pub mod wipe;

pub use collection::Collection;
pub use fetch::{DEFAULT_ENDPOINT, FetchError, Fetcher, HttpTransport, Transport, fetch_collection};
