/// Catalog access trait used by the crawler
pub mod catalog;
/// Data entities for playlists, tracks and stored rows
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Local storage using `DuckDB`
pub mod local_storage;
/// Spotify API client
pub mod spotify;

pub use catalog::Catalog;
pub use local_storage::{LocalStorage, RecordSink};
pub use spotify::SpotifyClient;
