pub mod choice;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod genre;
pub mod sort;
pub mod sort_key;
pub mod stats;
pub mod store;
pub mod validate;

pub use choice::{resolve_choice, ChoiceSet};
pub use error::{CatalogError, Result};
pub use filter::{FilterConfig, FilterEngine, GenreRule};
pub use fuzzy::MatchType;
pub use sort::{sort_by_column, Column, SortDirection};
pub use sort_key::{normalize, CellValue, SortKey};
pub use stats::{summarize, CollectionStats};
pub use store::MovieStore;
