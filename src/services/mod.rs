pub mod aggregator;
pub mod debouncer;
pub mod dedup;
pub mod normalizer;
pub mod search_toggle;
pub mod session;

pub use aggregator::{AggregationSnapshot, PaginationAggregator};
pub use debouncer::{DebounceTimer, SearchDebouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use dedup::Deduplicator;
pub use normalizer::ItemNormalizer;
pub use search_toggle::{SearchVisibilityController, Transition};
pub use session::{CatalogSession, SessionError};
