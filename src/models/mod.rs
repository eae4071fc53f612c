pub mod category;
pub mod media;
pub mod search;

pub use category::{
    CategoryConfig, CategoryRegistry, Endpoint, ListingFilters, ListingQuery, DEFAULT_SORT_BY,
    NETFLIX_PROVIDER_ID,
};
pub use media::{build_image_url, ImageSize, MediaItem, MediaKind, TMDB_IMAGE_BASE};
pub use search::{SearchSnapshot, Visibility};
