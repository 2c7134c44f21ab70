pub mod lot;
pub mod model;
pub mod status;

pub use model::{
    EnrichedRow, FilterSet, ListingFilters, ListingKind, ListingPage, ListingRecord,
    ListingSource, ListingStatus, SortOrder, MAX_PER_PAGE,
};
