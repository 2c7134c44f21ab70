pub mod paginator;
pub mod queries;
pub mod repository;
pub mod service;

pub use paginator::{plan_slices, PageIds, Paginator, SliceRequest};
pub use queries::Scope;
pub use repository::{PartitionRepository, PgPartitionRepository};
pub use service::ListingService;
