pub mod pagination;
pub mod response;

pub use pagination::{ItemsResponse, PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
