/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod notice_request;
mod notice_response;

pub use notice_request::{NoticeRequest, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use notice_response::NoticeResponse;
