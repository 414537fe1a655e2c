pub mod cors;
pub mod response;

pub use response::HttpResponse;
