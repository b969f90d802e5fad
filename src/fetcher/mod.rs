pub mod client;
pub mod decode;
pub mod errors;
pub mod source;
pub mod types;

pub use client::{fetch, fetch_with_timeout};
pub use errors::FetchError;
pub use source::{FetchedPage, HttpPageFetcher, PageFetcher};
pub use types::{Charset, PageResponse};
