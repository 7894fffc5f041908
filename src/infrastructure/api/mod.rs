//! Analysis service adapters

mod http;

pub use http::HttpAnalysisApi;
