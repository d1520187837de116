//! Response models for the cache administration API

pub mod responses;

pub use responses::{DataResponse, ErrorResponse, MessageResponse};
