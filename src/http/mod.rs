//! HTTP protocol layer module
//!
//! HTTP building blocks shared by both servers, decoupled from request dispatch.

pub mod conditional;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    allow_any_origin, build_400_response, build_403_response, build_404_response,
    build_500_response, build_501_response, build_502_response, build_error_response,
};
