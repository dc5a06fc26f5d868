//! Request handler module
//!
//! Request dispatch for both servers:
//! - [`StaticSite`]: directory serving with corrected MIME types (mime-server)
//! - [`DevProxy`]: `/api` forwarding plus static files (proxy-server)

pub mod dev_proxy;
mod listing;
pub mod static_files;
pub mod static_site;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response};
use std::future::Future;

pub use dev_proxy::DevProxy;
pub use static_site::StaticSite;

/// A server's request handler
///
/// Failures are turned into HTTP responses by the handler itself, so the
/// returned future cannot fail.
pub trait RequestHandler: 'static {
    fn handle(&self, req: Request<Incoming>) -> impl Future<Output = Response<Full<Bytes>>>;
}
