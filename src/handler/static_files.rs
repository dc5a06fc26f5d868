//! Static file serving module for the proxy server
//!
//! Maps request paths onto a fixed root with a canonicalize-then-compare
//! traversal guard.

use crate::http::{self, mime, response::build_file_response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Result of mapping a request path onto the static root
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Canonical path of an existing regular file inside the root
    File(PathBuf),
    NotFound,
    /// Resolves outside the root
    Forbidden,
    /// Canonicalization failed
    BadRequest,
}

/// Serve a request path from `root`
pub async fn serve_static(root: &Path, request_path: &str) -> Response<Full<Bytes>> {
    match locate(root, request_path) {
        Lookup::File(path) => serve_file(&path).await,
        Lookup::NotFound => http::build_404_response(),
        Lookup::Forbidden => http::build_403_response(),
        Lookup::BadRequest => http::build_400_response(),
    }
}

/// Read a located file fully and answer 200, or 500 on read failure
pub async fn serve_file(path: &Path) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => build_file_response(
            Bytes::from(content),
            mime::content_type_for_path(path),
            None,
            false,
        ),
        Err(e) => {
            logger::log_file_error(&e);
            http::build_500_response()
        }
    }
}

/// Map a request path onto `root`
///
/// `/` means `/index.html`. Both the candidate and the root are canonicalized
/// before the containment check, so `..` segments and symlinks are judged by
/// where they really point.
pub fn locate(root: &Path, request_path: &str) -> Lookup {
    let request_path = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };
    let candidate = root.join(request_path.trim_start_matches('/'));

    let (file, root) = match (resolve(&candidate), resolve(root)) {
        (Ok(file), Ok(root)) => (file, root),
        (Err(e), _) | (_, Err(e)) => {
            logger::log_warning(&format!("Cannot resolve '{request_path}': {e}"));
            return Lookup::BadRequest;
        }
    };

    if !file.starts_with(&root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return Lookup::Forbidden;
    }

    if file.is_file() {
        Lookup::File(file)
    } else {
        Lookup::NotFound
    }
}

/// Canonicalize `path`, tolerating components that do not exist yet
///
/// The longest existing prefix is canonicalized and the missing tail is
/// applied lexically, so a missing file still gets a real location to check.
/// Any failure other than "not found" is returned as is.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let err = match path.canonicalize() {
        Ok(canonical) => return Ok(canonical),
        Err(e) if e.kind() == io::ErrorKind::NotFound => e,
        Err(e) => return Err(e),
    };

    let mut components = path.components();
    let last = components.next_back();
    let parent = components.as_path();

    match last {
        Some(Component::Normal(name)) => Ok(resolve(parent)?.join(name)),
        Some(Component::CurDir) => resolve(parent),
        Some(Component::ParentDir) => {
            let base = resolve(parent)?;
            Ok(base.parent().map_or_else(|| base.clone(), Path::to_path_buf))
        }
        _ => Err(err),
    }
}
