//! Directory serving with corrected MIME types
//!
//! Plain GET/HEAD file serving from a root directory (index files, directory
//! listings, `If-Modified-Since`), with two adjustments on every response:
//! a fixed `Content-Type` for script, style, markup and JSON paths, and
//! `Access-Control-Allow-Origin: *`.

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::listing;
use super::RequestHandler;
use crate::http::{self, conditional, mime, response};
use crate::logger;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Handler of the MIME-correcting static server
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
}

impl StaticSite {
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn serve(&self, req: &Request<Incoming>) -> Response<Full<Bytes>> {
        let is_head = match *req.method() {
            Method::GET => false,
            Method::HEAD => true,
            ref other => return http::build_501_response(other),
        };

        let url_path = req.uri().path();
        let mut path = translate_path(&self.root, url_path);

        if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            if !url_path.ends_with('/') {
                let mut location = format!("{url_path}/");
                if let Some(query) = req.uri().query() {
                    location.push('?');
                    location.push_str(query);
                }
                return response::build_redirect_response(&location);
            }

            match find_index(&path).await {
                Some(index) => path = index,
                None => return serve_listing(&path, url_path, is_head).await,
            }
        } else if url_path.ends_with('/') {
            return http::build_404_response();
        }

        let modified = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta.modified().ok(),
            _ => return http::build_404_response(),
        };

        if let Some(modified) = modified {
            let if_modified_since = req
                .headers()
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok());
            let has_if_none_match = req.headers().contains_key(IF_NONE_MATCH);
            if conditional::is_not_modified(if_modified_since, has_if_none_match, modified) {
                return response::build_304_response(&conditional::format_http_date(modified));
            }
        }

        match fs::read(&path).await {
            Ok(content) => response::build_file_response(
                Bytes::from(content),
                mime::content_type_for_path(&path),
                modified.map(conditional::format_http_date).as_deref(),
                is_head,
            ),
            Err(e) => {
                logger::log_file_error(&e);
                http::build_404_response()
            }
        }
    }
}

impl RequestHandler for StaticSite {
    async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let mut response = self.serve(&req).await;

        if let Some(content_type) = mime::corrected_content_type(req.uri().path()) {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response::allow_any_origin(&mut response);

        response
    }
}

/// Map a URL path onto `root`
///
/// The path is percent-decoded, then `.` and empty segments are dropped and
/// `..` removes the previous segment without ever climbing above `root`.
pub fn translate_path(root: &Path, url_path: &str) -> PathBuf {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}

async fn find_index(dir: &Path) -> Option<PathBuf> {
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

async fn serve_listing(dir: &Path, url_path: &str, is_head: bool) -> Response<Full<Bytes>> {
    let entries = match listing::read_listing(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory: {e}"));
            return http::build_error_response(
                StatusCode::NOT_FOUND,
                "No permission to list directory",
            );
        }
    };

    let display_path = percent_decode_str(url_path).decode_utf8_lossy();
    let html = listing::render_listing(&display_path, &entries);
    response::build_file_response(Bytes::from(html), "text/html; charset=utf-8", None, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_plain_paths() {
        let root = Path::new("/srv/site");
        assert_eq!(translate_path(root, "/"), PathBuf::from("/srv/site"));
        assert_eq!(
            translate_path(root, "/js/app.js"),
            PathBuf::from("/srv/site/js/app.js")
        );
        assert_eq!(
            translate_path(root, "/a//b/./c"),
            PathBuf::from("/srv/site/a/b/c")
        );
    }

    #[test]
    fn test_translate_decodes_percent_escapes() {
        let root = Path::new("/srv/site");
        assert_eq!(
            translate_path(root, "/my%20file.txt"),
            PathBuf::from("/srv/site/my file.txt")
        );
    }

    #[test]
    fn test_translate_never_climbs_above_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            translate_path(root, "/../../etc/passwd"),
            PathBuf::from("/srv/site/etc/passwd")
        );
        assert_eq!(
            translate_path(root, "/a/../../b"),
            PathBuf::from("/srv/site/b")
        );
        assert_eq!(
            translate_path(root, "/%2e%2e/%2e%2e/etc/passwd"),
            PathBuf::from("/srv/site/etc/passwd")
        );
    }
}
