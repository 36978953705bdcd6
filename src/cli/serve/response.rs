//! HTTP response handlers.

use super::inject::inject_hotreload;
use crate::utils::mime::{self, types};
use anyhow::{Context, Result};
use std::{fs, io::Read, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a file from the output directory, injecting the reload
/// client into HTML.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let body = if mime::is_html(content_type) {
        inject_hotreload(&body)
    } else {
        body
    };
    send_body(request, 200, content_type, body)
}

/// Respond with the generator's `404.html` when present, plain text otherwise.
pub fn respond_not_found(request: Request, serve_root: &Path) -> Result<()> {
    let custom = serve_root.join("404.html");

    if is_head_request(&request) {
        let content_type = if custom.is_file() { types::HTML } else { types::PLAIN };
        return send_head(request, 404, content_type);
    }

    if let Ok(body) = fs::read(&custom) {
        return send_body(request, 404, types::HTML, inject_hotreload(&body));
    }
    send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 while shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_body(request, 405, types::PLAIN, b"405 Method Not Allowed".to_vec())
}

/// Serve the reload client from memory.
pub fn respond_hotreload_js(request: Request, ws_port: u16) -> Result<()> {
    use crate::embed::serve::{HOTRELOAD_JS, HotreloadVars};

    let body = HOTRELOAD_JS.render(&HotreloadVars { ws_port });
    send_body(request, 200, types::JAVASCRIPT, body.into_bytes())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &str) -> Result<()> {
    let response = with_headers(Response::empty(StatusCode(status)), content_type);
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = with_headers(
        Response::from_data(body).with_status_code(StatusCode(status)),
        content_type,
    );
    request.respond(response)?;
    Ok(())
}

/// Content type plus no-store, so a reload always sees the rebuilt files.
fn with_headers<R: Read>(mut response: Response<R>, content_type: &str) -> Response<R> {
    for (key, value) in [("Content-Type", content_type), ("Cache-Control", "no-store")] {
        if let Ok(header) = Header::from_bytes(key, value) {
            response.add_header(header);
        }
    }
    response
}
