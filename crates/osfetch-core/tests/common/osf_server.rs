//! Minimal HTTP/1.1 server standing in for the file-hosting service in integration tests.
//!
//! Serves a fixed table of routes keyed by request target (path + query). Each
//! route can lie about its `Content-Length`, omit it, or redirect.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// `Content-Length` to declare. None omits the header (body ends at connection close).
    pub declared_len: Option<u64>,
    /// Sent as `Location` (use with a 3xx status).
    pub location: Option<String>,
}

impl Route {
    /// 200 with an honest `Content-Length`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status: 200,
            declared_len: Some(body.len() as u64),
            body,
            location: None,
        }
    }

    /// 200 without a `Content-Length` header.
    pub fn r#unsized(body: impl Into<Vec<u8>>) -> Self {
        Self {
            declared_len: None,
            ..Self::ok(body)
        }
    }

    /// 200 that declares `declared` bytes but sends only `body` and closes.
    pub fn truncated(body: impl Into<Vec<u8>>, declared: u64) -> Self {
        Self {
            declared_len: Some(declared),
            ..Self::ok(body)
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            declared_len: Some(0),
            location: Some(to.to_string()),
        }
    }

    pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }
}

/// Starts the server in a background thread. Returns the base URL (e.g. "http://127.0.0.1:12345").
/// The server runs until the process exits. Unknown targets get 404.
pub fn start(routes: HashMap<String, Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("");

    let not_found = Route::status(404, b"not found".to_vec());
    let route = routes.get(target).unwrap_or(&not_found);

    let mut head = format!("HTTP/1.1 {} {}\r\n", route.status, reason(route.status));
    if let Some(len) = route.declared_len {
        head.push_str(&format!("Content-Length: {}\r\n", len));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    head.push_str("Connection: close\r\n\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}
