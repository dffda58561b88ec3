//! Fake timer service for integration tests
//!
//! A `tiny_http` server on an ephemeral port that answers from a table of
//! canned routes and records every request it receives.

#![allow(dead_code)]

use parking_lot::Mutex;
use stagetimer::api::{ApiClient, Notifier};
use stagetimer::config::ServiceSettings;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server, StatusCode};

/// One request seen by the fake service
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: Option<String>,
    location: Option<String>,
}

/// Canned HTTP service standing in for the timer service
pub struct FakeService {
    base_url: String,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeService {
    /// Start serving on an ephemeral local port
    pub fn start() -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let routes: Arc<Mutex<Vec<Route>>> = Arc::default();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let mut request = match server.recv_timeout(Duration::from_millis(20)) {
                        Ok(Some(request)) => request,
                        Ok(None) => continue,
                        Err(_) => break,
                    };

                    let method = request.method().to_string().to_uppercase();
                    let path = request
                        .url()
                        .split('?')
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    let content_type = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Content-Type"))
                        .map(|h| h.value.to_string());
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);

                    requests.lock().push(RecordedRequest {
                        method: method.clone(),
                        path: path.clone(),
                        content_type,
                        body,
                    });

                    let route = routes
                        .lock()
                        .iter()
                        .rev()
                        .find(|r| r.method == method && r.path == path)
                        .cloned();
                    let _ = request.respond(build_response(route));
                }
            })
        };

        Self {
            base_url: format!("http://{addr}"),
            routes,
            requests,
            stop,
            handle: Some(handle),
        }
    }

    /// Base URL of the fake service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `method path` with `status` and a JSON body; later routes win
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.add(method, path, status, Some(body.to_string()), None);
    }

    /// Answer `method path` with `status` and no body
    pub fn respond_empty(&self, method: &str, path: &str, status: u16) {
        self.add(method, path, status, None, None);
    }

    /// Answer `method path` with a redirect to `location`
    pub fn redirect(&self, method: &str, path: &str, location: &str) {
        self.add(method, path, 302, None, Some(location.to_string()));
    }

    /// Make `method path` bounce to the login page like a protected endpoint without a session
    pub fn require_login(&self, method: &str, path: &str) {
        self.redirect(method, path, "/login");
        self.add("GET", "/login", 200, Some("<html>login</html>".to_string()), None);
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Requests received for `method path`
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Forget recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// API client for this service
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ServiceSettings {
            base_url: self.base_url.clone(),
            request_timeout_ms: 2000,
            ..ServiceSettings::default()
        })
        .unwrap()
    }

    fn add(&self, method: &str, path: &str, status: u16, body: Option<String>, location: Option<String>) {
        self.routes.lock().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body,
            location,
        });
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn build_response(route: Option<Route>) -> Response<Cursor<Vec<u8>>> {
    let Some(route) = route else {
        return json_response(404, r#"{"error": "Not found"}"#);
    };

    if let Some(location) = route.location {
        return Response::from_data(Vec::new())
            .with_status_code(StatusCode(route.status))
            .with_header(Header::from_bytes(&b"Location"[..], location.as_bytes()).unwrap());
    }

    match route.body {
        Some(body) => json_response(route.status, &body),
        None => Response::from_data(Vec::new()).with_status_code(StatusCode(route.status)),
    }
}

fn json_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}

/// A local URL nothing is listening on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// `Notifier` that remembers every notice
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// In-memory console output that can be inspected after the fact
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
