//! In-process fake of the inventory service, bound to an ephemeral port.
//!
//! It keeps products in memory, enforces the same media-type and field
//! checks as the real service, and records every request it receives.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use matchit::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as the fake service saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Default)]
struct State {
    products: Mutex<BTreeMap<u64, Value>>,
    next_id: AtomicU64,
    requests: Mutex<Vec<Recorded>>,
    failing: AtomicBool,
}

#[derive(Clone, Copy)]
enum Route {
    Collection,
    Item,
    MarkDamaged,
}

fn build_router() -> Router<Route> {
    let mut router = Router::new();
    router.insert("/inventory", Route::Collection).unwrap();
    router.insert("/inventory/{id}", Route::Item).unwrap();
    router.insert("/inventory/{id}/mark_damaged", Route::MarkDamaged).unwrap();
    router
}

pub struct FakeInventory {
    pub base_url: String,
    state: Arc<State>,
    handle: JoinHandle<()>,
}

impl FakeInventory {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(State::default());
        state.next_id.store(1, Ordering::SeqCst);
        let router = Arc::new(build_router());

        let handle = tokio::spawn({
            let state = Arc::clone(&state);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let io = TokioIo::new(stream);
                    let state = Arc::clone(&state);
                    let router = Arc::clone(&router);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            let router = Arc::clone(&router);
                            handle_request(req, state, router)
                        });
                        let _ = http1::Builder::new().serve_connection(io, service).await;
                    });
                }
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Store a product directly and return its id.
    pub fn seed(&self, name: &str, quantity: u64, condition: &str, restock_level: u64) -> u64 {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.products.lock().unwrap().insert(
            id,
            json!({
                "id": id,
                "name": name,
                "quantity": quantity,
                "condition": condition,
                "restock_level": restock_level,
            }),
        );
        id
    }

    pub fn product(&self, id: u64) -> Option<Value> {
        self.state.products.lock().unwrap().get(&id).cloned()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Answer every subsequent request with 500.
    pub fn fail_everything(&self) {
        self.state.failing.store(true, Ordering::SeqCst);
    }
}

impl Drop for FakeInventory {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<State>,
    router: Arc<Router<Route>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await.map(|c| c.to_bytes()).unwrap_or_default();
    let content_type = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    state.requests.lock().unwrap().push(Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        content_type: content_type.clone(),
        body: body.clone(),
    });

    if state.failing.load(Ordering::SeqCst) {
        return Ok(reply(StatusCode::INTERNAL_SERVER_ERROR, &json!({"error": "Server error"})));
    }

    let Ok(matched) = router.at(parts.uri.path()) else {
        return Ok(reply(StatusCode::NOT_FOUND, &json!({"error": "Not found"})));
    };
    let route = *matched.value;
    let id: Option<u64> = matched.params.get("id").and_then(|id| id.parse().ok());

    let response = match (parts.method, route) {
        (Method::GET, Route::Collection) => {
            let query = parse_query(parts.uri.query());
            let products = state.products.lock().unwrap();
            let items: Vec<&Value> = products
                .values()
                .filter(|p| match query.get("condition") {
                    Some(condition) => p["condition"] == condition.as_str(),
                    None => true,
                })
                .collect();
            reply(StatusCode::OK, &json!(items))
        }

        (Method::POST, Route::Collection) => {
            if content_type.as_deref() != Some("application/json") {
                return Ok(unsupported_media_type());
            }
            match deserialize(&body) {
                Some(mut product) => {
                    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
                    product["id"] = json!(id);
                    state.products.lock().unwrap().insert(id, product.clone());
                    reply(StatusCode::CREATED, &product)
                }
                None => bad_request(),
            }
        }

        (Method::GET, Route::Item) => match id.and_then(|id| state.products.lock().unwrap().get(&id).cloned()) {
            Some(product) => reply(StatusCode::OK, &product),
            None => not_found(),
        },

        (Method::PUT, Route::Item) => {
            if content_type.as_deref() != Some("application/json") {
                return Ok(unsupported_media_type());
            }
            let mut products = state.products.lock().unwrap();
            let stored = match id {
                Some(id) => products.get_mut(&id),
                None => None,
            };
            match (stored, deserialize(&body)) {
                (None, _) => not_found(),
                (Some(_), None) => bad_request(),
                (Some(stored), Some(mut product)) => {
                    product["id"] = stored["id"].clone();
                    *stored = product.clone();
                    reply(StatusCode::OK, &product)
                }
            }
        }

        (Method::PUT, Route::MarkDamaged) => {
            let mut products = state.products.lock().unwrap();
            let stored = match id {
                Some(id) => products.get_mut(&id),
                None => None,
            };
            match stored {
                Some(stored) => {
                    stored["condition"] = json!("damaged");
                    reply(StatusCode::OK, stored)
                }
                None => not_found(),
            }
        }

        _ => reply(StatusCode::METHOD_NOT_ALLOWED, &json!({"error": "Method not allowed"})),
    };

    Ok(response)
}

/// Accept a body only if it carries every product field with the right type.
fn deserialize(body: &[u8]) -> Option<Value> {
    let data: Value = serde_json::from_slice(body).ok()?;
    Some(json!({
        "name": data.get("name")?.as_str()?,
        "quantity": data.get("quantity")?.as_u64()?,
        "condition": data.get("condition")?.as_str()?,
        "restock_level": data.get("restock_level")?.as_u64()?,
    }))
}

fn reply(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn not_found() -> Response<Full<Bytes>> {
    reply(StatusCode::NOT_FOUND, &json!({"error": "Not Found"}))
}

fn bad_request() -> Response<Full<Bytes>> {
    reply(StatusCode::BAD_REQUEST, &json!({"error": "Bad Request"}))
}

fn unsupported_media_type() -> Response<Full<Bytes>> {
    reply(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        &json!({"error": "Content-Type must be application/json"}),
    )
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(q) = query {
        for part in q.split('&') {
            if let Some((key, value)) = part.split_once('=') {
                map.insert(urldecode(key), urldecode(value));
            }
        }
    }
    map
}

fn urldecode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.bytes();
    while let Some(b) = chars.next() {
        match b {
            b'%' => {
                let hex: Vec<u8> = chars.by_ref().take(2).collect();
                let decoded = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = decoded {
                    bytes.push(byte);
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
