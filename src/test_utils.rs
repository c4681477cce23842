// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API server behind a kube `Client`.

use crate::kubernetes::Clients;
use http::{Method, Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::{Client, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use tracing_subscriber::EnvFilter;

/// Install a test log subscriber once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectPath {
    prefix: String,
    namespace: Option<String>,
    plural: String,
    name: String,
}

#[derive(Debug)]
struct RequestPath {
    prefix: String,
    namespace: Option<String>,
    plural: String,
    name: Option<String>,
}

impl RequestPath {
    fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (prefix, rest) = match segments.first() {
            Some(&"api") if segments.len() >= 2 => (format!("/api/{}", segments[1]), &segments[2..]),
            Some(&"apis") if segments.len() >= 3 => (
                format!("/apis/{}/{}", segments[1], segments[2]),
                &segments[3..],
            ),
            _ => return None,
        };

        let (namespace, rest) = if rest.len() >= 3 && rest[0] == "namespaces" {
            (Some(rest[1].to_string()), &rest[2..])
        } else {
            (None, rest)
        };

        Some(Self {
            prefix,
            namespace,
            plural: rest.first()?.to_string(),
            name: rest.get(1).map(|s| s.to_string()),
        })
    }

    fn object_path(&self, name: String) -> ObjectPath {
        ObjectPath {
            prefix: self.prefix.clone(),
            namespace: self.namespace.clone(),
            plural: self.plural.clone(),
            name,
        }
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<ObjectPath, Value>,
    requests: Vec<(String, String)>,
    reject_updates: bool,
    fail_reads: Option<u16>,
    resource_version: u64,
}

impl State {
    fn next_resource_version(&mut self) -> String {
        self.resource_version += 1;
        self.resource_version.to_string()
    }
}

/// An API server double that keeps objects in memory and records every request.
#[derive(Clone)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        init_tracing();
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Seed an object as if it had been created earlier
    pub fn with_object<K>(self, object: &K) -> Self
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let collection = K::url_path(&(), object.namespace().as_deref());
        let path = RequestPath::parse(&collection)
            .expect("resource url path")
            .object_path(object.name_any());

        let mut value = serde_json::to_value(object).expect("serializable object");
        {
            let mut state = self.state.lock().unwrap();
            let version = state.next_resource_version();
            value["metadata"]["resourceVersion"] = json!(version);
            value["metadata"]["uid"] = json!(format!("uid-{}", version));
            state.objects.insert(path, value);
        }
        self
    }

    /// Answer every PUT with 422, as the API server does for immutable field edits
    pub fn reject_updates(self) -> Self {
        self.state.lock().unwrap().reject_updates = true;
        self
    }

    /// Answer every GET with the given status code
    pub fn fail_reads(self, status: u16) -> Self {
        self.state.lock().unwrap().fail_reads = Some(status);
        self
    }

    pub fn clients(&self) -> Clients {
        Clients::new(Client::new(self.clone(), "default"))
    }

    /// Every (method, path) pair received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|(method, _)| method).collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Read back a stored object
    pub fn stored<K>(&self, name: &str, namespace: Option<&str>) -> Option<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        let collection = K::url_path(&(), namespace);
        let path = RequestPath::parse(&collection)?.object_path(name.to_string());
        let state = self.state.lock().unwrap();

        state
            .objects
            .get(&path)
            .map(|value| serde_json::from_value(value.clone()).expect("stored object"))
    }

    fn handle(&self, method: &Method, path: &str, query: Option<&str>, body: &[u8]) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method.to_string(), path.to_string()));

        let Some(request) = RequestPath::parse(path) else {
            return (404, status_json(404, "NotFound", "unknown path"));
        };

        match (method, request.name.clone()) {
            (&Method::GET, _) if state.fail_reads.is_some() => {
                let code = state.fail_reads.unwrap_or(500);
                (code, status_json(code, "InternalError", "the server is unavailable"))
            }
            (&Method::GET, Some(name)) => match state.objects.get(&request.object_path(name.clone())) {
                Some(object) => (200, object.clone()),
                None => (404, not_found_json(&request.plural, &name)),
            },
            (&Method::GET, None) => {
                let selector = query.map(label_selector).unwrap_or_default();
                let items: Vec<Value> = state
                    .objects
                    .iter()
                    .filter(|(key, _)| {
                        key.prefix == request.prefix
                            && key.plural == request.plural
                            && (request.namespace.is_none() || key.namespace == request.namespace)
                    })
                    .map(|(_, object)| object.clone())
                    .filter(|object| matches_labels(object, &selector))
                    .collect();

                (
                    200,
                    json!({
                        "apiVersion": "v1",
                        "kind": "List",
                        "metadata": {"resourceVersion": state.resource_version.to_string()},
                        "items": items,
                    }),
                )
            }
            (&Method::POST, None) => {
                let Ok(mut object) = serde_json::from_slice::<Value>(body) else {
                    return (400, status_json(400, "BadRequest", "malformed body"));
                };
                let Some(name) = object["metadata"]["name"].as_str().map(str::to_string) else {
                    return (422, status_json(422, "Invalid", "metadata.name: Required value"));
                };
                if object["metadata"]["resourceVersion"].as_str().is_some_and(|v| !v.is_empty()) {
                    return (
                        400,
                        status_json(
                            400,
                            "BadRequest",
                            "resourceVersion should not be set on objects to be created",
                        ),
                    );
                }

                let key = request.object_path(name.clone());
                if state.objects.contains_key(&key) {
                    return (
                        409,
                        status_json(
                            409,
                            "AlreadyExists",
                            &format!("{} \"{}\" already exists", request.plural, name),
                        ),
                    );
                }

                let version = state.next_resource_version();
                object["metadata"]["resourceVersion"] = json!(version);
                object["metadata"]["uid"] = json!(format!("uid-{}", version));
                if let Some(namespace) = &request.namespace {
                    object["metadata"]["namespace"] = json!(namespace);
                }
                state.objects.insert(key, object.clone());

                (201, object)
            }
            (&Method::PUT, Some(name)) => {
                if state.reject_updates {
                    return (
                        422,
                        status_json(422, "Invalid", "spec: Invalid value: field is immutable"),
                    );
                }
                let Ok(mut object) = serde_json::from_slice::<Value>(body) else {
                    return (400, status_json(400, "BadRequest", "malformed body"));
                };

                let key = request.object_path(name.clone());
                let Some(current) = state.objects.get(&key) else {
                    return (404, not_found_json(&request.plural, &name));
                };

                let current_version = current["metadata"]["resourceVersion"].clone();
                let sent_version = &object["metadata"]["resourceVersion"];
                if sent_version.is_string() && *sent_version != current_version {
                    return (
                        409,
                        status_json(409, "Conflict", "the object has been modified"),
                    );
                }

                let uid = current["metadata"]["uid"].clone();
                let version = state.next_resource_version();
                object["metadata"]["resourceVersion"] = json!(version);
                object["metadata"]["uid"] = uid;
                state.objects.insert(key, object.clone());

                (200, object)
            }
            (&Method::DELETE, Some(name)) => match state.objects.remove(&request.object_path(name.clone())) {
                Some(object) => (200, object),
                None => (404, not_found_json(&request.plural, &name)),
            },
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

impl Default for FakeApiServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let body = req.into_body();

        Box::pin(async move {
            let bytes = body.collect().await?.to_bytes();
            let (status, payload) = server.handle(&method, &path, query.as_deref(), &bytes);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload)?))?)
        })
    }
}

fn label_selector(query: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "labelSelector")
        .flat_map(|(_, selector)| {
            selector
                .split(',')
                .filter_map(|term| term.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn matches_labels(object: &Value, selector: &BTreeMap<String, String>) -> bool {
    selector
        .iter()
        .all(|(key, value)| object["metadata"]["labels"][key].as_str() == Some(value.as_str()))
}

fn status_json(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> Value {
    status_json(
        404,
        "NotFound",
        &format!("{} \"{}\" not found", resource, name),
    )
}
