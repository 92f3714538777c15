//! The route table.
//!
//! Routes are registered once at startup and immutable afterwards. Matching
//! walks the table in registration order, first hit wins: routes without
//! parameters match on path equality, parametrized routes match their
//! literal prefix segment-by-segment and bind each `:name` parameter to the
//! request segment at its own position. Surplus trailing request segments
//! are allowed on parametrized routes.

use std::collections::HashMap;
use std::fmt;

use http::Method;
use tracing::trace;

use wren_http::protocol::{Request, Response};

type BoxedHandler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

enum PatternSegment {
    Literal(String),
    Param(String),
}

/// One registered `(method, pattern) -> handler` binding.
pub struct Route {
    method: Method,
    pattern: String,
    segments: Vec<PatternSegment>,
    handler: BoxedHandler,
}

impl Route {
    fn new(method: Method, pattern: &str, handler: BoxedHandler) -> Self {
        let pattern = normalize(pattern).to_owned();
        let segments = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => PatternSegment::Param(name.to_owned()),
                None => PatternSegment::Literal(segment.to_owned()),
            })
            .collect();

        Self { method, pattern, segments, handler }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The stored pattern, trailing-slash normalized, `:name` markers intact.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn invoke(&self, request: &Request) -> Response {
        (self.handler)(request)
    }

    fn has_params(&self) -> bool {
        self.segments.iter().any(|segment| matches!(segment, PatternSegment::Param(_)))
    }

    /// Checks the path shape alone (the caller compares methods) and returns
    /// the parameter bindings on success.
    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        if !self.has_params() {
            return (self.pattern == path).then(HashMap::new);
        }

        // ignore the leading empty segment from the initial slash
        let supplied: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();

        let mut params = HashMap::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PatternSegment::Literal(literal) => {
                    if supplied.get(index).copied() != Some(literal.as_str()) {
                        return None;
                    }
                }
                PatternSegment::Param(name) => match supplied.get(index) {
                    Some(value) => {
                        params.insert(name.clone(), (*value).to_owned());
                    }
                    None => return None,
                },
            }
        }

        Some(params)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("method", &self.method).field("pattern", &self.pattern).finish_non_exhaustive()
    }
}

/// Result of matching a request against the table.
#[derive(Debug)]
pub enum RouteOutcome<'router> {
    /// A route matched; parameters have been bound onto the request.
    Matched(&'router Route),
    /// Some route matched the path shape but not the method.
    MethodNotAllowed,
    /// No route matched the path at all.
    NotFound,
}

#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Resolves a handler for the request and binds path parameters onto it.
    ///
    /// Parameters are only bound on a successful match; on a miss the
    /// request's parameter map stays empty.
    pub fn route<'router>(&'router self, request: &mut Request) -> RouteOutcome<'router> {
        let mut path_matched = false;

        for route in &self.routes {
            let Some(params) = route.match_path(request.path()) else {
                continue;
            };

            if route.method == *request.method() {
                trace!(pattern = route.pattern(), "route matched");
                request.bind_params(params);
                return RouteOutcome::Matched(route);
            }
            path_matched = true;
        }

        if path_matched { RouteOutcome::MethodNotAllowed } else { RouteOutcome::NotFound }
    }
}

#[derive(Debug)]
pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, pattern: impl AsRef<str>, registration: Registration) -> Self {
        self.routes.push(Route::new(registration.method, pattern.as_ref(), registration.handler));
        self
    }

    pub fn build(self) -> Router {
        Router { routes: self.routes }
    }
}

/// A method/handler pair waiting to be attached to a pattern.
pub struct Registration {
    method: Method,
    handler: BoxedHandler,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("method", &self.method).finish_non_exhaustive()
    }
}

macro_rules! method_registration {
    ($name:ident, $method:ident) => {
        pub fn $name<H>(handler: H) -> Registration
        where
            H: Fn(&Request) -> Response + Send + Sync + 'static,
        {
            Registration { method: Method::$method, handler: Box::new(handler) }
        }
    };
}

method_registration!(get, GET);
method_registration!(post, POST);
method_registration!(put, PUT);
method_registration!(patch, PATCH);
method_registration!(delete, DELETE);
method_registration!(options, OPTIONS);

/// Trailing slashes are normalized away except for the root path itself.
fn normalize(pattern: &str) -> &str {
    if pattern.len() > 1 && pattern.ends_with('/') { &pattern[..pattern.len() - 1] } else { pattern }
}
