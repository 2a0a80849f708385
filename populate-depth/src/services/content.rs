use bytes::Bytes;
use http::Method;
use http::Uri;
use http::uri::PathAndQuery;
use serde_json::Map;
use serde_json::Value;
use tower::BoxError;

use crate::spec::Populate;

/// Query parameter carrying the populate directive.
pub const POPULATE: &str = "populate";

/// A request to the content API.
#[non_exhaustive]
pub struct Request {
    /// The HTTP request as received.
    pub http_request: http::Request<Bytes>,

    /// Decoded query string. Bracketed keys stay flat (`populate[cover]`), except
    /// for a computed directive, which is stored as an object under `populate`.
    /// A key given more than once maps to an array of its values in order.
    pub query: Map<String, Value>,
}

impl From<http::Request<Bytes>> for Request {
    fn from(http_request: http::Request<Bytes>) -> Self {
        Self::new(http_request)
    }
}

impl Request {
    pub fn new(http_request: http::Request<Bytes>) -> Self {
        let mut query = Map::new();
        for (key, value) in query_pairs(http_request.uri()) {
            match query.get_mut(&key) {
                Some(Value::Array(values)) => values.push(Value::String(value)),
                Some(previous) => {
                    let first = previous.take();
                    *previous = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    query.insert(key, Value::String(value));
                }
            }
        }
        Self {
            http_request,
            query,
        }
    }

    /// A bodyless GET request, for tests and tooling.
    pub fn fake_get(uri: &str) -> Result<Self, http::Error> {
        let http_request = http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Bytes::new())?;
        Ok(Self::new(http_request))
    }

    pub fn method(&self) -> &Method {
        self.http_request.method()
    }

    pub fn path(&self) -> &str {
        self.http_request.uri().path()
    }

    /// Whether the caller asked for a populate of their own, plain or bracketed.
    pub fn has_explicit_populate(&self) -> bool {
        self.query.keys().any(|key| {
            key == POPULATE
                || key
                    .strip_prefix(POPULATE)
                    .is_some_and(|rest| rest.starts_with('['))
        })
    }

    /// Attaches `populate` to the query object and to the request URI.
    pub fn set_populate(&mut self, populate: &Populate) -> Result<(), BoxError> {
        let uri = self.http_request.uri();
        let mut pairs: Vec<(String, String)> = query_pairs(uri)
            .into_iter()
            .filter(|(key, _)| key != POPULATE)
            .collect();
        pairs.extend(populate.to_query_pairs(POPULATE));
        let query = serde_urlencoded::to_string(&pairs)?;

        let path_and_query = PathAndQuery::try_from(format!("{}?{query}", uri.path()))?;
        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        *self.http_request.uri_mut() = Uri::from_parts(parts)?;

        self.query.insert(POPULATE.to_string(), Value::from(populate));
        Ok(())
    }
}

fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    let Some(query) = uri.query() else {
        return Vec::new();
    };
    serde_urlencoded::from_str(query).unwrap_or_else(|error| {
        tracing::warn!(%error, query, "could not decode query string");
        Vec::new()
    })
}

/// A response from the content API.
#[non_exhaustive]
pub struct Response {
    pub response: http::Response<Value>,
}

impl From<http::Response<Value>> for Response {
    fn from(response: http::Response<Value>) -> Self {
        Self { response }
    }
}

impl Response {
    /// A 200 response with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self {
            response: http::Response::new(body),
        }
    }

    pub fn body(&self) -> &Value {
        self.response.body()
    }
}
