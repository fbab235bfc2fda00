use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Uri};

type Extensions = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Incoming request seen by handlers, middlewares and error listeners.
#[derive(Debug)]
pub struct Request {
    pub inner: http::Request<Bytes>,
    pub extensions: Extensions, // request-level data
}

/// Copies the header map and the extension map (one `Arc` bump per entry).
/// The body is a ref-counted `Bytes` and is shared, not copied.
impl Clone for Request {
    fn clone(&self) -> Self {
        // http::Request<B> doesn't impl Clone, rebuild it from its parts
        let mut inner = http::Request::new(self.inner.body().clone());
        *inner.method_mut() = self.inner.method().clone();
        *inner.uri_mut() = self.inner.uri().clone();
        *inner.version_mut() = self.inner.version();
        *inner.headers_mut() = self.inner.headers().clone();

        Self {
            inner,
            extensions: self.extensions.clone(),
        }
    }
}

impl Request {
    /// Build a request for `method` and `path`. An unparsable path falls back to `/`.
    pub fn new<M: Into<Method>, S: AsRef<str>>(method: M, path: S) -> Self {
        let mut inner = http::Request::new(Bytes::new());
        *inner.method_mut() = method.into();
        *inner.uri_mut() = path.as_ref().parse::<Uri>().unwrap_or_else(|_| Uri::from_static("/"));

        Self {
            inner,
            extensions: HashMap::new(),
        }
    }

    pub fn header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Debug,
        V::Error: std::fmt::Debug,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.inner.headers_mut().append(key, value);
        }
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        *self.inner.body_mut() = body.into();
        self
    }

    // Convenience accessors for the inner http::Request
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.inner.headers()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
        self.inner.headers_mut()
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// All values of the named header joined with `", "`, or an empty string
    /// when the header is absent. Bytes that are not UTF-8 become U+FFFD.
    pub fn header_line(&self, name: &str) -> String {
        self.inner
            .headers()
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // --- Request-level shared data (extensions) ---
    pub fn set_request_share_data<T: Send + Sync + 'static>(
        &mut self,
        value: Arc<T>,
    ) -> Option<Arc<T>> {
        let prev = self
            .extensions
            .insert(TypeId::of::<T>(), value as Arc<dyn Any + Send + Sync>);
        prev.and_then(|prev_any| prev_any.downcast::<T>().ok())
    }

    pub fn get_request_share_data<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|stored| stored.clone().downcast::<T>().ok())
    }
}
