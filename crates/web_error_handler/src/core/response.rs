use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML_UTF8: &str = "application/xml; charset=utf-8";

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// Status codes outside `100..=999` fall back to 500.
    pub fn new(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    fn with_content<S: Into<String>>(status: u16, content_type: &'static str, body: S) -> Self {
        let mut res = Self::new(status);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static(content_type),
        );
        res.body = Bytes::from(body.into().into_bytes());
        res
    }

    pub fn text<S: Into<String>>(status: u16, body: S) -> Self {
        Self::with_content(status, TEXT_PLAIN_UTF8, body)
    }

    /// Construct an empty response with given status. Does not set content-type.
    pub fn empty(status: u16) -> Self {
        Self::new(status)
    }

    /// Construct an HTML response with UTF-8 charset.
    pub fn html<S: Into<String>>(status: u16, body: S) -> Self {
        Self::with_content(status, TEXT_HTML_UTF8, body)
    }

    /// Construct an XML response with UTF-8 charset. The body is taken as-is.
    pub fn xml<S: Into<String>>(status: u16, body: S) -> Self {
        Self::with_content(status, APPLICATION_XML_UTF8, body)
    }

    /// Construct a raw bytes response. Does not set content-type.
    pub fn bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let mut res = Self::new(status);
        res.body = body.into();
        res
    }

    /// Construct a JSON response from any serializable value.
    pub fn json(status: u16, value: impl serde::Serialize) -> Self {
        let mut res = Self::new(status);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON),
        );

        match serde_json::to_vec(&value) {
            Ok(bytes) => res.body = Bytes::from(bytes),
            Err(err) => {
                // serialization failed; return 500 with empty JSON body
                tracing::warn!(error = %err, "failed to serialize JSON response body");
                res.status = StatusCode::INTERNAL_SERVER_ERROR;
            }
        }
        res
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.set_status(status);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Body as UTF-8 text, lossy.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn set_header<K, V>(&mut self, k: K, v: V)
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Debug,
        V::Error: std::fmt::Debug,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.headers.insert(key, value);
        }
    }

    pub fn header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Debug,
        V::Error: std::fmt::Debug,
    {
        self.set_header(k, v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_builds_response() {
        let v = json!({"a": 1, "b": "x"});
        let res = Response::json(200, &v);
        assert_eq!(res.status.as_u16(), 200);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.body.as_ref(), serde_json::to_vec(&v).unwrap().as_slice());
    }

    #[test]
    fn content_constructors_set_type() {
        assert_eq!(Response::html(404, "<h1>x</h1>").content_type(), Some(TEXT_HTML_UTF8));
        assert_eq!(Response::text(404, "x").content_type(), Some(TEXT_PLAIN_UTF8));
        assert_eq!(Response::xml(404, "<a/>").content_type(), Some(APPLICATION_XML_UTF8));
        assert_eq!(Response::empty(204).content_type(), None);

        let res = Response::bytes(201, Bytes::from(vec![1, 2, 3]));
        assert_eq!(res.status_code(), 201);
        assert_eq!(&res.body[..], &[1u8, 2, 3]);
        assert!(!res.headers.contains_key(http::header::CONTENT_LENGTH));
    }

    #[test]
    fn status_can_be_replaced() {
        let res = Response::text(200, "ok").with_status(StatusCode::BAD_GATEWAY);
        assert_eq!(res.status, StatusCode::BAD_GATEWAY);
        assert_eq!(res.body_text(), "ok");
    }

    #[test]
    fn out_of_range_status_falls_back_to_500() {
        assert_eq!(Response::new(42).status_code(), 500);
        assert_eq!(Response::new(600).status_code(), 600);
    }

    #[test]
    fn manual_headers_not_overridden() {
        let mut res = Response::text(200, "hello");
        res.set_header("content-length", "999");
        assert_eq!(
            res.headers.get(http::header::CONTENT_LENGTH).unwrap(),
            &HeaderValue::from_static("999")
        );
    }
}
