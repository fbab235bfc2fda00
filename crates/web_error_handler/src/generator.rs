use serde::Serialize;

use crate::core::{Request, Response};
use crate::error::HandlerError;
use crate::negotiation::{MalformedQuality, sorted_media_types};
use crate::status::known_error_status;

/// Builds the response sent back for an intercepted failure.
///
/// Implementations must always return a response. The status they set is
/// only a proposal: the error handler replaces anything that is not a 4xx or
/// 5xx code.
pub trait ErrorResponseGenerator: Send + Sync + 'static {
    fn generate(&self, error: &HandlerError, request: &Request) -> Response;
}

/// Body formats the default generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Html,
    PlainText,
    Json,
    Xml,
}

impl Representation {
    /// Match a single normalized media type.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "text/html" | "*/*" => Some(Representation::Html),
            "text/plain" => Some(Representation::PlainText),
            "application/json" => Some(Representation::Json),
            "application/xml" | "text/xml" => Some(Representation::Xml),
            _ => None,
        }
    }

    /// First known representation in a ranked list, HTML when there is none.
    pub fn negotiate<S: AsRef<str>>(ranked: &[S]) -> Self {
        ranked
            .iter()
            .find_map(|media_type| Self::from_media_type(media_type.as_ref()))
            .unwrap_or(Representation::Html)
    }

    pub fn render(self, code: u16, message: &str) -> Response {
        match self {
            Representation::Html => html_response(code, message),
            Representation::PlainText => Response::text(code, format!("Error {code} - {message}")),
            Representation::Json => Response::json(
                code,
                JsonError {
                    name: "Error",
                    code,
                    message,
                },
            ),
            Representation::Xml => xml_response(code, message),
        }
    }
}

#[derive(Serialize)]
struct JsonError<'a> {
    name: &'static str,
    code: u16,
    message: &'a str,
}

fn html_response(code: u16, message: &str) -> Response {
    let title = format!("Error {code} - {message}");
    let html = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body style=\"padding:20px 10px\"><h1 style=\"text-align:center\">{title}</h1></body></html>"
    );
    Response::html(code, html)
}

fn xml_response(code: u16, message: &str) -> Response {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n\
         <error>\n<code>{code}</code>\n<message>{message}</message>\n</error>"
    );
    Response::xml(code, xml)
}

/// Negotiates HTML, plain text, JSON or XML from the `Accept` header and
/// reports the status code with its reason phrase.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorResponseGenerator {
    malformed_quality: MalformedQuality,
}

impl DefaultErrorResponseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_malformed_quality(malformed_quality: MalformedQuality) -> Self {
        Self { malformed_quality }
    }
}

impl ErrorResponseGenerator for DefaultErrorResponseGenerator {
    fn generate(&self, error: &HandlerError, request: &Request) -> Response {
        let (status, phrase) = known_error_status(error.code());
        let ranked = sorted_media_types(&request.header_line("accept"), self.malformed_quality);
        Representation::negotiate(&ranked).render(status.as_u16(), phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::{APPLICATION_JSON, APPLICATION_XML_UTF8, TEXT_HTML_UTF8, TEXT_PLAIN_UTF8};
    use http::Method;

    fn generate(accept: &str, code: i64) -> Response {
        let mut req = Request::new(Method::GET, "/");
        if !accept.is_empty() {
            req = req.header("accept", accept);
        }
        DefaultErrorResponseGenerator::new().generate(&HandlerError::with_code(code, "Test Error"), &req)
    }

    fn strict(accept: &str) -> Response {
        let req = Request::new(Method::GET, "/").header("accept", accept);
        DefaultErrorResponseGenerator::with_malformed_quality(MalformedQuality::Discard)
            .generate(&HandlerError::with_code(500, "Test Error"), &req)
    }

    #[test]
    fn defaults_to_html_500() {
        let res = generate("", 0);
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.content_type(), Some(TEXT_HTML_UTF8));
        assert_eq!(
            res.body_text(),
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Error 500 - Internal Server Error</title></head>\
             <body style=\"padding:20px 10px\"><h1 style=\"text-align:center\">Error 500 - Internal Server Error</h1></body></html>"
        );
    }

    #[test]
    fn unsupported_accept_falls_back_to_html() {
        let res = generate("image/webp", 0);
        assert_eq!(res.content_type(), Some(TEXT_HTML_UTF8));
        assert_eq!(res.status_code(), 500);
    }

    #[test]
    fn unknown_error_codes_become_500() {
        let res = generate("application/json,text/html;q=0.9,image/webp,*/*;q=0.8", 399);
        assert_eq!(res.content_type(), Some(APPLICATION_JSON));
        assert_eq!(res.status_code(), 500);

        let res = generate(",application/xml,text/html;q=0.9,image/webp,*/*;q=0.8", 600);
        assert_eq!(res.content_type(), Some(APPLICATION_XML_UTF8));
        assert_eq!(res.status_code(), 500);
    }

    #[test]
    fn json_body_is_compact_and_ordered() {
        let res = generate("application/json", 400);
        assert_eq!(res.status_code(), 400);
        assert_eq!(res.body_text(), r#"{"name":"Error","code":400,"message":"Bad Request"}"#);
    }

    #[test]
    fn text_body() {
        let res = generate("text/plain", 511);
        assert_eq!(res.status_code(), 511);
        assert_eq!(res.content_type(), Some(TEXT_PLAIN_UTF8));
        assert_eq!(res.body_text(), "Error 511 - Network Authentication Required");
    }

    #[test]
    fn xml_body() {
        let res = generate("text/xml", 404);
        assert_eq!(res.status_code(), 404);
        assert_eq!(
            res.body_text(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n<error>\n<code>404</code>\n<message>Not Found</message>\n</error>"
        );
    }

    #[test]
    fn every_known_code_is_reported_with_its_phrase() {
        for (code, phrase) in crate::status::ERROR_PHRASES {
            let res = generate("text/plain", i64::from(*code));
            assert_eq!(res.status_code(), *code);
            assert_eq!(res.body_text(), format!("Error {code} - {phrase}"));
        }
    }

    #[test]
    fn picks_highest_ranked_known_type() {
        let cases = [
            ("text/html", Representation::Html),
            ("*/*;q=0.9, application/json;q=0.89", Representation::Html),
            ("text/html, text/plain, application/json", Representation::Html),
            ("application/json;q=0.99, text/html, text/plain;q=0.98", Representation::Html),
            ("text/plain, text/html, application/json", Representation::PlainText),
            ("application/json;q=0.99, text/plain, text/html;q=0.98", Representation::PlainText),
            ("application/json, text/plain, text/html", Representation::Json),
            ("text/plain;q=0.99, application/json, text/html;q=0.98", Representation::Json),
            ("application/xml", Representation::Xml),
            ("application/xml, text/plain, text/html", Representation::Xml),
            ("text/plain;q=0.99, application/xml, text/html;q=0.98", Representation::Xml),
            ("image/webp, image/png", Representation::Html),
        ];
        for (accept, expected) in cases {
            let ranked = sorted_media_types(accept, MalformedQuality::FallbackToOne);
            assert_eq!(Representation::negotiate(&ranked), expected, "{accept}");
        }
    }

    #[test]
    fn opaque_accept_bytes_do_not_hide_known_types() {
        let accept = http::HeaderValue::from_bytes(b"image/\xff, application/json").unwrap();
        let req = Request::new(Method::GET, "/").header("accept", accept);
        let res = DefaultErrorResponseGenerator::new().generate(&HandlerError::with_code(404, "x"), &req);
        assert_eq!(res.content_type(), Some(APPLICATION_JSON));
        assert_eq!(res.status_code(), 404);
    }

    #[test]
    fn malformed_quality_counts_as_full_weight() {
        let res = generate("text/plain;q=0.9, application/json;q=string", 500);
        assert_eq!(res.content_type(), Some(APPLICATION_JSON));
    }

    #[test]
    fn discarding_malformed_qualities_leaves_plain_text() {
        for accept in [
            "application/json;q=10,*/*;q=9.0,text/plain;q=1.0,",
            "text/html;q=0.0000,text/html;q=0.9876,text/plain;q=0.000",
            "application/xml;q=1.0000,text/html;q=1.001,text/plain;Q=1.000",
            "application/json;q=string,text/html;q=9876,text/plain;q=0.999",
        ] {
            let res = strict(accept);
            assert_eq!(res.content_type(), Some(TEXT_PLAIN_UTF8), "{accept}");
            assert_eq!(res.status_code(), 500);
        }
    }
}
