use http::StatusCode;

/// Error status codes the default generator knows, with their reason phrases.
///
/// See <https://www.iana.org/assignments/http-status-codes/http-status-codes.xhtml>.
pub const ERROR_PHRASES: &[(u16, &str)] = &[
    // Client Errors 4xx
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Payload Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    // Server Errors 5xx
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

/// Reason phrase for a known error status code.
pub fn reason_phrase(code: i64) -> Option<&'static str> {
    ERROR_PHRASES
        .iter()
        .find(|(known, _)| i64::from(*known) == code)
        .map(|(_, phrase)| *phrase)
}

/// The status the default generator uses for an error code: the code itself
/// when it is in the table, 500 otherwise.
pub fn known_error_status(code: i64) -> (StatusCode, &'static str) {
    ERROR_PHRASES
        .iter()
        .find(|(known, _)| i64::from(*known) == code)
        .and_then(|(known, phrase)| Some((StatusCode::from_u16(*known).ok()?, *phrase)))
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
}

/// True for 4xx and 5xx codes.
pub fn is_error_status(code: i64) -> bool {
    (400..600).contains(&code)
}

/// Pick the status for a generated error response.
///
/// The response's own status wins when it is already an error status, then the
/// failure's code, then 500.
pub fn reconcile(response_status: u16, error_code: i64) -> StatusCode {
    [i64::from(response_status), error_code]
        .into_iter()
        .find(|code| is_error_status(*code))
        .and_then(|code| u16::try_from(code).ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
