//! Request context
//!
//! Activators read request data (headers, authenticated user, host) through
//! [`RequestContext`]. It is implemented for `http` types so middleware can
//! pass the request it already holds, and for [`EvaluationContext`] for
//! callers outside an HTTP pipeline.

/// Read access to the current request.
pub trait RequestContext: Send + Sync {
    /// Values of a header, in order. Empty if the header is absent.
    /// Header names are case-insensitive.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// Authenticated user name, if any.
    fn user_name(&self) -> Option<&str> {
        None
    }

    /// Request host, taken from the `Host` header by default.
    fn host(&self) -> Option<&str> {
        self.header_values("host").into_iter().next()
    }
}

impl RequestContext for http::HeaderMap {
    /// Values are decoded as UTF-8. Decoding stops at the first value that is
    /// not valid UTF-8, so a later value never takes an earlier one's place.
    fn header_values(&self, name: &str) -> Vec<&str> {
        self.get_all(name)
            .iter()
            .map_while(|value| std::str::from_utf8(value.as_bytes()).ok())
            .collect()
    }
}

/// Request extension carrying the authenticated user name.
///
/// Authentication middleware inserts it into `http::Extensions` so that
/// user-based activators can see it through [`RequestContext::user_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl RequestContext for http::request::Parts {
    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers.header_values(name)
    }

    fn user_name(&self) -> Option<&str> {
        self.extensions
            .get::<AuthenticatedUser>()
            .map(|user| user.0.as_str())
    }

    fn host(&self) -> Option<&str> {
        self.uri
            .host()
            .or_else(|| self.headers.header_values("host").into_iter().next())
    }
}

/// Standalone evaluation context.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    headers: Vec<(String, String)>,
    user: Option<String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header value. Repeated names keep every value in order.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the authenticated user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the `Host` header.
    pub fn with_host(self, host: impl Into<String>) -> Self {
        self.with_header("host", host)
    }
}

impl RequestContext for EvaluationContext {
    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn user_name(&self) -> Option<&str> {
        self.user.as_deref()
    }
}
