//! Path parameters and the request helpers that read them.
//!
//! The router stores matched `{name}` segments as a [`Params`] value in the
//! request extensions. [`RequestExt`] reads them back as strings or integers,
//! falling back to defaults instead of failing.

use smallvec::SmallVec;
use std::net::SocketAddr;

/// Parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// Path parameters captured by a route match, in pattern order.
///
/// # Example
///
/// ```rust
/// use courier_core::Params;
///
/// let mut params = Params::new();
/// params.push("content", "hello");
///
/// assert_eq!(params.get("content"), Some("hello"));
/// assert_eq!(params.get("size"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value of the first parameter called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Peer address of the connection a request arrived on.
///
/// Inserted into request extensions by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub SocketAddr);

/// Read helpers for path parameters.
///
/// Missing and malformed values never fail; they fall back to `""`, `0` or
/// the supplied default.
///
/// # Example
///
/// ```rust
/// use courier_core::{Params, RequestExt};
///
/// let mut params = Params::new();
/// params.push("size", "128");
///
/// let mut request = http::Request::new(());
/// request.extensions_mut().insert(params);
///
/// assert_eq!(request.param_int("size"), 128);
/// assert_eq!(request.param_or("level", "L"), "L");
/// ```
pub trait RequestExt {
    /// Returns the path parameters, if the request was routed.
    fn params(&self) -> Option<&Params>;

    /// Returns the peer address, if the server recorded one.
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// Returns the parameter value, or `""` when absent.
    fn param(&self, key: &str) -> &str {
        self.params().and_then(|p| p.get(key)).unwrap_or("")
    }

    /// Returns the parameter value, or `default` when absent or empty.
    fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.param(key) {
            "" => default,
            value => value,
        }
    }

    /// Returns the parameter parsed as an integer, or 0 when absent or
    /// not a base-10 integer.
    fn param_int(&self, key: &str) -> i64 {
        self.param(key).parse().unwrap_or(0)
    }

    /// Returns the parameter parsed as an integer, or `default` when
    /// [`param_int`](Self::param_int) yields 0.
    ///
    /// A literal `0` is indistinguishable from an absent value and also
    /// produces `default`.
    fn param_int_or(&self, key: &str, default: i64) -> i64 {
        match self.param_int(key) {
            0 => default,
            value => value,
        }
    }
}

impl<B> RequestExt for http::Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<RemoteAddr>().map(|addr| addr.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request_with(pairs: &[(&str, &str)]) -> http::Request<()> {
        let params: Params = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut request = http::Request::new(());
        request.extensions_mut().insert(params);
        request
    }

    #[test]
    fn test_params_push_and_get() {
        let mut params = Params::new();
        params.push("id", "123");
        params.push("name", "alice");

        assert_eq!(params.get("id"), Some("123"));
        assert_eq!(params.get("name"), Some("alice"));
        assert_eq!(params.get("unknown"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let request = request_with(&[("a", "1"), ("b", "2")]);
        let pairs: Vec<_> = request.params().unwrap().iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_param_absent_is_empty() {
        let request = request_with(&[]);
        assert_eq!(request.param("missing"), "");
    }

    #[test]
    fn test_param_without_router() {
        let request = http::Request::new(());
        assert!(request.params().is_none());
        assert_eq!(request.param("anything"), "");
        assert_eq!(request.param_int_or("size", 300), 300);
    }

    #[test]
    fn test_param_or() {
        let request = request_with(&[("name", "bob"), ("blank", "")]);
        assert_eq!(request.param_or("name", "anon"), "bob");
        assert_eq!(request.param_or("blank", "anon"), "anon");
        assert_eq!(request.param_or("missing", "anon"), "anon");
    }

    #[test]
    fn test_param_int() {
        let request = request_with(&[("n", "42"), ("neg", "-7"), ("bad", "4x")]);
        assert_eq!(request.param_int("n"), 42);
        assert_eq!(request.param_int("neg"), -7);
        assert_eq!(request.param_int("bad"), 0);
        assert_eq!(request.param_int("missing"), 0);
    }

    #[test]
    fn test_param_int_or_zero_is_default() {
        let request = request_with(&[("size", "0"), ("other", "512")]);
        assert_eq!(request.param_int_or("size", 300), 300);
        assert_eq!(request.param_int_or("other", 300), 512);
        assert_eq!(request.param_int_or("missing", 300), 300);
    }

    #[test]
    fn test_remote_addr() {
        let mut request = http::Request::new(());
        assert_eq!(request.remote_addr(), None);

        let addr: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        request.extensions_mut().insert(RemoteAddr(addr));
        assert_eq!(request.remote_addr(), Some(addr));
    }

    proptest! {
        #[test]
        fn prop_param_int_roundtrips_integers(n in any::<i64>()) {
            let value = n.to_string();
            let request = request_with(&[("n", value.as_str())]);
            prop_assert_eq!(request.param_int("n"), n);
        }

        #[test]
        fn prop_param_int_or_never_returns_zero(s in "\\PC*", default in 1i64..1000) {
            let request = request_with(&[("n", s.as_str())]);
            prop_assert_ne!(request.param_int_or("n", default), 0);
        }

        #[test]
        fn prop_non_numeric_falls_back(s in "[a-z]{1,12}", default in any::<i64>()) {
            let request = request_with(&[("n", s.as_str())]);
            prop_assert_eq!(request.param_int_or("n", default), default);
        }
    }
}
