//! Request-like values that can enumerate their headers.

use axum::http::{request::Parts, HeaderMap, Request};

/// Anything that exposes its headers as name/value string pairs.
pub trait HeaderSource {
    /// Iterate over headers in arrival order.
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;
}

impl HeaderSource for HeaderMap {
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        // Values that are not visible ASCII cannot carry an address.
        Box::new(
            self.iter()
                .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v))),
        )
    }
}

impl<B> HeaderSource for Request<B> {
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        self.headers().header_pairs()
    }
}

impl HeaderSource for Parts {
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        self.headers.header_pairs()
    }
}

impl<K, V> HeaderSource for [(K, V)]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
    }
}

impl<K, V> HeaderSource for Vec<(K, V)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn header_pairs(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        self.as_slice().header_pairs()
    }
}
