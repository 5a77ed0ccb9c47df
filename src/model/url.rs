//! Request URL as a set of components.

use std::fmt;

use url::Url;

/// Ordered query parameters, each key holding a list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`, keeping the key's first position.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every `(key, value)` pair, keys in insertion order, values in append order.
    pub fn flatten(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

/// URL components of a request.
///
/// `query` distinguishes "no query string" (`None`) from a query string
/// that is present but empty (`Some` with no parameters, i.e. a trailing `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Option<QueryParams>,
}

impl RequestUrl {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            path: path.into(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = Some(query);
        self
    }

    /// Parse an absolute URL string into components.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(input)?;
        let host = url.host_str().ok_or(url::ParseError::EmptyHost)?.to_string();
        let port = url
            .port_or_known_default()
            .ok_or(url::ParseError::InvalidPort)?;
        let query = url.query().map(|_| url.query_pairs().into_owned().collect());

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
            path: url.path().to_string(),
            query,
        })
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)?;
        if let Some(query) = &self.query {
            f.write_str("?")?;
            for (i, (k, v)) in query.flatten().enumerate() {
                if i > 0 {
                    f.write_str("&")?;
                }
                write!(f, "{}={}", k, v)?;
            }
        }
        Ok(())
    }
}
