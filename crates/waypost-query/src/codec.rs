//! Query-string parsing and serialization

use url::form_urlencoded;

use crate::params::Params;

/// Parse a query string, with or without its leading `?`
///
/// Accepts `&str` or `Option<&str>`; absent or empty input yields an empty
/// mapping. Never fails: bad escapes stay literal, invalid UTF-8 is
/// replaced, empty pairs are skipped and a bare key maps to `""`.
pub fn parse<'a>(search: impl Into<Option<&'a str>>) -> Params {
    let mut params = Params::new();

    let Some(search) = search.into() else {
        return params;
    };
    let query = search.strip_prefix('?').unwrap_or(search);

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params.append(key, value);
    }

    tracing::trace!(query = %query, keys = params.len(), "Parsed query string");

    params
}

/// Serialize parameters into a `?`-prefixed query string
///
/// Keys keep insertion order and sequences become repeated `key=value`
/// pairs. Returns `""` when there is nothing to write.
pub fn stringify(params: &Params) -> String {
    let mut pairs: Vec<String> = Vec::new();

    for (key, value) in params {
        let key = encode(key);
        for item in value.as_slice() {
            pairs.push(format!("{}={}", key, encode(item)));
        }
    }

    if pairs.is_empty() {
        return String::new();
    }

    format!("?{}", pairs.join("&"))
}

fn encode(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}
