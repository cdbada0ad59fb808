//! API version extraction.
//!
//! A request names the version it wants either with a leading `/v{N}`
//! path segment or an `X-Api-Version` header; the path segment wins when
//! both are present. The prefix is stripped before route matching, so a
//! route registered at `/echo` serves `/echo` and `/v1/echo` alike
//! (subject to its version filter).

use http::HeaderMap;

pub(crate) const VERSION_HEADER: &str = "x-api-version";

/// Splits a `/v{N}` prefix off `path`, if present and well formed.
pub(crate) fn split_path_version(path: &str) -> (Option<u32>, &str) {
    let Some(rest) = path.strip_prefix("/v") else {
        return (None, path);
    };

    let digits_end = rest.find('/').unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (None, path);
    }

    match digits.parse::<u32>() {
        Ok(version) => {
            let remainder = &rest[digits_end..];
            let remainder = if remainder.is_empty() { "/" } else { remainder };
            (Some(version), remainder)
        }
        Err(_) => (None, path),
    }
}

fn header_version(headers: &HeaderMap) -> Option<u32> {
    headers.get(VERSION_HEADER)?.to_str().ok()?.trim().parse().ok()
}

/// Resolves the requested version and the path to match routes against.
pub(crate) fn extract<'p>(path: &'p str, headers: &HeaderMap) -> (Option<u32>, &'p str) {
    match split_path_version(path) {
        (Some(version), rest) => (Some(version), rest),
        (None, rest) => (header_version(headers), rest),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract, split_path_version};
    use http::HeaderMap;

    #[test]
    fn path_prefix_parsing() {
        assert_eq!(split_path_version("/v1/echo"), (Some(1), "/echo"));
        assert_eq!(split_path_version("/v10/deep/path"), (Some(10), "/deep/path"));
        assert_eq!(split_path_version("/v2"), (Some(2), "/"));
        assert_eq!(split_path_version("/echo"), (None, "/echo"));
        // 'v' followed by anything but digits is an ordinary segment
        assert_eq!(split_path_version("/version/echo"), (None, "/version/echo"));
        assert_eq!(split_path_version("/v/echo"), (None, "/v/echo"));
        assert_eq!(split_path_version("/v1x/echo"), (None, "/v1x/echo"));
    }

    #[test]
    fn header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-version", "3".parse().unwrap());

        assert_eq!(extract("/echo", &headers), (Some(3), "/echo"));
        // the path prefix wins over the header
        assert_eq!(extract("/v1/echo", &headers), (Some(1), "/echo"));

        let empty = HeaderMap::new();
        assert_eq!(extract("/echo", &empty), (None, "/echo"));
    }
}
