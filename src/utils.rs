//! Small helpers for building remote URLs

/// Strip surrounding whitespace and trailing slashes from a base URL
///
/// `https://jira.example.com/` and `https://jira.example.com` must produce the
/// same request and report links.
pub fn trim_base_url(url: &str) -> String {
  url.trim().trim_end_matches('/').to_string()
}

/// Percent-encode a value for use as a single URL path segment
///
/// GitLab accepts `group/project` in place of a numeric project id only when
/// the slash is encoded.
pub fn encode_path_segment(segment: &str) -> String {
  url::form_urlencoded::byte_serialize(segment.as_bytes())
    .collect::<String>()
    .replace('+', "%20")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_trim_base_url() {
    assert_eq!(trim_base_url("https://gitlab.example.com/"), "https://gitlab.example.com");
    assert_eq!(trim_base_url("  https://gitlab.example.com//  "), "https://gitlab.example.com");
    assert_eq!(trim_base_url("http://localhost:8080"), "http://localhost:8080");
  }

  #[test]
  fn test_encode_path_segment() {
    assert_eq!(encode_path_segment("42"), "42");
    assert_eq!(encode_path_segment("team/billing"), "team%2Fbilling");
    assert_eq!(encode_path_segment("my project"), "my%20project");
  }
}
