use crate::error::Relay;
use url::Url;

/// A browser-style URL match pattern such as `http://localhost:3000/*` or
/// `file:///*`.
///
/// `*` as the scheme matches `http` and `https`. The host may be `*`, a
/// `*.suffix` wildcard, or an exact name; a host given without a port
/// matches any port. The path (including any query string) is a glob where
/// `*` matches any run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    raw: String,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    AllUrls,
    Parts {
        scheme: String,
        host: Host,
        port: Option<u16>,
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Host {
    Any,
    Suffix(String),
    Exact(String),
}

const ALL_URLS: &str = "<all_urls>";
const SUPPORTED_SCHEMES: [&str; 6] = ["*", "http", "https", "file", "ws", "wss"];

impl UrlPattern {
    pub fn parse(pattern: &str) -> Result<Self, Relay> {
        let invalid = |reason| Relay::InvalidPattern(pattern.to_string(), reason);

        if pattern == ALL_URLS {
            return Ok(Self {
                raw: pattern.to_string(),
                kind: Kind::AllUrls,
            });
        }

        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme separator"))?;
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(invalid("unsupported scheme"));
        }

        let slash = rest.find('/').ok_or_else(|| invalid("missing path"))?;
        let (authority, path) = rest.split_at(slash);

        let (host, port) = if scheme == "file" {
            if !authority.is_empty() {
                return Err(invalid("file patterns cannot name a host"));
            }
            (Host::Exact(String::new()), None)
        } else {
            parse_authority(authority).ok_or_else(|| invalid("invalid host"))?
        };

        Ok(Self {
            raw: pattern.to_string(),
            kind: Kind::Parts {
                scheme: scheme.to_string(),
                host,
                port,
                path: path.to_string(),
            },
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        let Kind::Parts {
            scheme,
            host,
            port,
            path,
        } = &self.kind
        else {
            return SUPPORTED_SCHEMES[1..].contains(&url.scheme());
        };

        let scheme_ok = if scheme == "*" {
            matches!(url.scheme(), "http" | "https")
        } else {
            scheme == url.scheme()
        };
        if !scheme_ok {
            return false;
        }

        let url_host = url.host_str().unwrap_or("");
        let host_ok = match host {
            Host::Any => true,
            Host::Exact(name) => name.eq_ignore_ascii_case(url_host),
            Host::Suffix(suffix) => {
                let url_host = url_host.to_ascii_lowercase();
                url_host == *suffix || url_host.ends_with(&format!(".{suffix}"))
            }
        };
        if !host_ok {
            return false;
        }

        if let Some(port) = port {
            if url.port_or_known_default() != Some(*port) {
                return false;
            }
        }

        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        glob_match(path, &target)
    }
}

fn parse_authority(authority: &str) -> Option<(Host, Option<u16>)> {
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, "*")) => (host, None),
        Some((host, port)) => (host, Some(port.parse().ok()?)),
        None => (authority, None),
    };
    let host = match host {
        "" => return None,
        "*" => Host::Any,
        _ => {
            if let Some(suffix) = host.strip_prefix("*.") {
                if suffix.is_empty() || suffix.contains('*') {
                    return None;
                }
                Host::Suffix(suffix.to_ascii_lowercase())
            } else if host.contains('*') {
                return None;
            } else {
                Host::Exact(host.to_ascii_lowercase())
            }
        }
    };
    Some((host, port))
}

/// Match `text` against `pattern`, where `*` matches any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&b| b == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn localhost_pattern_requires_the_port() {
        let pattern = UrlPattern::parse("http://localhost:3000/*").unwrap();
        assert!(pattern.matches(&url("http://localhost:3000/")));
        assert!(pattern.matches(&url("http://localhost:3000/player?track=2")));
        assert!(!pattern.matches(&url("http://localhost:3001/")));
        assert!(!pattern.matches(&url("https://localhost:3000/")));
        assert!(!pattern.matches(&url("http://example.com:3000/")));
    }

    #[test]
    fn file_pattern_matches_local_files() {
        let pattern = UrlPattern::parse("file:///*").unwrap();
        assert!(pattern.matches(&url("file:///home/me/test.html")));
        assert!(!pattern.matches(&url("http://localhost/home")));
    }

    #[test]
    fn wildcard_scheme_and_host() {
        let pattern = UrlPattern::parse("*://*.example.com/app/*").unwrap();
        assert!(pattern.matches(&url("https://www.example.com/app/index.html")));
        assert!(pattern.matches(&url("http://example.com/app/")));
        assert!(!pattern.matches(&url("https://example.org/app/")));
        assert!(!pattern.matches(&url("https://www.example.com/other")));
        assert!(!pattern.matches(&url("file:///app/x")));
    }

    #[test]
    fn host_without_port_matches_any_port() {
        let pattern = UrlPattern::parse("http://localhost/*").unwrap();
        assert!(pattern.matches(&url("http://localhost:8080/x")));
        assert!(pattern.matches(&url("http://localhost/x")));
    }

    #[test]
    fn all_urls() {
        let pattern = UrlPattern::parse("<all_urls>").unwrap();
        assert!(pattern.matches(&url("https://example.com/")));
        assert!(pattern.matches(&url("file:///tmp/a.html")));
        assert!(!pattern.matches(&url("chrome://extensions/")));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        for bad in [
            "localhost:3000/*",
            "ftp://example.com/*",
            "http://example.com",
            "http://exa*mple.com/*",
            "http://*./*",
            "file://host/*",
            "http://localhost:port/*",
        ] {
            assert!(UrlPattern::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn glob_handles_multiple_stars() {
        assert!(glob_match("/*/b/*", "/a/b/c"));
        assert!(glob_match("/*", "/"));
        assert!(glob_match("*c", "abcabc"));
        assert!(!glob_match("/a*z", "/abc"));
    }
}
