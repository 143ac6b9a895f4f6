use crate::error::{PeerscopeError, Result};
use url::Url;

/// The one-shot subscription request sent right after connecting
pub const SUBSCRIBE_MESSAGE: &str = "subscribe to peer stuff please";

/// Build the feed URL for a `host:port` address.
/// Format: ws://<host:port>/ with no further path, query or credentials
pub fn feed_endpoint(addr: &str) -> Result<Url> {
    let url = Url::parse(&format!("ws://{}/", addr))?;

    if url.host_str().is_none() {
        return Err(PeerscopeError::InvalidEndpoint(format!(
            "missing host in '{}'",
            addr
        )));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(PeerscopeError::InvalidEndpoint(format!(
            "expected host:port, got '{}'",
            addr
        )));
    }

    if !url.username().is_empty() || url.password().is_some() {
        return Err(PeerscopeError::InvalidEndpoint(
            "credentials are not supported".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_endpoint() {
        let url = feed_endpoint("localhost:8080").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8080/");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_feed_endpoint_ipv6() {
        let url = feed_endpoint("[::1]:30303").unwrap();
        assert_eq!(url.as_str(), "ws://[::1]:30303/");
    }

    #[test]
    fn test_feed_endpoint_rejects_path() {
        assert!(matches!(
            feed_endpoint("localhost:8080/peers"),
            Err(PeerscopeError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_feed_endpoint_rejects_bad_port() {
        assert!(feed_endpoint("localhost:notaport").is_err());
        assert!(feed_endpoint("").is_err());
    }
}
