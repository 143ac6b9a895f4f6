use crate::error::{PeerscopeError, Result};
use serde_json::{Map, Value};
use std::net::IpAddr;

/// A peer-discovery event from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEvent {
    /// Public IP of the peer, as sent (may not parse)
    pub plain_ip: String,
    /// Dialable address of the peer
    pub remote: String,
    /// Protocol-level node identifier
    pub enode: String,
}

impl PeerEvent {
    /// Wire field names
    const PLAIN_IP: &'static str = "plain-ip";
    const REMOTE: &'static str = "remote";
    const ENODE: &'static str = "enode";

    /// Decode one frame.
    /// Format: a JSON object with string fields plain-ip, remote and enode;
    /// other fields are ignored
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(data)?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            PeerscopeError::Decode("message must be a JSON object".to_string())
        })?;

        Ok(PeerEvent {
            plain_ip: string_field(object, Self::PLAIN_IP)?,
            remote: string_field(object, Self::REMOTE)?,
            enode: string_field(object, Self::ENODE)?,
        })
    }

    /// Parsed IP, if `plain_ip` is a valid IPv4 or IPv6 address
    pub fn ip(&self) -> Option<IpAddr> {
        self.plain_ip.parse().ok()
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(PeerscopeError::Decode(format!(
            "field '{}' must be a string, got {}",
            key, other
        ))),
        None => Err(PeerscopeError::Decode(format!("missing '{}' field", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_event() {
        let frame = br#"{"plain-ip":"8.8.8.8","remote":"10.0.0.5:30303","enode":"enode://abc","extra":1}"#;
        let event = PeerEvent::from_bytes(frame).unwrap();

        assert_eq!(event.plain_ip, "8.8.8.8");
        assert_eq!(event.remote, "10.0.0.5:30303");
        assert_eq!(event.enode, "enode://abc");
        assert_eq!(event.ip(), Some("8.8.8.8".parse().unwrap()));
    }

    #[test]
    fn test_decode_missing_field() {
        let frame = br#"{"plain-ip":"8.8.8.8","remote":"10.0.0.5:30303"}"#;
        let err = PeerEvent::from_bytes(frame).unwrap_err();
        assert!(matches!(err, PeerscopeError::Decode(_)));
        assert!(err.to_string().contains("enode"));
    }

    #[test]
    fn test_decode_wrong_type() {
        let frame = br#"{"plain-ip":8,"remote":"10.0.0.5:30303","enode":"x"}"#;
        assert!(matches!(
            PeerEvent::from_bytes(frame),
            Err(PeerscopeError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_not_an_object() {
        assert!(PeerEvent::from_bytes(b"[1, 2, 3]").is_err());
        assert!(PeerEvent::from_bytes(b"not json").is_err());
    }

    #[test]
    fn test_unparsable_ip_still_decodes() {
        let frame = br#"{"plain-ip":"nope","remote":"r","enode":"e"}"#;
        let event = PeerEvent::from_bytes(frame).unwrap();
        assert_eq!(event.ip(), None);
    }
}
