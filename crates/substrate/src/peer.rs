//! Substrate-issued peer identity.

use core::fmt;
use core::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw length of a peer identifier in bytes.
pub const PEER_ID_LEN: usize = 16;

/// Opaque, stable identifier the substrate issues for a remote participant.
///
/// Independent of any specific logical connection. The textual form is
/// `2 * PEER_ID_LEN` lowercase hex characters; the all-zero value is reserved
/// for "unset" and never names a real peer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId([u8; PEER_ID_LEN]);

/// A string that does not encode a usable peer identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPeerId {
    #[error("peer id must be {expected} characters, got {got}")]
    Length { expected: usize, got: usize },
    #[error("peer id is not valid hex")]
    Encoding,
    #[error("peer id is unset")]
    Unset,
}

impl PeerId {
    pub const fn from_bytes(bytes: [u8; PEER_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; PEER_ID_LEN] {
        &self.0
    }

    /// False for the reserved all-zero value.
    pub fn is_valid(&self) -> bool {
        self.0 != [0; PEER_ID_LEN]
    }
}

impl FromStr for PeerId {
    type Err = InvalidPeerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != PEER_ID_LEN * 2 {
            return Err(InvalidPeerId::Length {
                expected: PEER_ID_LEN * 2,
                got: s.len(),
            });
        }
        let mut bytes = [0u8; PEER_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidPeerId::Encoding)?;
        let id = Self(bytes);
        if !id.is_valid() {
            return Err(InvalidPeerId::Unset);
        }
        Ok(id)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({self})")
    }
}

impl Serialize for PeerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let id = PeerId::from_bytes([0xab; PEER_ID_LEN]);
        let text = id.to_string();
        assert_eq!(text.len(), PEER_ID_LEN * 2);
        assert_eq!(text.parse::<PeerId>(), Ok(id));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            "abcd".parse::<PeerId>(),
            Err(InvalidPeerId::Length {
                expected: PEER_ID_LEN * 2,
                got: 4
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let bad = "zz".repeat(PEER_ID_LEN);
        assert_eq!(bad.parse::<PeerId>(), Err(InvalidPeerId::Encoding));
    }

    #[test]
    fn test_parse_rejects_unset() {
        let zero = "00".repeat(PEER_ID_LEN);
        assert_eq!(zero.parse::<PeerId>(), Err(InvalidPeerId::Unset));
    }

    #[test]
    fn test_validity() {
        assert!(!PeerId::from_bytes([0; PEER_ID_LEN]).is_valid());
        assert!(PeerId::from_bytes([1; PEER_ID_LEN]).is_valid());
    }
}
