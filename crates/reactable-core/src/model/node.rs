//! Global node ids: `base64("<TypeName>:<uuid>")`.
//!
//! Every addressable object (posts, actors, custom emoji) can be referred to
//! by a single opaque string that also names its type. Raw UUIDs remain
//! accepted wherever a node id is.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Object types addressable by a global node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Actor,
    CustomEmoji,
    Post,
}

impl NodeType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::CustomEmoji => "CustomEmoji",
            Self::Post => "Post",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Actor" => Ok(Self::Actor),
            "CustomEmoji" => Ok(Self::CustomEmoji),
            "Post" => Ok(Self::Post),
            other => Err(NodeIdError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    #[error("node id is not valid base64")]
    NotBase64,

    #[error("node id must be `<Type>:<uuid>`")]
    Malformed,

    #[error("unknown node type '{0}'")]
    UnknownType(String),

    #[error("expected a {expected} id, got a {actual} id")]
    WrongType { expected: NodeType, actual: NodeType },
}

/// Encode a global node id.
#[must_use]
pub fn encode(node_type: NodeType, id: Uuid) -> String {
    STANDARD.encode(format!("{node_type}:{id}"))
}

/// Decode a global node id into its type and UUID.
///
/// # Errors
///
/// Returns an error when the token is not base64, has no `:` separator,
/// names an unknown type, or carries an invalid UUID.
pub fn decode(token: &str) -> Result<(NodeType, Uuid), NodeIdError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|_| NodeIdError::NotBase64)?;
    let text = String::from_utf8(bytes).map_err(|_| NodeIdError::Malformed)?;
    let (type_name, raw_id) = text.split_once(':').ok_or(NodeIdError::Malformed)?;
    let node_type = type_name.parse()?;
    let id = Uuid::try_parse(raw_id).map_err(|_| NodeIdError::Malformed)?;
    Ok((node_type, id))
}

/// Accept either a raw UUID or a global node id of the `expected` type.
///
/// # Errors
///
/// Returns an error if `input` is neither, or if the node id names another
/// type.
pub fn parse_id(input: &str, expected: NodeType) -> Result<Uuid, NodeIdError> {
    if let Ok(id) = Uuid::try_parse(input.trim()) {
        return Ok(id);
    }

    let (actual, id) = decode(input)?;
    if actual != expected {
        return Err(NodeIdError::WrongType { expected, actual });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "5f0c3a1e-8f44-4d0e-b1f8-2d7e9f3c6a10";

    #[test]
    fn encode_then_decode() {
        let id = Uuid::parse_str(ID).unwrap();
        let token = encode(NodeType::CustomEmoji, id);
        assert_eq!(decode(&token).unwrap(), (NodeType::CustomEmoji, id));
    }

    #[test]
    fn encoding_matches_type_prefixed_base64() {
        let id = Uuid::parse_str(ID).unwrap();
        let expected = STANDARD.encode(format!("Post:{ID}"));
        assert_eq!(encode(NodeType::Post, id), expected);
    }

    #[test]
    fn parse_id_accepts_raw_uuid() {
        let id = parse_id(ID, NodeType::CustomEmoji).unwrap();
        assert_eq!(id.to_string(), ID);
    }

    #[test]
    fn parse_id_rejects_other_types() {
        let id = Uuid::parse_str(ID).unwrap();
        let token = encode(NodeType::Actor, id);
        let err = parse_id(&token, NodeType::CustomEmoji).unwrap_err();
        assert_eq!(
            err,
            NodeIdError::WrongType {
                expected: NodeType::CustomEmoji,
                actual: NodeType::Actor,
            }
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode("%%%"), Err(NodeIdError::NotBase64));
        assert_eq!(
            decode(&STANDARD.encode("no-separator")),
            Err(NodeIdError::Malformed)
        );
        assert_eq!(
            decode(&STANDARD.encode(format!("Comment:{ID}"))),
            Err(NodeIdError::UnknownType("Comment".to_string()))
        );
    }
}
