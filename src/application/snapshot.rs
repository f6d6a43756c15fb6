//! URL-safe snapshots of the region list
//!
//! A snapshot is the JSON encoding of all regions, base64url encoded without
//! padding, so it can travel in a URL fragment as `#data=<payload>`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::RegionList;

/// Fragment prefix carrying a snapshot.
pub const FRAGMENT_PREFIX: &str = "#data=";

/// Parse stored or shared JSON without serde_json's nesting limit.
///
/// Every chart level nests two JSON values (node object, `children` array),
/// so the default limit of 128 would reject charts about 64 levels deep.
pub fn read_json<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Encode regions into a URL-safe payload.
pub fn encode_regions(regions: &RegionList) -> ApplicationResult<String> {
    let json = serde_json::to_vec(regions).map_err(|e| ApplicationError::Snapshot {
        message: format!("serialize regions: {e}"),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Encode regions as a complete URL fragment.
pub fn encode_fragment(regions: &RegionList) -> ApplicationResult<String> {
    Ok(format!("{FRAGMENT_PREFIX}{}", encode_regions(regions)?))
}

/// Decode a payload, with or without the `#data=` prefix and padding.
pub fn decode_regions(input: &str) -> ApplicationResult<RegionList> {
    let payload = input.trim();
    let payload = payload.strip_prefix(FRAGMENT_PREFIX).unwrap_or(payload);
    let payload = payload.trim_end_matches('=');
    debug!(len = payload.len(), "decode snapshot");

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApplicationError::Snapshot {
            message: format!("base64: {e}"),
        })?;
    read_json(&bytes).map_err(|e| ApplicationError::Snapshot {
        message: format!("json: {e}"),
    })
}

/// True when the input looks like a snapshot fragment.
pub fn has_snapshot(fragment: &str) -> bool {
    fragment.starts_with(FRAGMENT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrgNode, OrgTree, Region};

    fn regions() -> RegionList {
        let mut region = Region::new("r1", "Zürich");
        region.org_data = OrgTree::new(
            OrgNode::new("root", "Zürich", "Manager")
                .with_child(OrgNode::new("b", "Bea", "Lead").with_department("Export"))
                .with_child(OrgNode::new("a", "Al", "Lead").with_notes("part time")),
        );
        RegionList::default().add(region)
    }

    #[test]
    fn given_regions_when_encoding_then_payload_is_url_safe() {
        let payload = encode_regions(&regions()).unwrap();
        assert!(payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn given_fragment_when_decoding_then_restores_order_and_fields() {
        let original = regions();
        let fragment = encode_fragment(&original).unwrap();
        assert!(has_snapshot(&fragment));

        let decoded = decode_regions(&fragment).unwrap();

        assert_eq!(decoded, original);
        let root = decoded.get("r1").unwrap().org_data.root();
        assert_eq!(root.children[0].id.as_str(), "b");
        assert_eq!(root.children[1].notes.as_deref(), Some("part time"));
    }

    #[test]
    fn given_padded_payload_when_decoding_then_accepts() {
        let payload = format!("{}==", encode_regions(&regions()).unwrap());
        assert!(decode_regions(&payload).is_ok());
    }

    fn chain(depth: usize) -> RegionList {
        let mut node = OrgNode::new(format!("n{depth}"), "Leaf", "Clerk");
        for level in (0..depth).rev() {
            node = OrgNode::new(format!("n{level}"), format!("Level {level}"), "Lead").with_child(node);
        }
        let mut region = Region::new("deep", "Deep");
        region.org_data = OrgTree::new(node);
        RegionList::default().add(region)
    }

    #[test]
    fn given_chart_deeper_than_serde_limit_when_decoding_then_round_trips() {
        // Arrange
        let deep = chain(200);
        let fragment = encode_fragment(&deep).unwrap();

        // Act
        let decoded = decode_regions(&fragment).unwrap();

        // Assert
        assert_eq!(decoded.get("deep").unwrap().org_data.depth(), 201);
        assert_eq!(decoded, deep);
    }

    #[test]
    fn given_trailing_garbage_when_reading_json_then_error() {
        assert!(read_json::<RegionList>(b"[] x").is_err());
    }

    #[test]
    fn given_garbage_when_decoding_then_snapshot_error() {
        assert!(matches!(
            decode_regions("#data=!!!"),
            Err(ApplicationError::Snapshot { .. })
        ));
    }
}
