//! Outbound message builders: hand-assembled tags, varint lengths, one
//! level of nesting. Encoding is total; string lengths on the wire are
//! UTF-8 byte counts, never character counts.

use crate::protocol::{DeepLinkRequest, TAG_APP_LINK, TAG_PING_RESPONSE};
use crate::varint::encode_varint;

// Inner field tags of the deep-link submessage.
const FIELD_URL: u8 = 0x0A;
const FIELD_PACKAGE: u8 = 0x12;

// Inner field tag of the ping reply (field 1, varint).
const FIELD_PING_VALUE: u8 = 0x08;

fn put_len_delimited(out: &mut Vec<u8>, tag: u8, bytes: &[u8]) {
    out.push(tag);
    out.extend_from_slice(&encode_varint(bytes.len() as u64));
    out.extend_from_slice(bytes);
}

/// Build a deep-link launch request: inner payload with the URL (field 1)
/// and, when present and non-empty, the targeting package (field 2),
/// wrapped under the two-byte app-link tag with a varint length.
pub fn encode_deep_link(request: &DeepLinkRequest) -> Vec<u8> {
    let mut inner = Vec::with_capacity(request.url.len() + 8);
    put_len_delimited(&mut inner, FIELD_URL, request.url.as_bytes());
    if let Some(package) = request.package.as_deref() {
        if !package.is_empty() {
            put_len_delimited(&mut inner, FIELD_PACKAGE, package.as_bytes());
        }
    }
    let mut out = Vec::with_capacity(inner.len() + 4);
    out.extend_from_slice(&TAG_APP_LINK);
    out.extend_from_slice(&encode_varint(inner.len() as u64));
    out.extend_from_slice(&inner);
    out
}

/// Answer a device keepalive: ping response echoing the request value.
/// A zero value is elided from the payload, matching default elision on
/// the rest of the wire.
pub fn encode_ping_reply(value: u64) -> Vec<u8> {
    let mut inner = Vec::new();
    if value != 0 {
        inner.push(FIELD_PING_VALUE);
        inner.extend_from_slice(&encode_varint(value));
    }
    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(TAG_PING_RESPONSE);
    out.extend_from_slice(&encode_varint(inner.len() as u64));
    out.extend_from_slice(&inner);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse;
    use crate::protocol::Response;

    #[test]
    fn deep_link_without_package_is_byte_exact() {
        let request = DeepLinkRequest {
            url: "https://example.com".to_owned(),
            package: None,
        };
        let encoded = encode_deep_link(&request);
        let url = b"https://example.com";
        let mut expected = vec![0xD2, 0x05, (url.len() + 2) as u8, 0x0A, url.len() as u8];
        expected.extend_from_slice(url);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn deep_link_with_package_appends_field_two() {
        let request = DeepLinkRequest {
            url: "https://example.com".to_owned(),
            package: Some("com.example.tv".to_owned()),
        };
        let encoded = encode_deep_link(&request);
        let url = b"https://example.com";
        let pkg = b"com.example.tv";
        let inner_len = 2 + url.len() + 2 + pkg.len();
        let mut expected = vec![0xD2, 0x05, inner_len as u8, 0x0A, url.len() as u8];
        expected.extend_from_slice(url);
        expected.push(0x12);
        expected.push(pkg.len() as u8);
        expected.extend_from_slice(pkg);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn empty_package_is_elided() {
        let with_empty = encode_deep_link(&DeepLinkRequest {
            url: "https://example.com".to_owned(),
            package: Some(String::new()),
        });
        let without = encode_deep_link(&DeepLinkRequest {
            url: "https://example.com".to_owned(),
            package: None,
        });
        assert_eq!(with_empty, without);
    }

    #[test]
    fn non_ascii_url_length_is_byte_count() {
        let url = "https://exämple.com";
        assert_eq!(url.chars().count(), 19);
        assert_eq!(url.len(), 20); // UTF-8 bytes, what the wire needs

        let encoded = encode_deep_link(&DeepLinkRequest {
            url: url.to_owned(),
            package: None,
        });
        // [0xD2, 0x05, outer_len, 0x0A, field1_len, ...]
        assert_eq!(encoded[4] as usize, url.len());
        assert_ne!(encoded[4] as usize, url.chars().count());
        assert_eq!(&encoded[5..], url.as_bytes());
    }

    #[test]
    fn deep_link_roundtrips_through_decoder_as_echo() {
        let encoded = encode_deep_link(&DeepLinkRequest {
            url: "https://example.com/watch?v=1".to_owned(),
            package: Some("com.example.tv".to_owned()),
        });
        assert_eq!(
            parse(&encoded),
            Response::AppLinkEcho {
                uri: "https://example.com/watch?v=1".to_owned()
            }
        );
    }

    #[test]
    fn ping_reply_bytes() {
        assert_eq!(encode_ping_reply(1), vec![0x4A, 0x02, 0x08, 0x01]);
        assert_eq!(encode_ping_reply(300), vec![0x4A, 0x03, 0x08, 0xAC, 0x02]);
        assert_eq!(encode_ping_reply(0), vec![0x4A, 0x00]);
    }

    #[test]
    fn ping_reply_roundtrips_through_decoder() {
        assert_eq!(
            parse(&encode_ping_reply(42)),
            Response::PingResponse { value: 42 }
        );
        assert_eq!(
            parse(&encode_ping_reply(0)),
            Response::PingResponse { value: 0 }
        );
    }
}
