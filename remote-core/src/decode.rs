//! Tag-dispatch decoder: one raw message buffer in, one typed `Response` out.
//!
//! `parse` never fails. Truncated, malformed, or unrecognized input degrades
//! to `Response::Unknown` carrying the original bytes, because unrecognized
//! future message kinds are a normal outcome on this wire, not an
//! exceptional one. The transport stays robust to protocol drift.

use crate::fields::{DecodeError, FieldReader, FieldValue};
use crate::heuristics;
use crate::protocol::{self, Response};
use crate::varint::decode_varint;

/// Buffers shorter than this are not worth dispatching.
const MIN_MESSAGE_LEN: usize = 2;

/// Volume report omits `max` on some devices; treat the scale as percent.
const DEFAULT_VOLUME_MAX: u64 = 100;

/// Decode one inbound message. Always returns a `Response`; the `Unknown`
/// variant carries the input verbatim when nothing else applies.
pub fn parse(buffer: &[u8]) -> Response {
    match try_parse(buffer) {
        Ok(response) => response,
        Err(_) => Response::Unknown {
            raw: buffer.to_vec(),
        },
    }
}

fn try_parse(buffer: &[u8]) -> Result<Response, DecodeError> {
    if buffer.len() < MIN_MESSAGE_LEN {
        return Err(DecodeError::Truncated);
    }
    let body = strip_length_prefix(buffer);
    if body.is_empty() {
        return Err(DecodeError::Truncated);
    }

    // Single-byte leading tags (field numbers 1-15).
    match body[0] {
        protocol::TAG_CONFIGURE => return parse_device_info(body),
        // Recognized, but carries no fields of interest at this layer.
        protocol::TAG_SET_ACTIVE => return Err(DecodeError::UnrecognizedTag),
        protocol::TAG_ERROR => return parse_error(body),
        protocol::TAG_PING_REQUEST => {
            return Ok(Response::PingRequest {
                value: ping_value(envelope(body, 1)?),
            })
        }
        protocol::TAG_PING_RESPONSE => {
            return Ok(Response::PingResponse {
                value: ping_value(envelope(body, 1)?),
            })
        }
        _ => {}
    }

    // Two-byte leading tags (field numbers >= 16, varint-encoded tag).
    let lead: [u8; 2] = [body[0], *body.get(1).ok_or(DecodeError::Truncated)?];
    match lead {
        protocol::TAG_IME_KEY_INJECT => parse_current_app(body),
        protocol::TAG_START => parse_power_state(body),
        protocol::TAG_SET_VOLUME => parse_volume(body),
        protocol::TAG_APP_LINK => parse_app_link(body),
        _ => Err(DecodeError::UnrecognizedTag),
    }
}

/// Some transports wrap one message in an outer frame-length prefix, some
/// do not. Detect the prefix by self-consistency: a leading varint equal to
/// the byte count that follows it is a frame length, anything else is the
/// first tag of the message itself.
fn strip_length_prefix(buffer: &[u8]) -> &[u8] {
    match decode_varint(buffer, 0) {
        Ok((value, consumed)) if value as usize == buffer.len() - consumed => &buffer[consumed..],
        _ => buffer,
    }
}

/// Shared envelope: skip `tag_len` tag bytes, decode the varint length, and
/// return the enclosed payload. Fails if the declared length runs past the
/// end of the buffer.
fn envelope(body: &[u8], tag_len: usize) -> Result<&[u8], DecodeError> {
    let (len, len_bytes) = decode_varint(body, tag_len)?;
    let start = tag_len + len_bytes;
    let end = start
        .checked_add(len as usize)
        .ok_or(DecodeError::Truncated)?;
    if end > body.len() {
        return Err(DecodeError::Truncated);
    }
    Ok(&body[start..end])
}

/// Error report: field 1 is the flag, field 2 the raw rejected request.
/// A walk that aborts on malformed trailing data keeps what it has.
fn parse_error(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 1)?;
    let mut has_error = false;
    let mut original_request = None;
    let mut reader = FieldReader::new(payload);
    while let Ok(Some(field)) = reader.next_field() {
        match (field.number, field.value) {
            (1, FieldValue::Varint(v)) => has_error = v != 0,
            (2, FieldValue::Bytes(bytes)) => original_request = Some(bytes.to_vec()),
            _ => {}
        }
    }
    Ok(Response::Error {
        has_error,
        original_request,
    })
}

fn parse_volume(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 2)?;
    let mut level = 0;
    let mut max = None;
    let mut muted = false;
    let mut reader = FieldReader::new(payload);
    while let Ok(Some(field)) = reader.next_field() {
        match (field.number, field.value) {
            (1, FieldValue::Varint(v)) => level = v,
            (2, FieldValue::Varint(v)) => max = Some(v),
            (3, FieldValue::Varint(v)) => muted = v != 0,
            _ => {}
        }
    }
    Ok(Response::VolumeInfo {
        level,
        max: max.unwrap_or(DEFAULT_VOLUME_MAX),
        muted,
    })
}

/// First occurrence of field 1 wins and ends the walk. Behavior on a
/// repeated field is ambiguous upstream; see DESIGN.md.
fn parse_power_state(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 2)?;
    let mut reader = FieldReader::new(payload);
    while let Ok(Some(field)) = reader.next_field() {
        if let (1, FieldValue::Varint(v)) = (field.number, field.value) {
            return Ok(Response::PowerState { is_on: v != 0 });
        }
    }
    Ok(Response::PowerState { is_on: false })
}

/// Ping payloads put field 1 at a fixed leading position (tag 0x08 at
/// offset 0); when it is absent the value defaults to 0.
fn ping_value(payload: &[u8]) -> u64 {
    if payload.first() == Some(&0x08) {
        decode_varint(payload, 1).map(|(v, _)| v).unwrap_or(0)
    } else {
        0
    }
}

fn parse_current_app(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 2)?;
    let package_name = heuristics::find_string(payload, heuristics::is_package_name)
        .ok_or(DecodeError::UnrecognizedTag)?;
    Ok(Response::CurrentApp { package_name })
}

fn parse_app_link(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 2)?;
    let uri = heuristics::find_string(payload, heuristics::is_uri)
        .ok_or(DecodeError::UnrecognizedTag)?;
    Ok(Response::AppLinkEcho { uri })
}

/// Best-effort positional mapping: the first three plausible strings in the
/// payload become vendor, model, version. Missing slots stay empty.
fn parse_device_info(body: &[u8]) -> Result<Response, DecodeError> {
    let payload = envelope(body, 1)?;
    let mut strings = heuristics::collect_strings(payload).into_iter();
    Ok(Response::DeviceInfo {
        vendor: strings.next().unwrap_or_default(),
        model: strings.next().unwrap_or_default(),
        version: strings.next().unwrap_or_default(),
    })
}
