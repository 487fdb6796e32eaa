//! Remote wire protocol: leading tag tables and the typed message values.

use serde::{Deserialize, Serialize};

// Single-byte leading tags (field numbers 1-15, wire type 2).
pub const TAG_CONFIGURE: u8 = 0x0A;
pub const TAG_SET_ACTIVE: u8 = 0x12;
pub const TAG_ERROR: u8 = 0x1A;
pub const TAG_PING_REQUEST: u8 = 0x42;
pub const TAG_PING_RESPONSE: u8 = 0x4A;

// Two-byte leading tags (field numbers >= 16; the tag itself is a varint).
pub const TAG_IME_KEY_INJECT: [u8; 2] = [0xA2, 0x01];
pub const TAG_START: [u8; 2] = [0xC2, 0x02];
pub const TAG_SET_VOLUME: [u8; 2] = [0xD2, 0x03];
pub const TAG_APP_LINK: [u8; 2] = [0xD2, 0x05];

/// Decoded inbound message. Exactly one variant per `parse` call; `Unknown`
/// is the fallback for anything unrecognized or unparseable and carries the
/// input bytes verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Device rejected a request. `original_request` is the raw rejected message.
    Error {
        has_error: bool,
        original_request: Option<Vec<u8>>,
    },
    /// Device echoed a deep-link launch back.
    AppLinkEcho { uri: String },
    /// Foreground app reported by the device.
    CurrentApp { package_name: String },
    /// Screen/power state.
    PowerState { is_on: bool },
    /// Volume report. `max` defaults to 100 when the device omits it.
    VolumeInfo { level: u64, max: u64, muted: bool },
    /// Keepalive from the device; must be answered with a ping reply.
    PingRequest { value: u64 },
    /// Device's answer to our keepalive.
    PingResponse { value: u64 },
    /// Device identification, best-effort positional mapping of the first
    /// three plausible strings in the payload.
    DeviceInfo {
        vendor: String,
        model: String,
        version: String,
    },
    /// No tag table entry matched, or the envelope was malformed.
    Unknown { raw: Vec<u8> },
}

/// Outbound deep-link launch request. The encoder does not retain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkRequest {
    pub url: String,
    /// Targeting package; omitted from the wire when `None` or empty.
    pub package: Option<String>,
}
