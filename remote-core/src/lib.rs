//! Android TV remote wire codec reference implementation.
//! Host-driven: no I/O; the transport hands in one demarcated message
//! buffer per call and sends back whatever the encoder produces.

pub mod decode;
pub mod encode;
pub mod fields;
pub mod heuristics;
pub mod protocol;
pub mod varint;

pub use decode::parse;
pub use encode::{encode_deep_link, encode_ping_reply};
pub use protocol::{DeepLinkRequest, Response};
pub use varint::{decode_varint, encode_varint, VarintError};
