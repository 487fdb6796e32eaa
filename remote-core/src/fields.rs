//! Field-level cursor over a submessage payload.
//!
//! A tag is `(field_number << 3) | wire_type`; the wire type alone decides
//! how many payload bytes follow. Unknown field numbers are decoded and
//! discarded by the walkers, which is how skip-and-discard is implemented.

use crate::varint::{decode_varint, VarintError};

/// Decode failures internal to the crate. Absorbed into `Response::Unknown`
/// at the `parse` boundary; callers never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("input truncated")]
    Truncated,
    #[error("unrecognized tag")]
    UnrecognizedTag,
}

impl From<VarintError> for DecodeError {
    fn from(_: VarintError) -> Self {
        DecodeError::Truncated
    }
}

/// Wire type: the low three bits of a field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireType {
    /// Group markers (3, 4) and reserved values are not part of this protocol.
    pub fn from_tag(tag: u64) -> Option<WireType> {
        match tag & 0x07 {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

/// One decoded field: number plus wire-typed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub number: u64,
    pub value: FieldValue<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

/// Cursor yielding one field at a time from a payload. Borrows the payload
/// for the duration of the walk; length-delimited values are sub-slices.
pub struct FieldReader<'a> {
    payload: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, pos: 0 }
    }

    /// Next field, `Ok(None)` at the end of the payload. An error leaves the
    /// cursor where it was; there is no way to resynchronize past a field
    /// whose declared length is inconsistent with the remaining bytes.
    pub fn next_field(&mut self) -> Result<Option<Field<'a>>, DecodeError> {
        if self.pos >= self.payload.len() {
            return Ok(None);
        }
        let (tag, tag_len) = decode_varint(self.payload, self.pos)?;
        let wire = WireType::from_tag(tag).ok_or(DecodeError::UnrecognizedTag)?;
        let mut pos = self.pos + tag_len;
        let value = match wire {
            WireType::Varint => {
                let (v, n) = decode_varint(self.payload, pos)?;
                pos += n;
                FieldValue::Varint(v)
            }
            WireType::Fixed64 => {
                let bytes = self.fixed::<8>(pos)?;
                pos += 8;
                FieldValue::Fixed64(u64::from_le_bytes(bytes))
            }
            WireType::LengthDelimited => {
                let (len, n) = decode_varint(self.payload, pos)?;
                let start = pos + n;
                let end = start
                    .checked_add(len as usize)
                    .ok_or(DecodeError::Truncated)?;
                if end > self.payload.len() {
                    return Err(DecodeError::Truncated);
                }
                pos = end;
                FieldValue::Bytes(&self.payload[start..end])
            }
            WireType::Fixed32 => {
                let bytes = self.fixed::<4>(pos)?;
                pos += 4;
                FieldValue::Fixed32(u32::from_le_bytes(bytes))
            }
        };
        self.pos = pos;
        Ok(Some(Field {
            number: tag >> 3,
            value,
        }))
    }

    fn fixed<const N: usize>(&self, pos: usize) -> Result<[u8; N], DecodeError> {
        let end = pos.checked_add(N).ok_or(DecodeError::Truncated)?;
        if end > self.payload.len() {
            return Err(DecodeError::Truncated);
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.payload[pos..end]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_mixed_fields_in_order() {
        // field 1 varint 150, field 2 bytes "hi", field 3 fixed32, field 4 fixed64
        let buf = [
            0x08, 0x96, 0x01, // 1: 150
            0x12, 0x02, b'h', b'i', // 2: "hi"
            0x1D, 0x01, 0x00, 0x00, 0x00, // 3: fixed32 = 1
            0x21, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 4: fixed64 = 2
        ];
        let mut r = FieldReader::new(&buf);
        assert_eq!(
            r.next_field().unwrap(),
            Some(Field {
                number: 1,
                value: FieldValue::Varint(150)
            })
        );
        assert_eq!(
            r.next_field().unwrap(),
            Some(Field {
                number: 2,
                value: FieldValue::Bytes(b"hi")
            })
        );
        assert_eq!(
            r.next_field().unwrap(),
            Some(Field {
                number: 3,
                value: FieldValue::Fixed32(1)
            })
        );
        assert_eq!(
            r.next_field().unwrap(),
            Some(Field {
                number: 4,
                value: FieldValue::Fixed64(2)
            })
        );
        assert_eq!(r.next_field().unwrap(), None);
    }

    #[test]
    fn empty_payload_yields_none() {
        let mut r = FieldReader::new(&[]);
        assert_eq!(r.next_field().unwrap(), None);
    }

    #[test]
    fn length_past_end_is_truncated() {
        // field 1 length-delimited, declared 5 bytes, only 2 present
        let buf = [0x0A, 0x05, 0xAA, 0xBB];
        let mut r = FieldReader::new(&buf);
        assert_eq!(r.next_field(), Err(DecodeError::Truncated));
    }

    #[test]
    fn truncated_fixed_width() {
        let buf = [0x1D, 0x01, 0x02]; // fixed32 with 3 payload bytes
        let mut r = FieldReader::new(&buf);
        assert_eq!(r.next_field(), Err(DecodeError::Truncated));
    }

    #[test]
    fn group_wire_type_rejected() {
        let buf = [0x0B, 0x00]; // field 1, wire type 3 (start group)
        let mut r = FieldReader::new(&buf);
        assert_eq!(r.next_field(), Err(DecodeError::UnrecognizedTag));
    }

    #[test]
    fn multi_byte_tag() {
        // field 90 wire type 2: tag 0x2D2 -> D2 05
        let buf = [0xD2, 0x05, 0x01, 0x7F];
        let mut r = FieldReader::new(&buf);
        assert_eq!(
            r.next_field().unwrap(),
            Some(Field {
                number: 90,
                value: FieldValue::Bytes(&[0x7F])
            })
        );
    }
}
