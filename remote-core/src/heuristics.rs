//! String classifiers and recursive extraction over nested submessages.
//!
//! The device info, current-app, and app-link payloads are nested
//! submessages whose exact shape is not modeled. Instead, length-delimited
//! fields are tested against a named classifier and the search recurses
//! into any field whose bytes are not themselves a plausible string,
//! depth-first in field order. First match wins.

use crate::fields::{FieldReader, FieldValue};

/// Recursion bound for nested length-delimited fields. Lengths already
/// bound each level to a sub-range of its parent; the depth cap rules out
/// pathological nesting on top of that.
const MAX_RECURSION_DEPTH: usize = 16;

/// Android package name: has a `.` separator, no whitespace, longer than 3.
pub fn is_package_name(s: &str) -> bool {
    s.len() > 3 && s.contains('.') && !s.chars().any(char::is_whitespace)
}

/// Launchable URI: scheme separator present, or a bare market link.
pub fn is_uri(s: &str) -> bool {
    s.contains("://") || s.starts_with("market:")
}

/// Non-empty and entirely printable ASCII. Loose on purpose: used to pick
/// human-readable strings out of payloads with no field-number guarantees.
pub fn is_printable_ascii(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// First length-delimited field (depth-first, left-to-right) whose bytes
/// decode as text accepted by `classify`. Fields that are not a plausible
/// string are recursed into as submessages; a branch whose declared lengths
/// are inconsistent is abandoned and the sibling scan continues.
pub fn find_string(payload: &[u8], classify: fn(&str) -> bool) -> Option<String> {
    find_string_at(payload, classify, 0)
}

fn find_string_at(payload: &[u8], classify: fn(&str) -> bool, depth: usize) -> Option<String> {
    if depth >= MAX_RECURSION_DEPTH {
        return None;
    }
    let mut reader = FieldReader::new(payload);
    while let Ok(Some(field)) = reader.next_field() {
        let FieldValue::Bytes(bytes) = field.value else {
            continue;
        };
        if let Ok(text) = std::str::from_utf8(bytes) {
            if classify(text) {
                return Some(text.to_owned());
            }
        }
        if let Some(found) = find_string_at(bytes, classify, depth + 1) {
            return Some(found);
        }
    }
    None
}

/// All printable-ASCII strings in the payload, depth-first in field order.
/// A field that reads as a plausible string is collected and not recursed
/// into; everything else length-delimited is treated as a submessage.
pub fn collect_strings(payload: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    collect_strings_at(payload, &mut out, 0);
    out
}

fn collect_strings_at(payload: &[u8], out: &mut Vec<String>, depth: usize) {
    if depth >= MAX_RECURSION_DEPTH {
        return;
    }
    let mut reader = FieldReader::new(payload);
    while let Ok(Some(field)) = reader.next_field() {
        let FieldValue::Bytes(bytes) = field.value else {
            continue;
        };
        match std::str::from_utf8(bytes) {
            Ok(text) if is_printable_ascii(text) => out.push(text.to_owned()),
            _ => collect_strings_at(bytes, out, depth + 1),
        }
    }
}
