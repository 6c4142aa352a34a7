//! # Change Detection
//!
//! Screens re-load their content every time they come back into view after
//! the cache window expires. Most of the time the server returns the same
//! document, so we fingerprint it and skip the render pass when nothing
//! changed.
//!
//! The fingerprint is SHA-256 over a canonical encoding: object keys sorted,
//! no insignificant whitespace. Equality only. It is not a security boundary.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    /// Short form (first 12 hex chars) for log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..12])
    }
}

/// Computes the fingerprint of a decoded document.
pub fn fingerprint(document: &Value) -> Fingerprint {
    let mut canonical = Vec::new();
    write_canonical(document, &mut canonical);
    let digest = Sha256::digest(&canonical);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint(bytes)
}

/// True if there is no previous fingerprint or it differs from `current`.
pub fn has_changed(previous: Option<&Fingerprint>, current: &Fingerprint) -> bool {
    previous != Some(current)
}

// Key order is sorted here rather than relying on serde_json's map type, which
// switches to insertion order when any crate in the graph enables `preserve_order`.
fn write_canonical(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                write_canonical(&map[key], out);
            }
            out.push(b'}');
        }
    }
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    // serde_json's string escaping is deterministic
    match serde_json::to_string(s) {
        Ok(escaped) => out.extend_from_slice(escaped.as_bytes()),
        Err(_) => out.extend_from_slice(s.as_bytes()),
    }
}
