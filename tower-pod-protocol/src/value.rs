//! Wire value model
//!
//! Four shapes, nested freely: integers, byte strings, lists and maps.
//! Maps keep insertion order; the encoder never sorts keys.

use std::fmt;

/// A value expressed in the protocol's self-describing encoding
#[derive(Clone, PartialEq, Eq)]
pub enum WireValue {
    Int(i64),
    Bytes(Vec<u8>),
    List(Vec<WireValue>),
    Dict(Vec<(Vec<u8>, WireValue)>),
}

impl WireValue {
    /// Create an empty map
    pub fn dict() -> Self {
        WireValue::Dict(Vec::new())
    }

    /// Builder-style insert for maps. A repeated key replaces the earlier
    /// value in place so the original position is kept.
    pub fn with(mut self, key: &str, value: impl Into<WireValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert into a map; no-op on other shapes
    pub fn insert(&mut self, key: &str, value: impl Into<WireValue>) {
        if let WireValue::Dict(entries) = self {
            let value = value.into();
            match entries.iter_mut().find(|(k, _)| k == key.as_bytes()) {
                Some(slot) => slot.1 = value,
                None => entries.push((key.as_bytes().to_vec(), value)),
            }
        }
    }

    /// Look up a key in a map
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        match self {
            WireValue::Dict(entries) => entries
                .iter()
                .find(|(k, _)| k == key.as_bytes())
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Byte string contents as UTF-8, if valid
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            WireValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            WireValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_dict(&self) -> bool {
        matches!(self, WireValue::Dict(_))
    }

    /// Convenience: string value of a map entry
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(WireValue::as_str)
    }
}

impl fmt::Debug for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Int(n) => write!(f, "{}", n),
            WireValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(f, "<{} bytes>", bytes.len()),
            },
            WireValue::List(items) => f.debug_list().entries(items).finish(),
            WireValue::Dict(entries) => f
                .debug_map()
                .entries(
                    entries
                        .iter()
                        .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), v)),
                )
                .finish(),
        }
    }
}

impl From<i64> for WireValue {
    fn from(n: i64) -> Self {
        WireValue::Int(n)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        WireValue::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        WireValue::Bytes(s.into_bytes())
    }
}

impl From<Vec<u8>> for WireValue {
    fn from(bytes: Vec<u8>) -> Self {
        WireValue::Bytes(bytes)
    }
}

impl From<Vec<WireValue>> for WireValue {
    fn from(items: Vec<WireValue>) -> Self {
        WireValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dict_builder_preserves_insertion_order() {
        let value = WireValue::dict()
            .with("zeta", "last-alphabetically")
            .with("alpha", 1)
            .with("mid", vec![WireValue::from("x")]);

        let WireValue::Dict(entries) = &value else {
            panic!("expected dict");
        };
        let keys: Vec<&[u8]> = entries.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![&b"zeta"[..], &b"alpha"[..], &b"mid"[..]]);
    }

    #[test]
    fn test_insert_replaces_existing_key_in_place() {
        let mut value = WireValue::dict().with("a", 1).with("b", 2);
        value.insert("a", 3);

        assert_eq!(value.get("a").and_then(WireValue::as_int), Some(3));
        let WireValue::Dict(entries) = &value else {
            panic!("expected dict");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, b"a");
    }

    #[test]
    fn test_accessors_on_wrong_shape() {
        let value = WireValue::from(5);
        assert!(value.as_str().is_none());
        assert!(value.as_list().is_none());
        assert!(value.get("x").is_none());
        assert_eq!(value.as_int(), Some(5));
    }

    #[test]
    fn test_as_str_rejects_invalid_utf8() {
        let value = WireValue::Bytes(vec![0xff, 0xfe]);
        assert!(value.as_str().is_none());
        assert_eq!(value.as_bytes(), Some(&[0xff, 0xfe][..]));
    }

    #[test]
    fn test_debug_renders_strings() {
        let value = WireValue::dict().with("op", "describe");
        assert_eq!(format!("{:?}", value), r#"{"op": "describe"}"#);
    }
}
