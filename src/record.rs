//! One dump row: an ordered attribute mapping with unique keys.
//! Values are kept as raw (unescaped) strings; numeric reads never mutate the record.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// `PostTypeId` assumed when the attribute is missing.
pub const DEFAULT_POST_TYPE: &str = "1";
pub const QUESTION: &str = "1";
pub const ANSWER: &str = "2";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    attrs: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { attrs: Vec::with_capacity(n) }
    }

    /// Build from pairs; a repeated key overwrites the earlier value in place.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut r = Self::new();
        for (k, v) in pairs {
            r.insert(k, v);
        }
        r
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Integer view of an attribute; missing or non-numeric values read as 0.
    /// Integers outside the `i64` range saturate.
    pub fn int_or_zero(&self, key: &str) -> i64 {
        self.get(key).map_or(0, parse_int_lenient)
    }

    pub fn post_type(&self) -> &str {
        self.get_or("PostTypeId", DEFAULT_POST_TYPE)
    }

    #[inline]
    pub fn is_question(&self) -> bool {
        self.post_type() == QUESTION
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

fn parse_int_lenient(raw: &str) -> i64 {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        0
    } else if negative {
        i64::MIN
    } else {
        i64::MAX
    }
}

// Serialized as a JSON object in attribute order.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attrs.len()))?;
        for (k, v) in &self.attrs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
