//! Lenient access to the provider payload.
//!
//! The upstream schema is undocumented, so every lookup returns `None` for a
//! missing or wrongly-typed field instead of failing.

use serde_json::{Map, Value};

pub trait Lookup {
    /// Follows `path` through nested objects.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).and_then(Value::as_str)
    }

    /// Like [`Lookup::str_at`] but treats `""` as absent.
    fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.str_at(path).filter(|s| !s.is_empty())
    }

    fn u64_at(&self, path: &[&str]) -> Option<u64> {
        self.at(path).and_then(Value::as_u64)
    }

    fn object_at(&self, path: &[&str]) -> Option<&Map<String, Value>> {
        self.at(path).and_then(Value::as_object)
    }

    fn array_at(&self, path: &[&str]) -> &[Value] {
        self.at(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Lookup for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |cur, key| cur.as_object()?.get(*key))
    }
}

/// A single rendition entry: `{ url, width?, height?, thumbnail? }`.
#[derive(Debug, Clone, Copy)]
pub struct Variant<'a> {
    pub url: &'a str,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub thumbnail: Option<&'a str>,
}

impl<'a> Variant<'a> {
    /// Reads a variant; entries without a string `url` are not variants.
    pub fn from_value(v: &'a Value) -> Option<Self> {
        Some(Self {
            url: v.str_at(&["url"])?,
            width: v.u64_at(&["width"]),
            height: v.u64_at(&["height"]),
            thumbnail: v.str_at(&["thumbnail"]),
        })
    }
}

/// All usable variants of a map, in document order.
pub fn variants(map: &Map<String, Value>) -> impl Iterator<Item = Variant<'_>> {
    map.values().filter_map(Variant::from_value)
}
