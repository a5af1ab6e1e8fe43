use serde_json::{Map, Value};

use crate::payload::Variant;

/// Image and gif renditions, best first.
pub const IMAGE_SIZE_PRIORITY: &[&str] = &[
    "orig", "736x", "564x", "474x", "236x", "170x", "136x136", "60x60",
];

/// Video renditions, best first.
pub const VIDEO_QUALITY_PRIORITY: &[&str] =
    &["V_720P", "V_480P", "V_360P", "V_HLSV4", "V_HLSV3_MOBILE"];

/// Pick the first rendition present in `map`, trying `priority` keys in order.
/// Membership decides, not the numeric size; an entry without a `url` is not present.
pub fn select<'a, 'p>(
    map: &'a Map<String, Value>,
    priority: &[&'p str],
) -> Option<(&'p str, Variant<'a>)> {
    priority.iter().find_map(|key| {
        map.get(*key)
            .and_then(Variant::from_value)
            .map(|v| (*key, v))
    })
}
