//! Flattens a raw provider payload into a [`PinResult`].
//!
//! Extraction runs in a fixed order: metadata, primary media block, story
//! pages, carousel slots, then the thumbnail fallback. Each pass only appends.
//! Map entries are visited in document order.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::payload::{variants, Lookup, Variant};
use crate::select::{select, IMAGE_SIZE_PRIORITY, VIDEO_QUALITY_PRIORITY};
use crate::types::{Author, MediaItem, MediaKind, PinResult};

const DEFAULT_TITLE: &str = "Pin";
const DEFAULT_AUTHOR: &str = "Pin User";
const VIDEO_URL_MARKERS: &[&str] = &[".mp4", "video"];

/// Never fails: absent or mistyped fields simply contribute nothing.
pub fn normalize(raw: &Value) -> PinResult {
    let mut pin = PinResult {
        id: pin_id(raw),
        title: pin_title(raw),
        description: raw
            .str_at(&["description"])
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        images: Vec::new(),
        videos: Vec::new(),
        author: pin_author(raw),
    };

    primary_media(raw, &mut pin);
    story_pages(raw, &mut pin);
    carousel_slots(raw, &mut pin);
    if pin.is_empty() {
        fallback_thumbnail(raw, &mut pin);
    }
    pin
}

/// Normalize, then drop repeated urls.
pub fn extract(raw: &Value) -> PinResult {
    deduplicate(normalize(raw))
}

/// Keeps the first entry for each url, independently for images and videos.
pub fn deduplicate(mut pin: PinResult) -> PinResult {
    dedup_by_url(&mut pin.images);
    dedup_by_url(&mut pin.videos);
    pin
}

pub fn dedup_by_url(items: &mut Vec<MediaItem>) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|m| seen.insert(m.url.clone()));
}

fn pin_id(raw: &Value) -> String {
    match raw.at(&["id"]) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn pin_title(raw: &Value) -> String {
    if let Some(t) = raw.text_at(&["title"]).or_else(|| raw.text_at(&["alt_text"])) {
        return t.to_string();
    }
    match raw.text_at(&["type"]).or_else(|| raw.text_at(&["media", "media_type"])) {
        Some(kind) => format!("{DEFAULT_TITLE} {kind}"),
        None => DEFAULT_TITLE.to_string(),
    }
}

fn pin_author(raw: &Value) -> Option<Author> {
    let pinner = raw.at(&["pinner"]).filter(|p| p.is_object())?;
    let name = pinner
        .text_at(&["full_name"])
        .or_else(|| pinner.text_at(&["username"]))
        .unwrap_or(DEFAULT_AUTHOR);
    let avatar = pinner
        .text_at(&["image_medium_url"])
        .or_else(|| pinner.text_at(&["image_small_url"]));
    Some(Author {
        name: name.to_string(),
        avatar_url: avatar.map(str::to_string),
    })
}

fn item(kind: MediaKind, v: Variant<'_>) -> MediaItem {
    MediaItem::new(kind, v.url).with_dimensions(v.width, v.height)
}

fn primary_media(raw: &Value, pin: &mut PinResult) {
    let media_type = raw.str_at(&["media", "media_type"]);
    let Some(items) = raw.object_at(&["media", "items"]) else {
        return;
    };

    match media_type {
        Some(kind @ ("image" | "gif")) => {
            let kind = if kind == "gif" {
                MediaKind::Gif
            } else {
                MediaKind::Image
            };
            // An unranked first entry is always recorded as a plain image.
            let chosen = match select(items, IMAGE_SIZE_PRIORITY) {
                Some((_, v)) => Some(item(kind, v)),
                None => items
                    .values()
                    .next()
                    .and_then(Variant::from_value)
                    .map(|v| item(MediaKind::Image, v)),
            };
            pin.images.extend(chosen);
        }
        Some("video") => {
            match select(items, VIDEO_QUALITY_PRIORITY) {
                Some((_, v)) => {
                    let thumbnail = v.thumbnail.map(str::to_string);
                    pin.videos.push(item(MediaKind::Video, v).with_thumbnail(thumbnail));
                }
                None => pin.videos.extend(
                    variants(items)
                        .filter(|v| VIDEO_URL_MARKERS.iter().any(|m| v.url.contains(m)))
                        .map(|v| item(MediaKind::Video, v)),
                ),
            }
            if let Some(thumb) = raw.at(&["thumbnails", "orig"]).and_then(Variant::from_value) {
                pin.images.push(item(MediaKind::Image, thumb));
            }
        }
        _ => {}
    }
}

fn story_pages(raw: &Value, pin: &mut PinResult) {
    for page in raw.array_at(&["story_pin_data", "pages"]) {
        for block in page.array_at(&["blocks"]) {
            push_all(&mut pin.videos, MediaKind::Video, block.object_at(&["video", "video_list"]));
            push_all(&mut pin.images, MediaKind::Image, block.object_at(&["image", "images"]));
        }
    }
}

fn carousel_slots(raw: &Value, pin: &mut PinResult) {
    for slot in raw.array_at(&["carousel_data", "carousel_slots"]) {
        push_all(&mut pin.images, MediaKind::Image, slot.object_at(&["images"]));
    }
}

fn fallback_thumbnail(raw: &Value, pin: &mut PinResult) {
    let chosen = raw
        .object_at(&["thumbnails"])
        .and_then(|t| select(t, IMAGE_SIZE_PRIORITY));
    if let Some((_, v)) = chosen {
        pin.images.push(item(MediaKind::Image, v));
    }
}

fn push_all(out: &mut Vec<MediaItem>, kind: MediaKind, map: Option<&Map<String, Value>>) {
    if let Some(map) = map {
        out.extend(variants(map).map(|v| item(kind, v)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urls(items: &[MediaItem]) -> Vec<&str> {
        items.iter().map(|m| m.url.as_str()).collect()
    }

    #[test]
    fn single_image_takes_orig_size() {
        let raw = json!({
            "id": "p1",
            "media": {
                "media_type": "image",
                "items": {
                    "orig": { "url": "https://x/a.jpg", "width": 100, "height": 100 },
                    "60x60": { "url": "https://x/a_small.jpg" }
                }
            }
        });
        let pin = extract(&raw);
        assert_eq!(pin.id, "p1");
        let expected = MediaItem::new(MediaKind::Image, "https://x/a.jpg")
            .with_dimensions(Some(100), Some(100));
        assert_eq!(pin.images, vec![expected]);
        assert!(pin.videos.is_empty());
    }

    #[test]
    fn gif_keeps_its_kind() {
        let raw = json!({ "media": { "media_type": "gif", "items": { "236x": { "url": "g" } } } });
        assert_eq!(normalize(&raw).images[0].kind, MediaKind::Gif);
    }

    #[test]
    fn unranked_gif_entry_is_recorded_as_image() {
        let raw = json!({ "media": { "media_type": "gif", "items": {
            "weird": { "url": "g", "width": 4 }, "other": { "url": "h" }
        } } });
        let pin = normalize(&raw);
        assert_eq!(urls(&pin.images), ["g"]);
        assert_eq!(pin.images[0].kind, MediaKind::Image);
        assert_eq!(pin.images[0].width, Some(4));
    }

    #[test]
    fn unknown_image_sizes_fall_back_to_first_entry() {
        let raw = json!({ "media": { "media_type": "image", "items": {
            "weird_b": { "url": "b" }, "weird_a": { "url": "a" }
        } } });
        assert_eq!(urls(&normalize(&raw).images), ["b"]);
    }

    #[test]
    fn video_priority_beats_map_order_and_adds_thumbnail() {
        let raw = json!({
            "media": { "media_type": "video", "items": {
                "V_HLSV3_MOBILE": { "url": "https://v/m.m3u8" },
                "V_720P": {
                    "url": "https://v/720.mp4",
                    "width": 720,
                    "thumbnail": "https://v/t.jpg"
                }
            } },
            "thumbnails": { "orig": { "url": "https://i/orig.jpg" } }
        });
        let pin = normalize(&raw);
        assert_eq!(urls(&pin.videos), ["https://v/720.mp4"]);
        assert_eq!(pin.videos[0].width, Some(720));
        assert_eq!(pin.videos[0].thumbnail_url.as_deref(), Some("https://v/t.jpg"));
        assert_eq!(urls(&pin.images), ["https://i/orig.jpg"]);
    }

    #[test]
    fn unknown_video_qualities_scan_urls() {
        let raw = json!({ "media": { "media_type": "video", "items": {
            "a": { "url": "https://v/a.mp4" },
            "b": { "url": "https://v/cover.jpg" },
            "c": { "url": "https://video.host/c" }
        } } });
        let pin = normalize(&raw);
        assert_eq!(urls(&pin.videos), ["https://v/a.mp4", "https://video.host/c"]);
        assert!(pin.videos.iter().all(|v| v.thumbnail_url.is_none()));
        assert!(pin.images.is_empty());
    }

    #[test]
    fn video_pin_without_playable_entry_still_gets_thumbnail() {
        let raw = json!({
            "media": { "media_type": "video", "items": {
                "V_EXP3": { "url": "https://v/cover.jpg" },
                "V_EXP5": { "width": 640 }
            } },
            "thumbnails": { "orig": { "url": "t" }, "736x": { "url": "t736" } }
        });
        let pin = extract(&raw);
        assert!(pin.videos.is_empty());
        assert_eq!(urls(&pin.images), ["t"]);
        assert_eq!(pin.images[0].kind, MediaKind::Image);
    }

    #[test]
    fn story_pages_collect_every_variant_in_order() {
        let raw = json!({ "story_pin_data": { "pages": [
            { "blocks": [
                { "video": { "video_list": {
                    "V_EXP7": { "url": "v1" }, "V_EXP4": { "url": "v2" }
                } } },
                { "image": { "images": { "originals": { "url": "i1", "width": 9 } } } }
            ] },
            { "blocks": "not-an-array" },
            { "blocks": [ { "image": { "images": { "736x": { "url": "i2" } } } } ] }
        ] } });
        let pin = normalize(&raw);
        assert_eq!(urls(&pin.videos), ["v1", "v2"]);
        assert_eq!(urls(&pin.images), ["i1", "i2"]);
        assert_eq!(pin.images[0].width, Some(9));
        assert_eq!(pin.images[1].width, None);
    }

    #[test]
    fn carousel_slots_follow_primary_media() {
        let raw = json!({
            "media": { "media_type": "image", "items": { "orig": { "url": "main" } } },
            "carousel_data": { "carousel_slots": [
                { "images": { "orig": { "url": "s1" }, "236x": { "url": "s1_small" } } },
                { "images": null },
                { "images": { "orig": { "url": "s2" } } }
            ] }
        });
        assert_eq!(urls(&normalize(&raw).images), ["main", "s1", "s1_small", "s2"]);
    }

    #[test]
    fn thumbnails_used_only_when_nothing_else_found() {
        let raw = json!({ "thumbnails": { "236x": { "url": "t236" }, "736x": { "url": "t736" } } });
        let pin = normalize(&raw);
        assert_eq!(urls(&pin.images), ["t736"]);
        assert!(pin.videos.is_empty());

        let raw = json!({
            "thumbnails": { "orig": { "url": "thumb" } },
            "carousel_data": { "carousel_slots": [ { "images": { "x": { "url": "slot" } } } ] }
        });
        assert_eq!(urls(&normalize(&raw).images), ["slot"]);
    }

    #[test]
    fn duplicates_keep_first_seen_entry() {
        let raw = json!({
            "media": { "media_type": "image", "items": {
                "orig": { "url": "same", "width": 1 }
            } },
            "carousel_data": { "carousel_slots": [
                { "images": { "orig": { "url": "same", "width": 2 } } }
            ] }
        });
        assert_eq!(normalize(&raw).images.len(), 2);
        let pin = extract(&raw);
        assert_eq!(pin.images.len(), 1);
        assert_eq!(pin.images[0].width, Some(1));
    }

    #[test]
    fn images_and_videos_are_deduplicated_independently() {
        let mut pin = PinResult {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            images: vec![
                MediaItem::new(MediaKind::Image, "u"),
                MediaItem::new(MediaKind::Image, "u"),
            ],
            videos: vec![MediaItem::new(MediaKind::Video, "u")],
            author: None,
        };
        pin = deduplicate(pin);
        assert_eq!(pin.images.len(), 1);
        assert_eq!(pin.videos.len(), 1);
    }

    #[test]
    fn malformed_payload_yields_empty_result() {
        let pin = extract(&json!({ "id": 42, "media": "nope", "story_pin_data": { "pages": {} } }));
        assert_eq!(pin.id, "42");
        assert!(pin.is_empty());
        assert_eq!(pin.title, "Pin");
        assert_eq!(pin.description, "");
        assert!(pin.author.is_none());

        for raw in [json!(null), json!([1, 2]), json!("text")] {
            assert!(extract(&raw).is_empty());
        }
    }

    #[test]
    fn title_and_author_fallbacks() {
        let pin = normalize(&json!({ "alt_text": "alt", "title": "" }));
        assert_eq!(pin.title, "alt");

        let pin = normalize(&json!({ "type": "story" }));
        assert_eq!(pin.title, "Pin story");

        let pin = normalize(&json!({
            "description": "  hello  ",
            "pinner": { "username": "bob", "image_small_url": "small.png" }
        }));
        assert_eq!(pin.description, "hello");
        let author = pin.author.unwrap();
        assert_eq!(author.name, "bob");
        assert_eq!(author.avatar_url.as_deref(), Some("small.png"));

        let author = normalize(&json!({ "pinner": {} })).author.unwrap();
        assert_eq!(author.name, DEFAULT_AUTHOR);
        assert!(author.avatar_url.is_none());
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = json!({
            "media": { "media_type": "video", "items": {
                "x": { "url": "a.mp4" }, "y": { "url": "b.mp4" }
            } },
            "story_pin_data": { "pages": [
                { "blocks": [ { "image": { "images": { "k": { "url": "i" } } } } ] }
            ] }
        });
        assert_eq!(extract(&raw), extract(&raw));
    }
}
