// config.rs - Gallery construction options
//
// Every field is optional on the JS side. Names are camelCase to match
// what a page script would pass; `image`/`text` are accepted as aliases
// for `mediaUrl`/`label`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{GalleryError, GalleryResult};
use crate::scene::DEFAULT_ITEMS;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(alias = "image")]
    pub media_url: String,
    #[serde(alias = "text", default)]
    pub label: String,
}

impl GalleryItem {
    pub fn new(media_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self { media_url: media_url.into(), label: label.into() }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    pub items: Vec<GalleryItem>,
    pub bend: f32,
    pub text_color: String,
    pub border_radius: f32,
    pub font: String,
    pub scroll_speed: f32,
    pub scroll_ease: f32,
    pub size_multiplier: f32,
    pub mobile_play_cap: usize,
    pub desktop_play_cap: usize,
    pub crossfade_ms: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            bend: 1.0,
            text_color: "#ffffff".to_string(),
            border_radius: 0.0,
            font: "bold 30px Figtree".to_string(),
            scroll_speed: 2.0,
            scroll_ease: 0.05,
            size_multiplier: 1.0,
            mobile_play_cap: 3,
            desktop_play_cap: 6,
            crossfade_ms: 250.0,
        }
    }
}

impl GalleryConfig {
    /// Parse and validate a JSON object. `null`, whether for the whole
    /// object or for a single field, yields the default.
    pub fn from_json(json: &str) -> GalleryResult<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        strip_nulls(&mut value);
        if let Some(items) = value.get_mut("items").and_then(Value::as_array_mut) {
            items.iter_mut().for_each(strip_nulls);
        }
        let cfg: Self = serde_json::from_value(value)?;
        cfg.validated()
    }

    pub fn validated(self) -> GalleryResult<Self> {
        let finite = [
            ("bend", self.bend),
            ("borderRadius", self.border_radius),
            ("scrollSpeed", self.scroll_speed),
            ("scrollEase", self.scroll_ease),
            ("sizeMultiplier", self.size_multiplier),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(GalleryError::config(format!("{name} must be finite")));
            }
        }
        if !(self.scroll_ease > 0.0 && self.scroll_ease <= 1.0) {
            return Err(GalleryError::config("scrollEase must be in (0, 1]"));
        }
        if self.size_multiplier <= 0.0 {
            return Err(GalleryError::config("sizeMultiplier must be positive"));
        }
        if !(0.0..=0.5).contains(&self.border_radius) {
            return Err(GalleryError::config("borderRadius must be in [0, 0.5]"));
        }
        if !self.crossfade_ms.is_finite() || self.crossfade_ms < 0.0 {
            return Err(GalleryError::config("crossfadeMs must be a non-negative number"));
        }
        if let Some(i) = self.items.iter().position(|it| it.media_url.trim().is_empty()) {
            return Err(GalleryError::config(format!("items[{i}] has an empty media url")));
        }
        Ok(self)
    }

    /// Configured items, or the built-in placeholder set when none were given.
    pub fn items_or_default(&self) -> Vec<GalleryItem> {
        if self.items.is_empty() {
            DEFAULT_ITEMS.iter().map(|&(url, label)| GalleryItem::new(url, label)).collect()
        } else {
            self.items.clone()
        }
    }
}

/// Drop `null` members so serde falls back to the field default.
fn strip_nulls(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, v| !v.is_null());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = GalleryConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GalleryConfig::default());
        assert_eq!(GalleryConfig::from_json("null").unwrap(), GalleryConfig::default());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        assert_eq!(GalleryConfig::from_json(r#"{"items": null}"#).unwrap(), GalleryConfig::default());

        let cfg = GalleryConfig::from_json(r#"{"bend": null, "font": null, "scrollEase": 0.2}"#).unwrap();
        assert_eq!(cfg.bend, 1.0);
        assert_eq!(cfg.font, GalleryConfig::default().font);
        assert_eq!(cfg.scroll_ease, 0.2);

        let cfg = GalleryConfig::from_json(r#"{"items": [{"image": "a.jpg", "text": null}]}"#).unwrap();
        assert_eq!(cfg.items, vec![GalleryItem::new("a.jpg", "")]);

        // a url is still required
        assert!(GalleryConfig::from_json(r#"{"items": [{"image": null}]}"#).is_err());
    }

    #[test]
    fn accepts_js_field_names_and_aliases() {
        let cfg = GalleryConfig::from_json(
            r#"{
                "items": [
                    { "image": "a.mp4", "text": "A" },
                    { "mediaUrl": "b.jpg", "label": "B" },
                    { "image": "c.png" }
                ],
                "bend": 3,
                "scrollEase": 0.1,
                "mobilePlayCap": 2
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.items[0], GalleryItem::new("a.mp4", "A"));
        assert_eq!(cfg.items[1], GalleryItem::new("b.jpg", "B"));
        assert_eq!(cfg.items[2].label, "");
        assert_eq!(cfg.bend, 3.0);
        assert_eq!(cfg.scroll_ease, 0.1);
        assert_eq!(cfg.mobile_play_cap, 2);
        assert_eq!(cfg.desktop_play_cap, 6);
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{"scrollEase": 0}"#,
            r#"{"scrollEase": 1.5}"#,
            r#"{"sizeMultiplier": -1}"#,
            r#"{"borderRadius": 0.9}"#,
            r#"{"crossfadeMs": -10}"#,
            r#"{"items": [{"image": "  "}]}"#,
        ] {
            let err = GalleryConfig::from_json(json).unwrap_err();
            assert!(matches!(err, GalleryError::Config(_)), "{json}: {err}");
        }
        assert!(matches!(
            GalleryConfig::from_json(r#"{"bend": "x"}"#).unwrap_err(),
            GalleryError::Json(_)
        ));
    }

    #[test]
    fn falls_back_to_placeholder_items() {
        let cfg = GalleryConfig::default();
        let items = cfg.items_or_default();
        assert_eq!(items.len(), DEFAULT_ITEMS.len());
        assert!(items.iter().all(|it| !it.media_url.is_empty()));

        let cfg = GalleryConfig { items: vec![GalleryItem::new("x.jpg", "x")], ..Default::default() };
        assert_eq!(cfg.items_or_default(), vec![GalleryItem::new("x.jpg", "x")]);
    }
}
