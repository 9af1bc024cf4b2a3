// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reads [`GalleryConfig`] from page globals.
//!
//! Lookup order: a `SKITTLE_CONFIG` object, then the `VIDEO1`..`VIDEO3`
//! strings, then defaults.

use skittle_core::Error;
use skittle_core::config::GalleryConfig;
use tracing::{info, warn};
use wasm_bindgen::JsValue;
use web_sys::Window;

const CONFIG_GLOBAL: &str = "SKITTLE_CONFIG";
const VIDEO_GLOBALS: [&str; 3] = ["VIDEO1", "VIDEO2", "VIDEO3"];

/// Parses a JSON config, keeping defaults for missing fields.
pub fn config_from_json(json: &str) -> Result<GalleryConfig, Error> {
    serde_json::from_str(json).map_err(|e| Error::Decode {
        what: "gallery config",
        reason: e.to_string(),
    })
}

/// Builds the config from the page's globals.
#[must_use]
pub fn page_config(window: &Window) -> GalleryConfig {
    if let Some(config) = global(window, CONFIG_GLOBAL).and_then(|v| from_object(&v)) {
        info!(videos = ?config.videos, "gallery config from {CONFIG_GLOBAL}");
        return config;
    }

    let names = VIDEO_GLOBALS.map(|name| global(window, name).and_then(|v| v.as_string()));
    if let [Some(a), Some(b), Some(c)] = names {
        let config = GalleryConfig::with_videos([a, b, c]);
        info!(videos = ?config.videos, "gallery config from VIDEO globals");
        return config;
    }

    warn!("no gallery config on the page; using defaults");
    GalleryConfig::default()
}

fn global(window: &Window, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn from_object(value: &JsValue) -> Option<GalleryConfig> {
    let json = js_sys::JSON::stringify(value).ok()?.as_string()?;
    match config_from_json(&json) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(error = %err, "ignoring malformed {CONFIG_GLOBAL}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skittle_core::slot::SlotIndex;

    #[test]
    fn json_config_overrides_selected_fields() {
        let config =
            config_from_json(r#"{"videos":["harbor","city","forest"],"api_base":"/demo"}"#)
                .expect("valid config");
        assert_eq!(
            config.media_url(SlotIndex::ALL[0]),
            "/demo/api/Video/starter/harbor.mp4"
        );
        assert_eq!(config.image_dir, "img/");
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = config_from_json(r#"{"videos":"harbor"}"#).expect_err("wrong shape");
        assert!(matches!(err, Error::Decode { .. }));
    }
}
