use super::fonts::{FONT_FAMILY, FONT_TIMEOUT, FONT_VARIANTS};
use super::*;
use crate::embed::client::{ClientVars, FONT_JS, INLINE_JS, PREFETCH_JS};
use crate::embed::{Template, TemplateVars};
use serde_json::{Value, json};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const HARNESS: &str = include_str!("testdata/harness.js");

/// Run a rendered client script against the fake page described by `page`.
/// Returns `None` when node is not installed.
fn run<V: TemplateVars>(template: Template<V>, vars: &V, page: Value) -> Option<Value> {
    run_source(&template.render(vars), page)
}

fn run_source(script: &str, page: Value) -> Option<Value> {
    let node = which::which("node").ok()?;
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("page.js");
    let script = script.replace("__DEV__", "false");
    fs::write(&file, HARNESS.replace("__SCRIPT__", &script)).unwrap();

    let output = Command::new(node)
        .arg(&file)
        .arg(page.to_string())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    Some(serde_json::from_slice(&output.stdout).unwrap())
}

fn classes(state: &Value) -> Vec<&str> {
    state["classes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

// ============================================================================
// inline.js
// ============================================================================

#[test]
fn test_absent_scheme_normalized_to_light() {
    let Some(state) = run(INLINE_JS, &ClientVars, json!({})) else {
        return;
    };
    assert!(!classes(&state).contains(&DARK_CLASS));
    assert!(!classes(&state).contains(&"no-js"));
    assert_eq!(state["local"][DARK_MODE_KEY], LIGHT_VALUE);
}

#[test]
fn test_restores_dark_scheme() {
    let page = json!({
        "local": { DARK_MODE_KEY: DARK_VALUE },
        "toggle": TOGGLE_SELECTOR,
        "actions": ["ready"],
    });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert!(classes(&state).contains(&DARK_CLASS));
    assert_eq!(state["pressed"], "true");
}

#[test]
fn test_unknown_stored_value_is_light() {
    let page = json!({ "local": { DARK_MODE_KEY: "maybe" } });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert!(!classes(&state).contains(&DARK_CLASS));
    assert_eq!(state["local"][DARK_MODE_KEY], LIGHT_VALUE);
}

#[test]
fn test_toggle_flips_and_persists() {
    let page = json!({
        "toggle": TOGGLE_SELECTOR,
        "actions": ["ready", "click", "snapshot", "click", "snapshot", "click", "snapshot"],
    });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    let seen: Vec<_> = state["snapshots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            let dark = s["classes"]
                .as_array()
                .unwrap()
                .contains(&Value::from(DARK_CLASS));
            (dark, s["local"][DARK_MODE_KEY].clone(), s["pressed"].clone())
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            (true, json!(DARK_VALUE), json!("true")),
            (false, json!(LIGHT_VALUE), json!("false")),
            (true, json!(DARK_VALUE), json!("true")),
        ]
    );
}

#[test]
fn test_storage_event_mirrors_without_persisting() {
    let page = json!({
        "actions": [
            { "storage": [DARK_MODE_KEY, DARK_VALUE] },
            { "storage": ["other", null] },
        ],
    });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert!(classes(&state).contains(&DARK_CLASS));
    // the writing tab owns persistence
    assert_eq!(state["local"][DARK_MODE_KEY], LIGHT_VALUE);
}

#[test]
fn test_disabled_storage_falls_back_to_light() {
    let page = json!({ "brokenStorage": true, "actions": ["ready"] });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert!(!classes(&state).contains(&DARK_CLASS));
    assert_eq!(state["scripts"], json!([FONT_SCRIPT]));
}

#[test]
fn test_deferred_scripts_queued() {
    let page = json!({ "prefetch": true, "actions": ["ready"] });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert_eq!(state["scripts"], json!([FONT_SCRIPT, PREFETCH_SCRIPT]));

    let page = json!({
        "session": { FONTS_CACHED_KEY: "true" },
        "actions": ["ready"],
    });
    let Some(state) = run(INLINE_JS, &ClientVars, page) else {
        return;
    };
    assert!(classes(&state).contains(&FONTS_LOADED_CLASS));
    assert_eq!(state["scripts"], json!([]));
}

// ============================================================================
// font.js
// ============================================================================

fn shorthands() -> Vec<String> {
    FONT_VARIANTS
        .iter()
        .map(|v| v.shorthand(FONT_FAMILY))
        .collect()
}

#[test]
fn test_all_font_variants_load() {
    let page = json!({ "fonts": { "delay": 5 }, "wait": 60 });
    let Some(state) = run(FONT_JS, &ClientVars, page) else {
        return;
    };
    assert_eq!(state["fonts"], json!(shorthands()));
    assert!(classes(&state).contains(&FONTS_LOADED_CLASS));
    assert_eq!(state["session"][FONTS_CACHED_KEY], "true");
}

#[test]
fn test_cached_fonts_skip_loading() {
    let page = json!({
        "fonts": {},
        "session": { FONTS_CACHED_KEY: "true" },
    });
    let Some(state) = run(FONT_JS, &ClientVars, page) else {
        return;
    };
    assert_eq!(state["fonts"], json!([]));
    assert!(classes(&state).contains(&FONTS_LOADED_CLASS));
}

#[test]
fn test_missing_font_variant_fails() {
    let missing = FONT_VARIANTS[3].shorthand(FONT_FAMILY);
    let page = json!({ "fonts": { "missing": [missing] }, "wait": 60 });
    let Some(state) = run(FONT_JS, &ClientVars, page) else {
        return;
    };
    assert!(classes(&state).contains(&FONTS_FAILED_CLASS));
    assert!(!classes(&state).contains(&FONTS_LOADED_CLASS));
    assert!(state["session"].get(FONTS_CACHED_KEY).is_none());
}

#[test]
fn test_slow_fonts_time_out() {
    let timeout = format!("var TIMEOUT = {};", FONT_TIMEOUT.as_millis());
    let script = FONT_JS
        .render(&ClientVars)
        .replace(&timeout, "var TIMEOUT = 30;");
    let page = json!({ "fonts": { "delay": 400 }, "wait": 120 });
    let Some(state) = run_source(&script, page) else {
        return;
    };
    assert!(classes(&state).contains(&FONTS_FAILED_CLASS));
    assert!(state["session"].get(FONTS_CACHED_KEY).is_none());
}

#[test]
fn test_no_font_loading_api_fails() {
    let Some(state) = run(FONT_JS, &ClientVars, json!({})) else {
        return;
    };
    assert!(classes(&state).contains(&FONTS_FAILED_CLASS));
}

// ============================================================================
// prefetch.js
// ============================================================================

fn capable(extra: Value) -> Value {
    let mut page = json!({
        "prefetch": true,
        "observer": true,
        "connection": { "saveData": false, "effectiveType": "4g" },
        "anchors": [
            { "href": MAIN_TARGET },
            { "href": "/about/", "classes": [SKIP_NAV_CLASS] },
            { "href": "#intro", "classes": [HEADING_ANCHOR_CLASS] },
            { "href": format!("/{FEED_PATH}") },
            { "href": "https://elsewhere.example/" },
            { "href": "/posts/two/" },
            { "href": "https://blog.example/posts/two/" },
            { "href": "../../c/" },
        ],
        "actions": ["intersect", "intersect"],
    });
    if let (Some(page), Some(extra)) = (page.as_object_mut(), extra.as_object()) {
        page.extend(extra.clone());
    }
    page
}

#[test]
fn test_prefetches_eligible_links_once() {
    let Some(state) = run(PREFETCH_JS, &ClientVars, capable(json!({}))) else {
        return;
    };
    let expected = json!(["https://blog.example/posts/two/", "https://blog.example/c/"]);
    assert_eq!(state["observed"], expected);
    assert_eq!(state["prefetched"], expected);
}

#[test]
fn test_prefetch_gating() {
    for extra in [
        json!({ "connection": { "saveData": true } }),
        json!({ "connection": { "effectiveType": "slow-2g" } }),
        json!({ "observer": false }),
        json!({ "prefetch": false }),
    ] {
        let Some(state) = run(PREFETCH_JS, &ClientVars, capable(extra.clone())) else {
            return;
        };
        assert_eq!(state["observed"], json!([]), "{extra}");
        assert_eq!(state["prefetched"], json!([]), "{extra}");
    }

    let Some(state) = run(PREFETCH_JS, &ClientVars, capable(json!({ "connection": null }))) else {
        return;
    };
    assert_eq!(state["prefetched"].as_array().map(Vec::len), Some(2));
}
