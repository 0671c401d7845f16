// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the wire-facing model types

use cloak_control::model::{ProfileBook, ProfileRanges};
use cloak_control::{ColorRangeSet, Effect, Hsv};
use serde_json::json;

#[test]
fn test_range_set_from_server_reply() {
    let set: ColorRangeSet = serde_json::from_value(json!({
        "status": "ok",
        "ranges": [
            { "hsv_min": [35, 80, 80], "hsv_max": [85, 255, 255] },
            { "hsv_min": [100, 150, 0], "hsv_max": [140, 255, 255] }
        ],
        "active_idx": 1
    }))
    .unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.active_idx(), 1);
    assert_eq!(set.active().unwrap().hsv_min, Hsv::new(100, 150, 0));
}

#[test]
fn test_range_set_clamps_active_index() {
    let set: ColorRangeSet = serde_json::from_value(json!({
        "ranges": [{ "hsv_min": [0, 0, 0], "hsv_max": [179, 255, 255] }],
        "active_idx": 4
    }))
    .unwrap();
    assert_eq!(set.active_idx(), 0);
}

#[test]
fn test_profile_book_keeps_server_order() {
    let book: ProfileBook = serde_json::from_value(json!({
        "zeta": {
            "color_ranges": [{ "hsv_min": [0, 0, 0], "hsv_max": [10, 255, 255] }],
            "active_idx": 0,
            "effect": "cartoon"
        },
        "alpha": { "hsv_min": [100, 150, 0], "hsv_max": [140, 255, 255] },
        "broken": { "something": "else" }
    }))
    .unwrap();

    let names: Vec<&str> = book.names().collect();
    assert_eq!(names, ["zeta", "alpha", "broken"]);

    let zeta = book.get("zeta").unwrap();
    assert_eq!(zeta.effect, Effect::Cartoon);
    assert!(matches!(zeta.ranges, Some(ProfileRanges::MultiRange(_))));

    let alpha = book.get("alpha").unwrap();
    assert!(alpha.ranges.as_ref().is_some_and(ProfileRanges::is_legacy));
    assert_eq!(alpha.effect, Effect::None);

    // Undecodable entries stay listed so they can be deleted
    assert_eq!(book.get("broken").unwrap().summary(), "unreadable");
}
