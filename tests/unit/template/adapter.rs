use super::*;
use serde_json::json;

fn template(value: serde_json::Value) -> Template {
    Template::from_json(&value.to_string()).unwrap()
}

fn legacy_template() -> Template {
    template(json!({
        "id": "lg-1",
        "name": "legacy",
        "fields": ["工事名", "撮影日", "工種"],
        "designSettings": {
            "position": {"x": 10.0, "y": 50.0},
            "width": 80.0,
            "height": 20.0,
            "style": "green"
        }
    }))
}

#[test]
fn legacy_synthesis_converts_percent_and_fixes_grid() {
    let resolved = adapt(&legacy_template()).unwrap();
    assert_eq!(resolved.source, LayoutSource::Legacy);
    assert!(resolved.source.is_legacy());

    let board = resolved.cfg.board;
    assert!((board.x - 0.1).abs() < 1e-12);
    assert!((board.y - 0.5).abs() < 1e-12);
    assert!((board.w - 0.8).abs() < 1e-12);
    assert_eq!(board.h, Some(0.2));
    assert_eq!(board.anchor, Anchor::TopLeft);

    assert_eq!(resolved.cfg.grid.columns, 1);
    assert_eq!(resolved.cfg.safe_area, SafeArea::default());
    assert_eq!(resolved.cfg.style.variant, BoardVariant::Green);
    assert_eq!(resolved.cfg.style.opacity, DEFAULT_OPACITY);
}

#[test]
fn legacy_color_overrides_win_over_variant_defaults() {
    let t = template(json!({
        "id": "lg-2",
        "name": "legacy",
        "designSettings": {
            "position": {"x": 0.0, "y": 0.0},
            "width": 50.0,
            "height": 30.0,
            "style": "black",
            "bgColor": "#102030",
            "textColor": "#ffffee",
            "opacity": 0.5
        }
    }));
    let style = adapt(&t).unwrap().cfg.style;
    assert_eq!(style.variant, BoardVariant::Black);
    assert_eq!(style.bg.to_rgba8(), [16, 32, 48, 255]);
    assert_eq!(style.fg.to_rgba8(), [255, 255, 238, 255]);
    assert_eq!(style.opacity, 0.5);
}

#[test]
fn legacy_font_size_maps_pixels_and_passes_fractions() {
    let with_font = |v: serde_json::Value| {
        template(json!({
            "id": "lg-3",
            "name": "legacy",
            "designSettings": {
                "position": {"x": 0.0, "y": 0.0},
                "width": 50.0,
                "height": 30.0,
                "style": "green",
                "fontSize": v
            }
        }))
    };

    let px = adapt(&with_font(json!(48.0))).unwrap();
    assert!((px.cfg.typography.base - 48.0 / 960.0).abs() < 1e-12);

    let frac = adapt(&with_font(json!(0.06))).unwrap();
    assert!((frac.cfg.typography.base - 0.06).abs() < 1e-12);

    assert!(adapt(&with_font(json!(-4.0))).is_err());
}

#[test]
fn legacy_rejects_degenerate_geometry() {
    let t = template(json!({
        "id": "lg-4",
        "name": "legacy",
        "designSettings": {
            "position": {"x": 0.0, "y": 0.0},
            "width": 0.0,
            "height": 30.0,
            "style": "green"
        }
    }));
    assert!(matches!(adapt(&t), Err(KokubanError::Layout(_))));
}

#[test]
fn modern_requires_board_and_grid_groups() {
    let no_board = template(json!({
        "id": "md-1",
        "name": "modern",
        "designSettings": {"grid": {}}
    }));
    assert!(matches!(adapt(&no_board), Err(KokubanError::Layout(_))));

    let no_grid = template(json!({
        "id": "md-2",
        "name": "modern",
        "designSettings": {"board": {"x": 0.1, "y": 0.1, "w": 0.5}}
    }));
    assert!(matches!(adapt(&no_grid), Err(KokubanError::Layout(_))));

    let no_pos = template(json!({
        "id": "md-3",
        "name": "modern",
        "designSettings": {"board": {"x": 0.1}, "grid": {}}
    }));
    assert!(matches!(adapt(&no_pos), Err(KokubanError::Layout(_))));
}

#[test]
fn modern_merges_overrides_over_defaults() {
    let t = template(json!({
        "id": "md-4",
        "name": "modern",
        "designSettings": {
            "board": {"x": 0.5, "y": 0.95, "w": 0.7, "anchor": "bottom_center"},
            "grid": {"columns": 3},
            "typography": {"scaleTitle": 1.6},
            "safeArea": {"top": 0.05, "left": 0.04},
            "style": {"variant": "white", "opacity": 0.8}
        },
        "layout_id": "v2"
    }));
    let resolved = adapt(&t).unwrap();
    assert_eq!(resolved.source, LayoutSource::Modern);

    let cfg = resolved.cfg;
    assert_eq!(cfg.board.anchor, Anchor::BottomCenter);
    assert_eq!(cfg.board.h, None);
    assert_eq!(cfg.grid.columns, 3);
    assert_eq!(cfg.grid.gap, DEFAULT_GAP);
    assert_eq!(cfg.grid.title_placement, TitlePlacement::Left);
    assert_eq!(cfg.typography.base, DEFAULT_FONT_BASE);
    assert_eq!(cfg.typography.title_scale, 1.6);
    assert_eq!(cfg.safe_area.top, 0.05);
    assert_eq!(cfg.safe_area.bottom, 0.0);
    assert_eq!(cfg.style.variant, BoardVariant::White);
    assert_eq!(cfg.style.opacity, 0.8);
}

#[test]
fn modern_validates_ranges() {
    let columns_out = template(json!({
        "id": "md-5",
        "name": "modern",
        "designSettings": {
            "board": {"x": 0.1, "y": 0.1, "w": 0.5},
            "grid": {"columns": 5}
        }
    }));
    assert!(adapt(&columns_out).is_err());

    let wide_safe_area = template(json!({
        "id": "md-6",
        "name": "modern",
        "designSettings": {
            "board": {"x": 0.1, "y": 0.1, "w": 0.5},
            "grid": {},
            "safeArea": {"left": 0.6}
        }
    }));
    assert!(adapt(&wide_safe_area).is_err());

    let bad_w = template(json!({
        "id": "md-7",
        "name": "modern",
        "designSettings": {
            "board": {"x": 0.1, "y": 0.1, "w": 1.4},
            "grid": {}
        }
    }));
    assert!(adapt(&bad_w).is_err());
}

#[test]
fn layout_id_on_legacy_shape_still_takes_the_legacy_path() {
    let t = template(json!({
        "id": "lg-5",
        "name": "legacy",
        "designSettings": {
            "position": {"x": 5.0, "y": 5.0},
            "width": 40.0,
            "height": 25.0,
            "style": "green"
        },
        "layout_id": "stray"
    }));
    assert_eq!(adapt(&t).unwrap().source, LayoutSource::Legacy);
}
