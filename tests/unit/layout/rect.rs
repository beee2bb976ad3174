use super::*;
use crate::foundation::geom::Anchor;
use crate::template::adapter::{
    BoardSpec, GridSpec, SafeArea, StyleSpec, TypographySpec,
};
use crate::template::model::BoardVariant;

fn cfg_with(board: BoardSpec, safe_area: SafeArea) -> LayoutConfig {
    LayoutConfig {
        board,
        grid: GridSpec::default(),
        typography: TypographySpec {
            base: 0.045,
            title_scale: 1.3,
        },
        safe_area,
        style: StyleSpec {
            variant: BoardVariant::Green,
            opacity: 1.0,
            bg: BoardVariant::Green.bg_color(),
            fg: BoardVariant::Green.text_color(),
        },
    }
}

fn top_left_board(x: f64, y: f64, w: f64, h: Option<f64>) -> BoardSpec {
    BoardSpec {
        x,
        y,
        w,
        h,
        anchor: Anchor::TopLeft,
    }
}

fn square_fit() -> Fit {
    Fit::contain(1000.0, 1000.0, 1000.0, 1000.0).unwrap()
}

#[test]
fn legacy_board_projects_to_its_configured_percents() {
    let cfg = cfg_with(top_left_board(0.1, 0.5, 0.8, Some(0.2)), SafeArea::default());
    let rects = resolve_rects(&cfg, LayoutSource::Legacy, 0.1864, square_fit());
    assert_eq!(
        rects.outer,
        PxRect {
            x: 100,
            y: 500,
            w: 800,
            h: 200
        }
    );
    assert_eq!(rects.inner, rects.outer);
}

#[test]
fn height_is_the_larger_of_configured_and_computed() {
    let cfg = cfg_with(top_left_board(0.1, 0.1, 0.8, Some(0.1)), SafeArea::default());
    let rects = resolve_rects(&cfg, LayoutSource::Legacy, 0.25, square_fit());
    assert_eq!(rects.outer.h, 250);

    let taller = cfg_with(top_left_board(0.1, 0.1, 0.8, Some(0.4)), SafeArea::default());
    let rects = resolve_rects(&taller, LayoutSource::Modern, 0.25, square_fit());
    assert_eq!(rects.outer.h, 400);
}

#[test]
fn safe_area_padding_grows_the_computed_minimum() {
    // 0.2 of content plus 10% padding top and bottom needs 0.25 outer.
    let sa = SafeArea {
        top: 0.1,
        bottom: 0.1,
        left: 0.0,
        right: 0.0,
    };
    let cfg = cfg_with(top_left_board(0.1, 0.1, 0.8, None), sa);
    let rects = resolve_rects(&cfg, LayoutSource::Modern, 0.2, square_fit());
    assert_eq!(rects.outer.h, 250);
    assert_eq!(rects.inner.h, 200);
}

#[test]
fn legacy_top_edge_moves_only_for_the_on_surface_clamp() {
    let fits = cfg_with(top_left_board(0.1, 0.5, 0.8, Some(0.2)), SafeArea::default());
    assert_eq!(
        resolve_rects(&fits, LayoutSource::Legacy, 0.0, square_fit()).outer.y,
        500
    );

    let overhangs = cfg_with(top_left_board(0.1, 0.9, 0.8, Some(0.2)), SafeArea::default());
    let rects = resolve_rects(&overhangs, LayoutSource::Legacy, 0.0, square_fit());
    assert_eq!(rects.outer.y, 800);
    assert_eq!(rects.outer.h, 200);
}

#[test]
fn modern_bottom_overflow_reduces_y_not_h() {
    let cfg = cfg_with(top_left_board(0.1, 0.95, 0.8, None), SafeArea::default());
    let rects = resolve_rects(&cfg, LayoutSource::Modern, 0.3, square_fit());
    assert_eq!(rects.outer.y, 700);
    assert_eq!(rects.outer.h, 300);
}

#[test]
fn anchors_resolve_before_projection() {
    let board = BoardSpec {
        x: 0.5,
        y: 1.0,
        w: 0.6,
        h: None,
        anchor: Anchor::BottomCenter,
    };
    let cfg = cfg_with(board, SafeArea::default());
    let rects = resolve_rects(&cfg, LayoutSource::Modern, 0.25, square_fit());
    assert_eq!(
        rects.outer,
        PxRect {
            x: 200,
            y: 750,
            w: 600,
            h: 250
        }
    );
}

#[test]
fn inner_rect_always_contained_for_valid_safe_areas() {
    let fit = Fit::contain(997.0, 713.0, 640.0, 480.0).unwrap();
    let fractions = [0.0, 0.04, 0.1, 0.25, 0.49];
    for top in fractions {
        for bottom in fractions {
            if top + bottom >= 1.0 {
                continue;
            }
            for left in fractions {
                for right in fractions {
                    if left + right >= 1.0 {
                        continue;
                    }
                    let sa = SafeArea {
                        top,
                        bottom,
                        left,
                        right,
                    };
                    let cfg = cfg_with(top_left_board(0.07, 0.11, 0.77, None), sa);
                    let rects = resolve_rects(&cfg, LayoutSource::Modern, 0.41, fit);
                    assert!(
                        rects.outer.contains_rect(rects.inner),
                        "inner {:?} escaped outer {:?} for safe area {sa:?}",
                        rects.inner,
                        rects.outer
                    );
                }
            }
        }
    }
}

#[test]
fn projection_rounds_each_dimension_once() {
    let fit = Fit::contain(4000.0, 3000.0, 997.0, 713.0).unwrap();
    let cfg = cfg_with(top_left_board(0.123, 0.321, 0.456, Some(0.234)), SafeArea::default());
    let rects = resolve_rects(&cfg, LayoutSource::Legacy, 0.0, fit);

    assert_eq!(rects.outer.x, (fit.dx + 0.123 * fit.draw_w).round() as i32);
    assert_eq!(rects.outer.y, (fit.dy + 0.321 * fit.draw_h).round() as i32);
    assert_eq!(rects.outer.w, (0.456 * fit.draw_w).round() as i32);
    assert_eq!(rects.outer.h, (0.234 * fit.draw_h).round() as i32);
}
