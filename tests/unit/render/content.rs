use super::*;
use crate::foundation::geom::Anchor;
use crate::render::surface::BoardImage;
use crate::template::adapter::{BoardSpec, GridSpec, SafeArea, StyleSpec, TypographySpec};
use crate::template::fields::FieldKey;
use crate::template::model::BoardVariant;

fn green_cfg(placement: TitlePlacement) -> LayoutConfig {
    let variant = BoardVariant::Green;
    LayoutConfig {
        board: BoardSpec {
            x: 0.05,
            y: 0.05,
            w: 0.9,
            h: Some(0.9),
            anchor: Anchor::TopLeft,
        },
        grid: GridSpec {
            columns: 2,
            gap: 0.012,
            title_placement: placement,
        },
        typography: TypographySpec {
            base: 0.045,
            title_scale: 1.3,
        },
        safe_area: SafeArea::default(),
        style: StyleSpec {
            variant,
            opacity: 0.92,
            bg: variant.bg_color(),
            fg: variant.text_color(),
        },
    }
}

fn square_rects() -> BoardRects {
    let r = PxRect {
        x: 10,
        y: 10,
        w: 180,
        h: 180,
    };
    BoardRects { outer: r, inner: r }
}

fn sample_fields() -> Vec<ResolvedField<'static>> {
    vec![
        ResolvedField {
            label: "工事名",
            key: Some(FieldKey::ProjectName),
            value: "国道改良舗装工事".to_string(),
            strategy: DrawStrategy::Title,
        },
        ResolvedField {
            label: "工種",
            key: Some(FieldKey::WorkType),
            value: "舗装工".to_string(),
            strategy: DrawStrategy::Cell,
        },
        ResolvedField {
            label: "撮影日",
            key: Some(FieldKey::Timestamp),
            value: "2024/05/01".to_string(),
            strategy: DrawStrategy::Cell,
        },
        ResolvedField {
            label: "備考",
            key: Some(FieldKey::Remarks),
            value: "基礎の据付状況を撮影。配筋は設計図書のとおり。".to_string(),
            strategy: DrawStrategy::Remarks,
        },
    ]
}

fn pixel(image: &BoardImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * image.width + x) * 4) as usize;
    [
        image.data[i],
        image.data[i + 1],
        image.data[i + 2],
        image.data[i + 3],
    ]
}

fn painted(image: &BoardImage) -> usize {
    image.data.chunks_exact(4).filter(|p| p[3] > 0).count()
}

#[test]
fn zero_area_inner_rect_draws_nothing() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();
    let mut surface = BoardSurface::new(64, 64).unwrap();
    let rects = BoardRects {
        outer: PxRect {
            x: 4,
            y: 4,
            w: 56,
            h: 56,
        },
        inner: PxRect {
            x: 4,
            y: 4,
            w: 0,
            h: 56,
        },
    };
    let cfg = green_cfg(TitlePlacement::Left);
    draw_content(&mut surface, &mut engine, &sample_fields(), &cfg, rects).unwrap();
    assert_eq!(painted(&surface.finish()), 0);
}

#[test]
fn border_frames_the_inner_rect_and_the_middle_stays_clear() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();
    let mut surface = BoardSurface::new(200, 200).unwrap();
    let cfg = green_cfg(TitlePlacement::Left);
    draw_content(&mut surface, &mut engine, &[], &cfg, square_rects()).unwrap();
    let image = surface.finish();

    // 180 px inner height puts the border at 2 px.
    let white = [255, 255, 255, 255];
    assert_eq!(pixel(&image, 100, 11), white);
    assert_eq!(pixel(&image, 100, 188), white);
    assert_eq!(pixel(&image, 11, 100), white);
    assert_eq!(pixel(&image, 188, 100), white);
    assert_eq!(pixel(&image, 100, 100), [0, 0, 0, 0]);
    assert_eq!(pixel(&image, 5, 100), [0, 0, 0, 0]);
}

#[test]
fn watermark_lands_in_the_bottom_right_corner() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();
    let mut surface = BoardSurface::new(200, 200).unwrap();
    let cfg = green_cfg(TitlePlacement::Left);
    draw_content(&mut surface, &mut engine, &[], &cfg, square_rects()).unwrap();
    let image = surface.finish();

    let mut stamped = false;
    for y in 100..188u32 {
        for x in 100..188u32 {
            if pixel(&image, x, y)[3] > 0 {
                stamped = true;
            }
        }
    }
    assert!(stamped, "watermark glyphs missing from the corner region");
}

#[test]
fn populated_fields_paint_more_than_an_empty_board() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();

    let cfg = green_cfg(TitlePlacement::Left);
    let mut bare = BoardSurface::new(200, 200).unwrap();
    draw_content(&mut bare, &mut engine, &[], &cfg, square_rects()).unwrap();
    let bare = painted(&bare.finish());

    let mut full = BoardSurface::new(200, 200).unwrap();
    draw_content(&mut full, &mut engine, &sample_fields(), &cfg, square_rects()).unwrap();
    let full = painted(&full.finish());

    assert!(full > bare, "field text added no paint ({full} <= {bare})");
}

#[test]
fn centered_titles_draw_without_a_label() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();
    let cfg = green_cfg(TitlePlacement::Center);
    let mut surface = BoardSurface::new(200, 200).unwrap();
    draw_content(&mut surface, &mut engine, &sample_fields(), &cfg, square_rects()).unwrap();
    let image = surface.finish();

    // The title band sits directly under the top border; centered text must
    // put paint near the horizontal middle of that band.
    let mut centered = 0usize;
    for y in 13..26u32 {
        for x in 85..115u32 {
            if pixel(&image, x, y)[3] > 0 {
                centered += 1;
            }
        }
    }
    assert!(centered > 0, "no centered title paint found");
}

#[test]
fn empty_remarks_leave_the_band_unpainted() {
    let Ok(font_bytes) = std::fs::read("assets/NotoSansJP-Regular.ttf") else {
        return;
    };
    let mut engine = TextEngine::new(font_bytes).unwrap();
    let cfg = green_cfg(TitlePlacement::Left);
    let fields = vec![ResolvedField {
        label: "備考",
        key: Some(FieldKey::Remarks),
        value: String::new(),
        strategy: DrawStrategy::Remarks,
    }];
    let mut surface = BoardSurface::new(200, 200).unwrap();
    draw_content(&mut surface, &mut engine, &fields, &cfg, square_rects()).unwrap();
    let image = surface.finish();

    // Inside the border, above the watermark corner: nothing drawn.
    let mut body = 0usize;
    for y in 20..150u32 {
        for x in 20..150u32 {
            if pixel(&image, x, y)[3] > 0 {
                body += 1;
            }
        }
    }
    assert_eq!(body, 0);
}
