use super::*;

#[test]
fn oversample_uses_the_multiplier_until_the_pixel_budget_binds() {
    let opts = OversampleOpts::default();
    assert!((opts.effective_scale(800, 600) - 1.5).abs() < 1e-9);

    // 3000x2000 at 1.5x would be 13.5M pixels; the budget caps the scale.
    let capped = opts.effective_scale(3000, 2000);
    assert!(capped < 1.5);
    let px = 3000.0 * capped * 2000.0 * capped;
    assert!(px <= 12_000_000.0 + 1.0);

    // Already over budget at 1x: never scale below 1.
    assert!((opts.effective_scale(5000, 4000) - 1.0).abs() < 1e-9);
    assert!((opts.effective_scale(0, 100) - 1.0).abs() < 1e-9);
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let mut img = BoardImage {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    img.unpremultiply();
    assert!(!img.premultiplied);
    assert_eq!(&img.data[..4], &[255, 0, 0, 128]);
    assert_eq!(&img.data[4..], &[10, 20, 30, 255]);

    // A second call is a no-op.
    let before = img.data.clone();
    img.unpremultiply();
    assert_eq!(img.data, before);
}

#[test]
fn photo_rejects_mismatched_buffers() {
    assert!(Photo::from_rgba8(vec![0; 12], 2, 2).is_err());
    assert!(Photo::from_rgba8(vec![0; 16], 2, 2).is_ok());
}

#[test]
fn surface_rejects_degenerate_dimensions() {
    assert!(BoardSurface::new(0, 10).is_err());
    assert!(BoardSurface::new(10, 0).is_err());
    assert!(BoardSurface::new(70_000, 10).is_err());
}

#[test]
fn filled_rect_lands_on_the_expected_pixels() {
    let mut surface = BoardSurface::new(4, 4).unwrap();
    surface.fill_rect(
        PxRect {
            x: 0,
            y: 0,
            w: 4,
            h: 2,
        },
        ColorDef::rgba(1.0, 0.0, 0.0, 1.0),
    );
    let img = surface.finish();
    assert_eq!(img.width, 4);
    assert_eq!(img.height, 4);

    // Top half opaque red, bottom half untouched.
    assert_eq!(&img.data[..4], &[255, 0, 0, 255]);
    let below = 2 * 4 * 4;
    assert_eq!(&img.data[below..below + 4], &[0, 0, 0, 0]);
}

#[test]
fn photo_draw_covers_the_fitted_area() {
    let photo = Photo::from_rgba8(vec![0, 255, 0, 255].repeat(4), 2, 2).unwrap();
    let fit = Fit::contain(2.0, 2.0, 4.0, 4.0).unwrap();

    let mut surface = BoardSurface::new(4, 4).unwrap();
    surface.draw_photo(&photo, fit);
    let img = surface.finish();

    for px in img.data.chunks_exact(4) {
        assert_eq!(px, &[0, 255, 0, 255]);
    }
}
