use canvas_fx::{
    apply_adjustments, run_pipeline, AdjustmentField, AdjustmentParams, FilterEngine, FilterKind,
    PixelBuffer,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn image() -> impl Strategy<Value = PixelBuffer> {
    (1u32..9, 1u32..9).prop_flat_map(|(w, h)| {
        vec(any::<u8>(), (w * h * 4) as usize)
            .prop_map(move |raw| PixelBuffer::from_raw(w, h, raw).unwrap())
    })
}

fn filter() -> impl Strategy<Value = FilterKind> {
    prop::sample::select(FilterKind::ALL.to_vec())
}

fn params() -> impl Strategy<Value = AdjustmentParams> {
    (0..=100i32, -100..=100i32, -100..=100i32, -100..=100i32, 0..4i32).prop_map(
        |(intensity, contrast, brightness, saturation, blur_radius)| AdjustmentParams {
            intensity,
            contrast,
            brightness,
            saturation,
            blur_radius,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_none_with_defaults_is_identity(source in image(), intensity in 0..=100i32) {
        let params = AdjustmentParams { intensity, ..AdjustmentParams::default() };
        prop_assert_eq!(run_pipeline(&source, FilterKind::None, &params), source);
    }

    #[test]
    fn prop_default_adjustments_are_a_no_op(source in image(), kind in filter()) {
        let styled = kind.apply(source.view(), 0.7);
        let adjusted = apply_adjustments(styled.view(), &AdjustmentParams::default());
        prop_assert_eq!(adjusted, styled);
    }

    #[test]
    fn prop_pipeline_is_deterministic(source in image(), kind in filter(), p in params()) {
        prop_assert_eq!(run_pipeline(&source, kind, &p), run_pipeline(&source, kind, &p));
    }

    #[test]
    fn prop_effects_keep_shape_and_alpha(source in image(), kind in filter(), p in params()) {
        let p = AdjustmentParams { blur_radius: 0, ..p };
        let out = run_pipeline(&source, kind, &p);

        prop_assert_eq!((out.width(), out.height()), (source.width(), source.height()));
        for y in 0..source.height() {
            for x in 0..source.width() {
                let before = source.pixel(x, y).unwrap();
                let after = out.pixel(x, y).unwrap();
                prop_assert_eq!(before[3], after[3]);
            }
        }
    }

    #[test]
    fn prop_extreme_params_never_panic(
        source in image(),
        kind in filter(),
        raw in prop::array::uniform5(any::<i32>()),
    ) {
        let p = AdjustmentParams {
            intensity: raw[0],
            contrast: raw[1],
            brightness: raw[2],
            saturation: raw[3],
            blur_radius: raw[4],
        };
        let out = run_pipeline(&source, kind, &p);
        prop_assert_eq!(out.byte_len(), source.byte_len());
    }

    #[test]
    fn prop_blur_leaves_border_untouched(source in image(), radius in 1..4i32) {
        let params = AdjustmentParams { blur_radius: radius, ..AdjustmentParams::default() };
        let out = run_pipeline(&source, FilterKind::None, &params);
        let r = radius as u32;

        for y in 0..source.height() {
            for x in 0..source.width() {
                let interior = x >= r && y >= r && x + r < source.width() && y + r < source.height();
                if !interior {
                    prop_assert_eq!(out.pixel(x, y), source.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn prop_reset_then_recompute_is_pristine(
        source in image(),
        kind in filter(),
        contrast in -100..=100i32,
        blur in 0..3i32,
    ) {
        let mut engine = FilterEngine::default();
        engine.set_source(source.clone());
        engine.select_filter(kind);
        engine.set_adjustment(AdjustmentField::Contrast, contrast).unwrap();
        engine.set_adjustment(AdjustmentField::Blur, blur).unwrap();
        engine.recompute().unwrap();

        engine.reset().unwrap();
        let result = engine.recompute().unwrap();
        prop_assert_eq!(&*result.buffer, &source);
    }
}

#[test]
fn vintage_scenario_on_two_by_two() {
    let source = PixelBuffer::from_raw(
        2,
        2,
        vec![
            200, 100, 50, 255, //
            10, 220, 90, 255, //
            0, 0, 0, 255, //
            255, 255, 255, 255,
        ],
    )
    .unwrap();
    let out = run_pipeline(&source, FilterKind::Vintage, &AdjustmentParams::default());

    // Pure black stays black; pure white saturates in R and G.
    assert_eq!(out.pixel(0, 1), Some([0, 0, 0, 255]));
    let white = out.pixel(1, 1).unwrap();
    assert_eq!(&white[..2], &[255, 255]);
    assert!((white[2] as i32 - 239).abs() <= 1);
}

#[test]
fn neon_half_values_round_to_even() {
    let source = PixelBuffer::from_raw(2, 1, vec![3, 7, 11, 255, 15, 19, 23, 255]).unwrap();
    let out = run_pipeline(&source, FilterKind::Neon, &AdjustmentParams::default());
    assert_eq!(out.to_vec(), vec![4, 10, 16, 255, 22, 28, 34, 255]);
}

#[test]
fn oil_paint_half_mean_rounds_to_even() {
    let source = PixelBuffer::from_raw(
        2,
        2,
        vec![2, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255],
    )
    .unwrap();
    let out = run_pipeline(&source, FilterKind::OilPaint, &AdjustmentParams::default());
    assert!(out.to_vec().chunks(4).all(|px| *px == [0, 0, 0, 255]));
}
