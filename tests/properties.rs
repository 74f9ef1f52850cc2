mod common;

use common::init_logging;
use common::synthetic_image::{constant_rgba, inverted, vertical_line_rgba};
use nalgebra::{Matrix2, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vesselness::stages::{solve_symmetric_2x2, vesselness_score, EigenPair, Hessian};
use vesselness::{
    compute_vesselness, AutoC, Error, FilterParams, PipelineOptions, Polarity, VesselnessFilter,
};
use vesselness::image::ImageRgba;
use vesselness::preprocess::Preprocess;

#[test]
fn constant_image_is_zero_at_every_derivative_stage() {
    init_logging();
    let frame = constant_rgba(40, 30, 0.6);
    let mut filter = VesselnessFilter::new(40, 30, PipelineOptions::default()).unwrap();
    filter.process(&frame, &FilterParams::default()).unwrap();
    let ws = filter.workspace();

    assert!(ws.blurred().data.iter().all(|&g| (g - 0.6).abs() < 1e-5));
    assert!(ws.gradient().data.iter().all(|g| g.fx == 0.0 && g.fy == 0.0));
    assert!(ws
        .hessian()
        .data
        .iter()
        .all(|h| h.fxx == 0.0 && h.fxy == 0.0 && h.fyy == 0.0));
    assert!(ws.eigen().data.iter().all(|p| p.l1 == 0.0 && p.l2 == 0.0));
    assert!(ws.vesselness().data.iter().all(|&v| v == 0.0));
}

#[test]
fn eigenvalues_are_ordered_and_match_a_reference_solver() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..10_000 {
        let fxx: f32 = rng.gen_range(-100.0..100.0);
        let fxy: f32 = rng.gen_range(-100.0..100.0);
        let fyy: f32 = rng.gen_range(-100.0..100.0);
        let pair = solve_symmetric_2x2(&Hessian::new(fxx, fxy, fyy));
        assert!(pair.is_ordered(), "unordered {pair:?} for ({fxx}, {fxy}, {fyy})");

        // compare as sets: near-opposite eigenvalues make magnitude order ambiguous
        let m = Matrix2::new(fxx as f64, fxy as f64, fxy as f64, fyy as f64);
        let mut expected: Vec<f64> = SymmetricEigen::new(m).eigenvalues.iter().copied().collect();
        expected.sort_by(f64::total_cmp);
        let mut got = [pair.l1 as f64, pair.l2 as f64];
        got.sort_by(f64::total_cmp);
        let tol = 1e-2 * (1.0 + expected[0].abs().max(expected[1].abs()));
        for (g, e) in got.iter().zip(&expected) {
            assert!((g - e).abs() < tol, "{pair:?} vs {expected:?}");
        }
    }
}

#[test]
fn vesselness_stays_in_unit_range_and_respects_the_sign_test() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10_000 {
        let a: f32 = rng.gen_range(-1e4..1e4);
        let b: f32 = rng.gen_range(-1e4..1e4);
        let pair = if a.abs() <= b.abs() {
            EigenPair { l1: a, l2: b }
        } else {
            EigenPair { l1: b, l2: a }
        };
        let beta = rng.gen_range(0.05..2.0);
        let c = rng.gen_range(0.01..100.0);
        let v = vesselness_score(pair, beta, c, Polarity::Bright);
        assert!((0.0..=1.0).contains(&v), "{v} for {pair:?}");
        if pair.l2 >= 0.0 {
            assert_eq!(v, 0.0);
        }
    }
}

#[test]
fn beta_relaxes_and_c_tightens_the_response() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2_000 {
        let l2: f32 = -rng.gen_range(0.1..500.0);
        let l1: f32 = l2 * rng.gen_range(0.01..1.0) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let pair = EigenPair { l1, l2 };

        let mut prev = 0.0;
        for beta in [0.1, 0.25, 0.5, 1.0, 2.0] {
            let v = vesselness_score(pair, beta, 15.0, Polarity::Bright);
            assert!(v + 1e-7 >= prev, "beta={beta}: {v} < {prev} for {pair:?}");
            prev = v;
        }

        let mut prev = 1.0;
        for c in [0.5, 2.0, 15.0, 60.0, 250.0] {
            let v = vesselness_score(pair, 0.5, c, Polarity::Bright);
            assert!(v <= prev + 1e-7, "c={c}: {v} > {prev} for {pair:?}");
            prev = v;
        }
    }
}

#[test]
fn inverted_dark_ridges_match_bright_ones() {
    init_logging();
    let params = FilterParams::default();
    let bright = vertical_line_rgba(96, 64, 48);
    let dark = inverted(&bright);

    let reference = compute_vesselness(&bright, &params).unwrap();

    let dark_opts = PipelineOptions::default().with_polarity(Polarity::Dark);
    let mut dark_filter = VesselnessFilter::new(96, 64, dark_opts).unwrap();
    let from_dark = dark_filter.process(&dark, &params).unwrap().clone();

    let invert_opts = PipelineOptions::default().with_preprocess(Preprocess {
        invert: true,
        global_contrast: None,
        clahe: None,
    });
    let mut invert_filter = VesselnessFilter::new(96, 64, invert_opts).unwrap();
    let from_inverted = invert_filter.process(&dark, &params).unwrap().clone();

    for ((&r, &d), &i) in reference
        .data
        .iter()
        .zip(&from_dark.data)
        .zip(&from_inverted.data)
    {
        assert!((r - d).abs() < 1e-4, "dark polarity {d} vs {r}");
        assert!((r - i).abs() < 1e-4, "inverted input {i} vs {r}");
    }
    assert!(from_dark.get(48, 32) > 0.3);
}

#[test]
fn auto_c_scales_to_the_frame() {
    init_logging();
    let frame = vertical_line_rgba(128, 128, 64);
    let opts = PipelineOptions::default().with_auto_c(AutoC::HalfMaxNorm);
    let mut filter = VesselnessFilter::new(128, 128, opts).unwrap();
    let v = filter.process(&frame, &FilterParams::default()).unwrap();
    // S = max S at the line centre and Rb = 0 there: 1 - exp(-2)
    let expected = 1.0 - (-2.0f32).exp();
    assert!((v.get(64, 64) - expected).abs() < 1e-3, "peak {}", v.get(64, 64));
    let c = filter.last_effective_c().unwrap();
    assert!(c > 0.0 && c != 15.0);
}

#[test]
fn auto_c_falls_back_on_flat_frames() {
    init_logging();
    let opts = PipelineOptions::default().with_auto_c(AutoC::Percentile(90.0));
    let mut filter = VesselnessFilter::new(16, 16, opts).unwrap();
    let params = FilterParams::default().with_c(4.0);
    filter.process(&constant_rgba(16, 16, 0.2), &params).unwrap();
    assert_eq!(filter.last_effective_c(), Some(4.0));
}

#[test]
fn boundary_errors_are_reported() {
    let frame = constant_rgba(8, 8, 0.5);
    assert!(matches!(
        compute_vesselness(&frame, &FilterParams::default().with_sigma(-1.0)),
        Err(Error::InvalidParameter { name: "sigma", .. })
    ));
    assert_eq!(
        compute_vesselness(&ImageRgba::new(0, 8), &FilterParams::default()),
        Err(Error::EmptyImage)
    );

    let mut filter = VesselnessFilter::new(8, 8, PipelineOptions::default()).unwrap();
    assert!(matches!(
        filter.process(&constant_rgba(9, 8, 0.5), &FilterParams::default()),
        Err(Error::DimensionMismatch { .. })
    ));
}
