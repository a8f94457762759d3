use imgproc::lowlevel::{correlation_scores, rgb};
use imgproc::{
    detect_object, detect_object_with, precision_threshold, DetectConfig, ImgProcError,
    PixelBuffer,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rgb(rng: &mut StdRng, width: usize, height: usize) -> PixelBuffer {
    let data = (0..width * height * 3)
        .map(|_| rng.random_range(0..=255))
        .collect();
    PixelBuffer::from_raw(data, width, height, 3).unwrap()
}

fn crop(src: &PixelBuffer, x0: usize, y0: usize, width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&rgb(src, x0 + x, y0 + y).unwrap());
        }
    }
    PixelBuffer::from_raw(data, width, height, 3).unwrap()
}

#[test]
fn threshold_formula_for_every_precision() {
    for p in 0..=10 {
        let expected = (15.5 * p as f64).round() as i32 + 100;
        assert_eq!(precision_threshold(p).unwrap(), expected);
    }
    assert_eq!(precision_threshold(0).unwrap(), 100);
    assert_eq!(precision_threshold(10).unwrap(), 255);
}

#[test]
fn cropped_template_scores_maximum_at_its_anchor() {
    let mut rng = StdRng::seed_from_u64(42);
    let src = random_rgb(&mut rng, 24, 20);
    let (x0, y0) = (7, 9);
    let tpl = crop(&src, x0, y0, 6, 5);

    let scores = correlation_scores(&src, &tpl).unwrap();
    assert_eq!((scores.width(), scores.height()), (24, 20));
    let at_anchor = scores.value(x0, y0).unwrap();
    assert!((at_anchor - 255.0).abs() < 1.0, "score {at_anchor}");

    let best = scores
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value))
        .unwrap();
    assert_eq!((best.grid_x, best.grid_y), (x0, y0));
}

#[test]
fn detection_outlines_the_match() {
    let mut rng = StdRng::seed_from_u64(3);
    let src = random_rgb(&mut rng, 30, 24);
    let (x0, y0, tw, th) = (10, 6, 8, 7);
    let tpl = crop(&src, x0, y0, tw, th);

    let hits = correlation_scores(&src, &tpl)
        .unwrap()
        .iter()
        .filter(|p| p.value >= 255.0)
        .count();
    assert_eq!(hits, 1);

    let out = detect_object(&src, &tpl, 10).unwrap();
    assert_eq!((out.width(), out.height(), out.channels()), (30, 24, 3));
    let red = [255, 0, 0];
    // Corners of the outline, including the far bands one pixel past the template.
    assert_eq!(rgb(&out, x0, y0).unwrap(), red);
    assert_eq!(rgb(&out, x0 + tw - 1, y0 + 2).unwrap(), red);
    assert_eq!(rgb(&out, x0 + 2, y0 + th).unwrap(), red);
    assert_eq!(rgb(&out, x0 + tw, y0 + th - 1).unwrap(), red);
    // Interior and far-away pixels keep the source color.
    let inner = (x0 + tw / 2, y0 + th / 2);
    assert_eq!(
        rgb(&out, inner.0, inner.1).unwrap(),
        rgb(&src, inner.0, inner.1).unwrap()
    );
    assert_eq!(rgb(&out, 0, 0).unwrap(), rgb(&src, 0, 0).unwrap());
}

#[test]
fn flat_template_never_marks_anything() {
    // Zero-variance correlation is defined as score 0.
    let mut rng = StdRng::seed_from_u64(11);
    let src = random_rgb(&mut rng, 12, 10);
    let tpl = PixelBuffer::from_raw(vec![120; 4 * 4 * 3], 4, 4, 3).unwrap();
    let out = detect_object(&src, &tpl, 0).unwrap();
    assert_eq!(out.data().unwrap(), src.data().unwrap());
}

#[test]
fn thickness_is_configurable() {
    let mut rng = StdRng::seed_from_u64(5);
    let src = random_rgb(&mut rng, 20, 20);
    let tpl = crop(&src, 4, 4, 8, 8);
    let cfg = DetectConfig {
        precision: 10,
        thickness: 1,
        ..DetectConfig::default()
    };
    let out = detect_object_with(&src, &tpl, &cfg).unwrap();
    assert_eq!(rgb(&out, 4, 4).unwrap(), [255, 0, 0]);
    assert_eq!(rgb(&out, 5, 5).unwrap(), rgb(&src, 5, 5).unwrap());
}

#[test]
fn preconditions_are_checked() {
    let src = PixelBuffer::create(8, 8, 3, true).unwrap();
    let gray_tpl = PixelBuffer::create(2, 2, 1, true).unwrap();
    assert_eq!(
        detect_object(&src, &gray_tpl, 5).unwrap_err(),
        ImgProcError::InsufficientChannels { channels: 1 }
    );

    let tpl = PixelBuffer::create(2, 2, 3, true).unwrap();
    assert_eq!(
        detect_object(&src, &tpl, 11).unwrap_err(),
        ImgProcError::PrecisionOutOfRange { precision: 11 }
    );
}
