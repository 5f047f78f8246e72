use edgesketch::lowlevel::{gaussian_blur, phase_congruency};
use edgesketch::{combine, invert, Filter, FilterKind, PhaseCongruencyConfig, Raster};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_raster(width: usize, height: usize, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    Raster::from_fn(width, height, |_, _| rng.random::<u8>()).unwrap()
}

fn step_edge(width: usize, height: usize) -> Raster {
    Raster::from_fn(width, height, |x, _| if x < width / 2 { 0 } else { 255 }).unwrap()
}

#[test]
fn first_derivative_filters_localize_a_vertical_step() {
    let (width, height) = (16, 10);
    let raster = step_edge(width, height);
    for filter in [Filter::Sobel, Filter::Prewitt, Filter::Scharr] {
        let out = filter.apply(&raster).unwrap();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let v = out.get(x, y).unwrap();
                if x == 7 || x == 8 {
                    assert_eq!(v, 255, "{filter} at ({x}, {y})");
                } else {
                    assert_eq!(v, 0, "{filter} at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn gradient_filters_are_zero_on_flat_input() {
    let raster = Raster::filled(20, 14, 173).unwrap();
    let gradient_kinds = [
        FilterKind::Sobel,
        FilterKind::Prewitt,
        FilterKind::Scharr,
        FilterKind::Roberts,
        FilterKind::Kirsch,
        FilterKind::Log,
        FilterKind::EdgeFlow,
    ];
    for kind in gradient_kinds {
        let out = kind.default_filter().apply(&raster).unwrap();
        assert!(out.data().iter().all(|&v| v == 0), "{kind}");
    }
}

#[test]
fn gaussian_blur_preserves_flat_input() {
    let raster = Raster::filled(15, 9, 77).unwrap();
    for sigma in [0.5, 1.0, 2.5] {
        assert_eq!(gaussian_blur(&raster, sigma).unwrap(), raster);
    }
}

#[test]
fn zero_sigma_blur_is_identity() {
    let raster = random_raster(13, 11, 3);
    assert_eq!(gaussian_blur(&raster, 0.0).unwrap(), raster);
    assert!(gaussian_blur(&raster, -1.0).is_err());
}

#[test]
fn invert_is_an_involution() {
    for seed in 0..4 {
        let raster = random_raster(17, 9, seed);
        assert_eq!(invert(&invert(&raster)), raster);
    }
}

#[test]
fn self_combination_is_identity() {
    let raster = random_raster(21, 8, 11);
    assert_eq!(combine(&raster, &raster).unwrap(), raster);
}

#[test]
fn phase_congruency_on_black_raster_is_zero() {
    let raster = Raster::filled(24, 24, 0).unwrap();
    let out = phase_congruency(&raster, &PhaseCongruencyConfig::default()).unwrap();
    assert!(out.data().iter().all(|&v| v == 0));
}

#[test]
fn every_filter_preserves_dimensions() {
    let raster = random_raster(19, 13, 5);
    for kind in FilterKind::ALL {
        let out = kind.default_filter().apply(&raster).unwrap();
        assert_eq!(out.dimensions(), raster.dimensions(), "{kind}");
    }
}

#[test]
fn filters_handle_single_pixel_rasters() {
    let raster = Raster::filled(1, 1, 200).unwrap();
    for kind in FilterKind::ALL {
        let out = kind.default_filter().apply(&raster).unwrap();
        assert_eq!(out.dimensions(), (1, 1), "{kind}");
    }
}

#[test]
fn invalid_parameters_fail_before_computation() {
    let raster = Raster::filled(8, 8, 10).unwrap();
    let bad = [
        Filter::Dog(edgesketch::DogConfig {
            sigma1: -1.0,
            sigma2: 2.0,
        }),
        Filter::Gabor(edgesketch::GaborConfig {
            sigma: 0.0,
            ..Default::default()
        }),
        Filter::PhaseCongruency(PhaseCongruencyConfig {
            num_orientations: 0,
            num_scales: 4,
        }),
        Filter::ScaleSpace(edgesketch::ScaleSpaceConfig {
            scale_step: f64::NAN,
            ..Default::default()
        }),
        Filter::Combine(vec![Filter::Sobel, Filter::Combine(Vec::new())]),
    ];
    for filter in bad {
        assert!(filter.apply(&raster).is_err(), "{filter:?}");
    }
}

#[test]
fn sigma_extremes_are_identity_or_rejected_up_front() {
    let ramp = Raster::from_fn(8, 8, |x, _| (25 + 20 * x) as u8).unwrap();
    assert_eq!(gaussian_blur(&ramp, 1e-170).unwrap(), ramp);

    let huge = Filter::GaussianBlur(edgesketch::GaussianConfig { sigma: 1e18 });
    assert!(matches!(
        huge.validate(),
        Err(edgesketch::EdgeSketchError::InvalidParameter { name: "sigma", .. })
    ));
    assert!(huge.apply(&ramp).is_err());

    let runaway = Filter::ScaleSpace(edgesketch::ScaleSpaceConfig {
        scales: 110,
        ..Default::default()
    });
    assert!(runaway.validate().is_err());
    assert!(runaway.apply(&ramp).is_err());
}
