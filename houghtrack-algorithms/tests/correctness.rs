#![allow(clippy::cast_precision_loss, clippy::float_cmp)]
use houghtrack_algorithms::{
    find_peaks, HoughConfig, HoughTransform, LineSource, NoiseSource, PeakConfig, Scenario,
    REFERENCE_TRACKS,
};
use houghtrack_core::{LineParams, Point, PointSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn line_set(name: &str, slope: f64, intercept: f64) -> PointSet {
    PointSet::track(
        name,
        LineSource::new(slope, intercept, 20, 0.5).points().unwrap(),
    )
}

fn default_transform() -> HoughTransform {
    HoughTransform::new(HoughConfig::default()).unwrap()
}

#[test]
fn test_reference_line_peak_has_all_votes() {
    // y = 0.5x + 2, x = 0, 0.5, ..., 9.5; θ in [0°, 180°) step 0.5°; r in [-5, 5) / 100.
    let acc = default_transform()
        .run(&[line_set("track", 0.5, 2.0)])
        .unwrap();
    let combined = acc.combined();
    let max = combined.max_cell().unwrap();
    assert_eq!(max.votes, 20);

    let expected = LineParams::from_slope_intercept(0.5, 2.0);
    let theta = combined.theta_of(max.theta_bin);
    assert!(theta > std::f64::consts::FRAC_PI_2, "wrong tan branch");
    assert!((theta.tan() + 2.0).abs() < 0.05, "tan(theta) = {}", theta.tan());
    assert!((theta - expected.theta).abs() <= combined.sweep().step());
    assert!((combined.r_center_of(max.r_bin) - expected.r).abs() <= combined.radial().bin_width());
}

#[test]
fn test_collinear_points_meet_in_true_cell() {
    // Lines whose normal angle is sampled exactly by the sweep.
    let transform = default_transform();
    for (slope, intercept) in [(0.0, 2.05), (-1.0, 2.0)] {
        let acc = transform.run(&[line_set("track", slope, intercept)]).unwrap();
        let grid = acc.combined();
        let line = LineParams::from_slope_intercept(slope, intercept);
        let theta_bin = grid.sweep().nearest_step(line.theta).unwrap();
        let r_bin = grid.r_bin_of(line.r).unwrap();
        assert_eq!(grid.get(theta_bin, r_bin), Some(20), "line y = {slope}x + {intercept}");
    }
}

#[test]
fn test_voting_twice_doubles_every_cell() {
    let transform = default_transform();
    let points = LineSource::new(1.5, -2.0, 20, 0.5).points().unwrap();

    let mut once = transform.grid();
    for p in &points {
        transform.vote_grid(&mut once, p);
    }
    let mut twice = once.clone();
    for p in &points {
        transform.vote_grid(&mut twice, p);
    }

    for (a, b) in once.counts().iter().zip(twice.counts()) {
        assert_eq!(*b, 2 * a);
    }
    assert_eq!(twice.dropped(), 2 * once.dropped());
}

#[test]
fn test_disjoint_runs_sum_to_concatenated_run() {
    let transform = default_transform();
    let mut rng = StdRng::seed_from_u64(11);
    let a = line_set("a", 0.3, 3.0);
    let b = PointSet::noise(
        "b",
        NoiseSource::new(40, (0.0, 10.0), (-4.0, 20.0))
            .points(&mut rng)
            .unwrap(),
    );
    let mut joined: Vec<Point> = a.points().to_vec();
    joined.extend_from_slice(b.points());

    let mut summed = transform.run(&[a]).unwrap().into_combined();
    summed
        .merge(transform.run(&[b]).unwrap().combined())
        .unwrap();
    let concatenated = transform
        .run(&[PointSet::track("ab", joined)])
        .unwrap()
        .into_combined();

    assert_eq!(summed, concatenated);
}

#[test]
fn test_theta_min_is_sampled() {
    let sweep = houghtrack_core::AngleSweep::new(0.3, 1.3, 0.25).unwrap();
    let config = HoughConfig::default().with_sweep(sweep);
    let transform = HoughTransform::new(config).unwrap();
    let point = Point::new(1.0, 0.0);

    let mut grid = transform.grid();
    transform.vote_grid(&mut grid, &point);
    let r_bin = grid.r_bin_of(0.3_f64.cos()).unwrap();
    assert_eq!(grid.get(0, r_bin), Some(1));
    assert_eq!(transform.trace(&point)[0].0, 0.3);
}

#[test]
fn test_boundary_radius_counted_exactly_once() {
    // At θ = 0, r = x exactly; 2.0 is the lower edge of bin 70.
    let transform = default_transform();
    let mut grid = transform.grid();
    transform.vote_grid(&mut grid, &Point::new(2.0, 0.0));

    let column: u32 = grid.row(0).unwrap().iter().sum();
    assert_eq!(column, 1);
    assert_eq!(grid.get(0, 70), Some(1));
}

#[test]
fn test_out_of_window_votes_are_dropped_not_errors() {
    let transform = default_transform();
    let acc = transform
        .run(&[PointSet::noise("far", vec![Point::new(100.0, 100.0)])])
        .unwrap();
    let grid = acc.combined();
    assert!(grid.dropped() > 0);
    assert_eq!(
        grid.total_votes() + grid.dropped(),
        grid.sweep().steps() as u64
    );
}

#[test]
fn test_zero_noise_grid_is_empty_and_neutral() {
    let transform = default_transform();
    let mut rng = StdRng::seed_from_u64(5);
    let sets = Scenario::five_tracks(0).generate(&mut rng).unwrap();
    let with_noise_grid = transform.run(&sets).unwrap();
    let without_noise_grid = transform.run(&sets[..5]).unwrap();

    let noise = with_noise_grid.group("noise").unwrap();
    assert_eq!(noise.points, 0);
    assert!(noise.grid.counts().iter().all(|&c| c == 0));
    assert_eq!(with_noise_grid.combined(), without_noise_grid.combined());
}

#[test]
fn test_noise_does_not_disturb_track_votes() {
    let transform = default_transform();
    let clean = transform.run(&[line_set("track", 0.5, 2.0)]).unwrap();
    let peak = clean.combined().max_cell().unwrap();

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = NoiseSource::new(50, (0.0, 10.0), (-4.0, 20.0))
            .points(&mut rng)
            .unwrap();
        let noisy = transform
            .run(&[line_set("track", 0.5, 2.0), PointSet::noise("noise", noise)])
            .unwrap();

        assert_eq!(noisy.group("track").unwrap().grid, clean.groups()[0].grid);
        let votes = noisy
            .combined()
            .get(peak.theta_bin, peak.r_bin)
            .unwrap();
        assert!(votes >= 20);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(99);
    let sets = Scenario::five_tracks(500).generate(&mut rng).unwrap();

    let sequential = default_transform().run(&sets).unwrap();
    let parallel = HoughTransform::new(
        HoughConfig::default()
            .with_parallel(true)
            .with_chunk_size(7),
    )
    .unwrap()
    .run(&sets)
    .unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_independent_analyses_run_concurrently() {
    let transform = default_transform();
    let sets_a = vec![line_set("a", 0.5, 2.0)];
    let sets_b = vec![line_set("b", 0.3, 3.0)];

    let (a, b) = std::thread::scope(|s| {
        let ha = s.spawn(|| transform.run(&sets_a).unwrap());
        let hb = s.spawn(|| transform.run(&sets_b).unwrap());
        (ha.join().unwrap(), hb.join().unwrap())
    });

    assert_eq!(a, transform.run(&sets_a).unwrap());
    assert_eq!(b, transform.run(&sets_b).unwrap());
}

#[test]
fn test_five_reference_tracks_are_recovered() {
    let mut rng = StdRng::seed_from_u64(0);
    let sets = Scenario::five_tracks(0).generate(&mut rng).unwrap();
    let acc = default_transform().run(&sets).unwrap();
    let peaks = find_peaks(acc.combined(), &PeakConfig::new().with_threshold(12));

    for &(slope, intercept) in &REFERENCE_TRACKS {
        let line = LineParams::from_slope_intercept(slope, intercept);
        let found = peaks.iter().any(|p| {
            (p.theta - line.theta).abs() <= 1.0_f64.to_radians() && (p.r - line.r).abs() <= 0.15
        });
        assert!(found, "no peak near y = {slope}x + {intercept}");
    }
    assert!(peaks[0].votes >= 20);
}
