use spectra_core::*;

#[test]
fn grid_builds_interior_lines_for_both_axes() {
    let grid = GridAnimator::new(10, 4.0, 1);
    let lines = grid.lines();
    assert_eq!(lines.len(), 2 * 9);
    assert_eq!(lines.iter().filter(|l| l.axis == GridAxis::X).count(), 9);
    for (k, line) in lines.iter().take(9).enumerate() {
        let expected = -1.0 + 2.0 * (k + 1) as f32 / 10.0;
        assert!((line.rest() - expected).abs() < 1e-6);
        assert_eq!(line.spring.value(), line.rest());
        assert_eq!(line.spring.velocity(), 0.0);
    }
    assert_eq!(grid.vertices().len(), 18 * LINE_SEGMENTS * 2);
}

#[test]
fn retarget_schedule_is_staggered_by_index() {
    let grid = GridAnimator::new(6, 4.0, 3);
    for (k, line) in grid.lines().iter().enumerate() {
        let expected = RETARGET_PERIOD_SEC + k as f32 * RETARGET_STAGGER_SEC;
        assert!((line.next_retarget_sec() - expected).abs() < 1e-5);
    }
}

#[test]
fn lines_stay_at_rest_before_first_retarget() {
    let mut grid = GridAnimator::new(8, 4.0, 5);
    for _ in 0..60 {
        grid.update(1.0 / 60.0);
    }
    assert!(grid.lines().iter().all(|l| l.spring.value() == l.rest()));
}

#[test]
fn retargeted_lines_stay_within_jitter_band() {
    let n = 20;
    let mut grid = GridAnimator::new(n, 4.0, 11);
    let spacing = 2.0 / n as f32;
    let bound = RETARGET_JITTER * spacing;
    let mut moved = false;
    for _ in 0..(60 * 12) {
        grid.update(1.0 / 60.0);
        for line in grid.lines() {
            let d = (line.spring.target() - line.rest()).abs();
            assert!(d <= bound + 1e-6, "target off by {d}");
            if line.spring.value() != line.rest() {
                moved = true;
            }
        }
    }
    assert!(moved, "no line was ever retargeted");
    for line in grid.lines() {
        assert!(line.next_retarget_sec() > 12.0 - 1e-3);
    }
}

#[test]
fn density_change_rebuilds_once() {
    let mut grid = GridAnimator::new(10, 4.0, 1);
    let generation = grid.generation();
    assert!(!grid.set_density(10));
    assert_eq!(grid.generation(), generation);
    assert!(grid.set_density(20));
    assert_eq!(grid.generation(), generation + 1);
    assert_eq!(grid.lines().len(), 2 * 19);
    assert_eq!(grid.grid_lines(), 20);
}

#[test]
fn grid_size_feeds_model_matrix() {
    let mut grid = GridAnimator::new(10, 4.0, 1);
    assert!(grid.set_grid_size(8.0));
    assert_eq!(grid.half_extent(), 4.0);
    let corner = grid.model_matrix().transform_point3(glam::Vec3::new(1.0, 0.0, 0.0));
    assert!((corner.x - 4.0).abs() < 1e-5);
    // Tilted about x, so the far edge leaves the z = 0 plane.
    let top = grid.model_matrix().transform_point3(glam::Vec3::new(0.0, 1.0, 0.0));
    assert!(top.z.abs() > 1.0);
    assert!(!grid.set_grid_size(8.0));
}

#[test]
fn vertices_are_normalized_and_flat() {
    let mut grid = GridAnimator::new(12, 6.0, 9);
    for _ in 0..(60 * 8) {
        grid.update(1.0 / 60.0);
    }
    for v in grid.vertices() {
        assert!(v.position[0].abs() <= 1.0 + 1e-5);
        assert!(v.position[1].abs() <= 1.0 + 1e-5);
        assert_eq!(v.position[2], 0.0);
    }
}

#[test]
fn same_seed_same_ripple() {
    let mut a = GridAnimator::new(16, 4.0, 42);
    let mut b = GridAnimator::new(16, 4.0, 42);
    for _ in 0..400 {
        a.update(1.0 / 60.0);
        b.update(1.0 / 60.0);
    }
    assert_eq!(a.vertices(), b.vertices());
}
