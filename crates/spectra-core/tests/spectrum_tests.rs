use spectra_core::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn all_zero_buffer_gives_all_zero_field() {
    let mut mapper = SpectrumMapper::new();
    let field = mapper.map(&[0u8; 128], BandWeights::default(), 4.5);
    assert_eq!(field.side(), 12);
    assert_eq!(field.values().len(), 144);
    assert!(field.values().iter().all(|&v| v == 0.0));
}

#[test]
fn spike_spreads_over_its_neighbourhood() {
    let mut buffer = [0u8; 32];
    buffer[10] = 255;
    let mut out = Vec::new();
    neighbourhood_average(&buffer, &mut out);
    for i in 8..=12 {
        assert!(approx(out[i], 51.0, 1e-4), "bin {i}: {}", out[i]);
    }
    assert_eq!(out[7], 0.0);
    assert_eq!(out[13], 0.0);
}

#[test]
fn neighbourhood_is_clamped_at_edges() {
    let mut buffer = [0u8; 16];
    buffer[0] = 90;
    let mut out = Vec::new();
    neighbourhood_average(&buffer, &mut out);
    // bin 0 sees bins 0..=2, bin 1 sees 0..=3, bin 2 sees 0..=4
    assert!(approx(out[0], 30.0, 1e-4));
    assert!(approx(out[1], 22.5, 1e-4));
    assert!(approx(out[2], 18.0, 1e-4));
    assert_eq!(out[3], 0.0);

    let flat = [128u8; 16];
    neighbourhood_average(&flat, &mut out);
    assert!(out.iter().all(|&v| approx(v, 128.0, 1e-4)));
}

#[test]
fn polar_remap_covers_valid_indices() {
    for n in [1usize, 2, 7, 16, 100, 128, 512, 1024] {
        let table = polar_remap_table(n);
        let side = field_side(n);
        assert_eq!(table.len(), side * side);
        assert!(side * side >= n);
        assert!(table.iter().all(|&i| i < n), "n={n}");
    }
    assert!(polar_remap_table(0).is_empty());
}

#[test]
fn polar_remap_matches_formula() {
    let n = 16;
    let table = polar_remap_table(n);
    // side 4, center 2: cell (0, 0) -> dx = dy = -2
    let angle = (-2.0f32).atan2(-2.0);
    let radius = 8.0f32.sqrt();
    let expected = ((((angle + std::f32::consts::PI) / std::f32::consts::TAU) * 16.0 + radius)
        .floor() as usize)
        % 16;
    assert_eq!(table[0], expected);
    // center cell: angle 0, radius 0 -> half way round
    assert_eq!(table[2 * 4 + 2], 8);
}

#[test]
fn band_weight_accents_extremes() {
    let w = BandWeights {
        bass: 1.4,
        mid: 1.2,
        high: 1.1,
    };
    // 21 bins: bin i sits at i / 20
    assert!(approx(band_weight(1, 21, w), 1.4 * 1.3, 1e-6)); // 5 %
    assert!(approx(band_weight(10, 21, w), 1.2, 1e-6)); // 50 %
    assert!(approx(band_weight(4, 21, w), 1.4, 1e-6)); // 20 %
    assert!(approx(band_weight(16, 21, w), 1.1, 1e-6)); // 80 %
    assert!(approx(band_weight(20, 21, w), 1.1 * 1.2, 1e-6)); // 100 %
    assert_eq!(band_of(10, 21), Band::Mid);
}

#[test]
fn response_curve_has_two_regimes() {
    assert!(approx(response_curve(0.05, 4.5), 0.225, 1e-6));
    assert!(approx(response_curve(0.0, 8.0), 0.0, 1e-6));
    assert!(approx(response_curve(0.1, 4.5), 0.1f32.powf(0.25), 1e-6));
    assert!(approx(response_curve(1.0, 4.5), 1.0, 1e-6));
}

#[test]
fn end_to_end_sixteen_bins_at_128() {
    let mut mapper = SpectrumMapper::new();
    let weights = BandWeights {
        bass: 1.4,
        mid: 1.2,
        high: 1.1,
    };
    mapper.map(&[128u8; 16], weights, 4.5);
    let response = (128.0f32 / 255.0).powf(0.25);
    assert!(approx(response, 0.841, 1e-3));

    let expected_weights: [f32; 16] = [
        1.82, 1.82, 1.4, 1.4, 1.4, 1.2, 1.2, 1.2, 1.2, 1.2, 1.2, 1.1, 1.1, 1.1, 1.32, 1.32,
    ];
    let weighted = mapper.weighted();
    assert_eq!(weighted.len(), 16);
    for (i, (&got, &w)) in weighted.iter().zip(expected_weights.iter()).enumerate() {
        let expected = (response * 255.0 * w).min(255.0);
        assert!(approx(got, expected, 1e-3), "bin {i}: got {got}, expected {expected}");
    }
    // Only the plain high bins stay below the byte ceiling.
    assert!(weighted[11] < 255.0);
    assert_eq!(weighted[0], 255.0);
    assert_eq!(weighted[14], 255.0);

    let field = mapper.field();
    assert_eq!(field.side(), 4);
    for (cell, &src) in mapper.remap().iter().enumerate() {
        assert!(approx(field.values()[cell], weighted[src] / 255.0, 1e-6));
    }
}

#[test]
fn field_values_stay_in_unit_range() {
    let mut mapper = SpectrumMapper::new();
    let buffer: Vec<u8> = (0..128).map(|i| ((i * 37) % 256) as u8).collect();
    let weights = BandWeights {
        bass: 2.0,
        mid: 2.0,
        high: 2.0,
    };
    let field = mapper.map(&buffer, weights, 8.0);
    assert!(field.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    let mut texels = Vec::new();
    field.write_texels(&mut texels);
    assert_eq!(texels.len(), field.side() * field.side());
}

#[test]
fn mapper_follows_buffer_length_changes() {
    let mut mapper = SpectrumMapper::new();
    assert_eq!(mapper.map(&[10u8; 16], BandWeights::default(), 4.5).side(), 4);
    assert_eq!(mapper.map(&[10u8; 128], BandWeights::default(), 4.5).side(), 12);
    assert_eq!(mapper.map(&[], BandWeights::default(), 4.5).side(), 0);
}

#[test]
fn bass_intensity_uses_lowest_decile() {
    let mut buffer = [0u8; 128];
    for v in buffer.iter_mut().take(12) {
        *v = 255;
    }
    assert!(approx(bass_intensity(&buffer), 1.0, 1e-6));
    buffer[12] = 255; // outside the decile
    assert!(approx(bass_intensity(&buffer), 1.0, 1e-6));
    assert_eq!(bass_intensity(&[0u8; 128]), 0.0);
    assert_eq!(bass_intensity(&[]), 0.0);
    // short buffers still use at least one bin
    assert!(approx(bass_intensity(&[51u8, 0, 0]), 0.2, 1e-6));
}
