use spectra_core::*;

#[test]
fn table_is_in_key_order() {
    assert_eq!(PARAM_SPECS.len(), PARAM_COUNT);
    for (i, spec) in PARAM_SPECS.iter().enumerate() {
        assert_eq!(spec.key as usize, i, "{}", spec.key_str);
        assert_eq!(ParamKey::from_key(spec.key_str), Some(spec.key));
        assert_eq!(spec.key.as_str(), spec.key_str);
        assert!(spec.min <= spec.default && spec.default <= spec.max, "{}", spec.key_str);
        assert!(spec.step > 0.0);
    }
}

#[test]
fn defaults_match_reference_values() {
    let params = GridParams::default();
    assert_eq!(params.get(ParamKey::MaxHeight), 1.5);
    assert_eq!(params.get(ParamKey::ResponseIntensity), 4.5);
    assert_eq!(params.band_weights(), BandWeights::default());
    assert_eq!(params.grid_lines(), 200);
    assert_eq!(params.particle_shape(), ParticleShape::default());
    let analyser = params.analyser_settings();
    assert_eq!(analyser.smoothing, 0.5);
    assert_eq!(analyser.min_decibels, -100.0);
    assert_eq!(analyser.max_decibels, -30.0);
}

#[test]
fn writes_are_clamped_to_range() {
    let mut params = GridParams::default();
    let update = params.set(ParamKey::MaxHeight, 50.0).unwrap();
    assert!(update.clamped());
    assert_eq!(update.value, 10.0);
    assert_eq!(params.get(ParamKey::MaxHeight), 10.0);

    params.set(ParamKey::Zoom, -3.0).unwrap();
    assert_eq!(params.zoom(), 0.5);
}

#[test]
fn non_finite_writes_are_rejected() {
    let mut params = GridParams::default();
    let err = params.set(ParamKey::AlphaBase, f32::NAN).unwrap_err();
    assert!(matches!(err, EngineError::NonFiniteValue { key: "alphaBase", .. }));
    assert_eq!(params.get(ParamKey::AlphaBase), 0.4);
    assert!(params.set(ParamKey::AlphaBase, f32::INFINITY).is_err());
}

#[test]
fn unknown_names_are_errors_on_set() {
    let mut params = GridParams::default();
    let err = params.set_by_name("warpFactor", 9.0).unwrap_err();
    assert!(matches!(err, EngineError::UnknownParam(ref k) if k == "warpFactor"));
}

#[test]
fn only_geometry_params_are_shape_affecting() {
    let shape: Vec<&str> = PARAM_SPECS
        .iter()
        .filter(|s| s.shape_affecting())
        .map(|s| s.key_str)
        .collect();
    assert_eq!(
        shape,
        [
            "gridDensity",
            "particleCount",
            "particleSize",
            "particleSizeVariation",
            "particleSpread",
            "particleColorMix",
            "particleMotionRadius",
        ]
    );
    assert!(!ParamKey::ParticleSpeed.spec().shape_affecting());
    assert!(!ParamKey::ParticlePulseIntensity.spec().shape_affecting());
}

#[test]
fn export_import_is_idempotent() {
    let mut params = GridParams::default();
    params.set(ParamKey::CrossSize, 0.33).unwrap();
    params.set(ParamKey::ParticleCount, 12000.0).unwrap();
    let exported = params.export();
    assert_eq!(exported.len(), PARAM_COUNT);
    let imported = GridParams::import(exported.clone());
    assert_eq!(imported, params);
    assert_eq!(imported.export(), exported);
}

#[test]
fn import_ignores_unknown_and_keeps_defaults() {
    let params = GridParams::import([("bogus", 1.0), ("colorIntensity", 0.9)]);
    assert_eq!(params.get(ParamKey::ColorIntensity), 0.9);
    assert_eq!(params.get(ParamKey::AlphaBase), 0.4);

    let params = GridParams::import([("depthEffect", f32::NAN)]);
    assert_eq!(params.get(ParamKey::DepthEffect), 1.0);
}

#[test]
fn json_document_round_trip() {
    let mut params = GridParams::default();
    params.set(ParamKey::GridDensity, 120.0).unwrap();
    let text = params.to_json().unwrap();
    assert!(text.contains("\"version\": 1"));
    assert!(text.contains("\"gridDensity\": 120.0"));
    assert_eq!(GridParams::try_from_json(&text).unwrap(), params);
}

#[test]
fn corrupt_documents_fall_back_to_defaults() {
    assert!(GridParams::try_from_json("{not json").is_err());
    assert_eq!(GridParams::from_json_or_default("{not json"), GridParams::default());
    assert_eq!(GridParams::from_json_or_default("[1, 2, 3]"), GridParams::default());
    // Missing params map is fine.
    assert_eq!(
        GridParams::from_json_or_default(r#"{"version": 1}"#),
        GridParams::default()
    );
    let partial =
        GridParams::from_json_or_default(r#"{"version": 1, "params": {"maxHeight": 99}}"#);
    assert_eq!(partial.get(ParamKey::MaxHeight), 10.0);
}
