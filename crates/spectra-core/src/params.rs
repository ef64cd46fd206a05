//! Named tunables with ranges, defaults and change effects.
//!
//! [`PARAM_SPECS`] is the single description of every tunable: a control
//! surface iterates it to build one control per entry, persistence uses its
//! keys, and the visualizer reads each entry's [`ParamEffect`] to decide
//! whether a write needs a rebuild. Values live in [`GridParams`], indexed
//! by [`ParamKey`].

use crate::error::EngineError;
use crate::particles::ParticleShape;
use crate::spectrum::BandWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version written into persisted parameter documents.
pub const PARAMS_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Zoom,
    AnimationSpeed,
    MaxHeight,
    BassWeight,
    MidWeight,
    HighWeight,
    SmoothingTimeConstant,
    MinDecibels,
    MaxDecibels,
    WaveIntensity,
    ColorIntensity,
    AlphaBase,
    AlphaMultiplier,
    ResponseIntensity,
    GridDensity,
    CrossSize,
    CrossIntensity,
    CrossRotationSpeed,
    CrossWaveFrequency,
    GridWaveSpeed,
    GridWaveFrequency,
    ColorCycleSpeed,
    ColorSaturation,
    DepthEffect,
    ParticleCount,
    ParticleSize,
    ParticleSizeVariation,
    ParticleSpeed,
    ParticlePulseIntensity,
    ParticleAlpha,
    ParticleSpread,
    ParticleColorMix,
    ParticleMotionRadius,
}

pub const PARAM_COUNT: usize = 33;

impl ParamKey {
    pub fn spec(self) -> &'static ParamSpec {
        &PARAM_SPECS[self as usize]
    }

    /// Persisted/external key, e.g. `"bassWeight"`.
    pub fn as_str(self) -> &'static str {
        self.spec().key_str
    }

    pub fn from_key(key: &str) -> Option<Self> {
        PARAM_SPECS
            .iter()
            .find(|spec| spec.key_str == key)
            .map(|spec| spec.key)
    }
}

/// Control-panel section a tunable is shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamGroup {
    Main,
    GridCross,
    Particles,
}

/// What has to happen when a tunable changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamEffect {
    /// Read by the next frame, nothing else to do.
    Cosmetic,
    /// Forwarded to the orbit camera's zoom.
    Camera,
    /// Forwarded to the audio collaborator (smoothing, decibel range).
    Analyser,
    /// Line set must be rebuilt.
    RebuildGrid,
    /// Particle array must be regenerated.
    RegenerateParticles,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub key: ParamKey,
    pub key_str: &'static str,
    pub name: &'static str,
    pub group: ParamGroup,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
    pub effect: ParamEffect,
}

impl ParamSpec {
    /// Whether a change invalidates generated geometry.
    pub fn shape_affecting(&self) -> bool {
        matches!(
            self.effect,
            ParamEffect::RebuildGrid | ParamEffect::RegenerateParticles
        )
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

const fn spec(
    key: ParamKey,
    key_str: &'static str,
    name: &'static str,
    group: ParamGroup,
    range: (f32, f32, f32, f32),
    effect: ParamEffect,
) -> ParamSpec {
    let (min, max, step, default) = range;
    ParamSpec {
        key,
        key_str,
        name,
        group,
        min,
        max,
        step,
        default,
        effect,
    }
}

use ParamEffect::*;
use ParamGroup::*;

/// Every tunable, in [`ParamKey`] order. Ranges are (min, max, step, default).
#[rustfmt::skip]
pub static PARAM_SPECS: [ParamSpec; PARAM_COUNT] = [
    spec(ParamKey::Zoom, "zoom", "Camera zoom", Main, (0.5, 5.0, 0.1, 1.0), Camera),
    spec(ParamKey::AnimationSpeed, "animationSpeed", "Animation speed", Main, (0.1, 3.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::MaxHeight, "maxHeight", "Maximum height", Main, (1.0, 10.0, 0.5, 1.5), Cosmetic),
    spec(ParamKey::BassWeight, "bassWeight", "Bass weight", Main, (0.5, 2.0, 0.1, 1.4), Cosmetic),
    spec(ParamKey::MidWeight, "midWeight", "Mid weight", Main, (0.5, 2.0, 0.1, 1.2), Cosmetic),
    spec(ParamKey::HighWeight, "highWeight", "High weight", Main, (0.5, 2.0, 0.1, 1.1), Cosmetic),
    spec(ParamKey::SmoothingTimeConstant, "smoothingTimeConstant", "Temporal smoothing", Main, (0.1, 0.95, 0.05, 0.5), Analyser),
    spec(ParamKey::MinDecibels, "minDecibels", "Minimum decibels", Main, (-120.0, -60.0, 1.0, -100.0), Analyser),
    spec(ParamKey::MaxDecibels, "maxDecibels", "Maximum decibels", Main, (-50.0, 0.0, 1.0, -30.0), Analyser),
    spec(ParamKey::WaveIntensity, "waveIntensity", "Wave intensity", Main, (0.0, 0.5, 0.01, 0.15), Cosmetic),
    spec(ParamKey::ColorIntensity, "colorIntensity", "Color intensity", Main, (0.1, 1.0, 0.1, 0.5), Cosmetic),
    spec(ParamKey::AlphaBase, "alphaBase", "Base transparency", Main, (0.1, 0.9, 0.1, 0.4), Cosmetic),
    spec(ParamKey::AlphaMultiplier, "alphaMultiplier", "Alpha multiplier", Main, (1.0, 8.0, 0.5, 4.0), Cosmetic),
    spec(ParamKey::ResponseIntensity, "responseIntensity", "Response intensity", Main, (1.0, 8.0, 0.5, 4.5), Cosmetic),
    spec(ParamKey::GridDensity, "gridDensity", "Grid density", GridCross, (50.0, 400.0, 10.0, 200.0), RebuildGrid),
    spec(ParamKey::CrossSize, "crossSize", "Cross size", GridCross, (0.0, 0.5, 0.01, 0.1), Cosmetic),
    spec(ParamKey::CrossIntensity, "crossIntensity", "Cross intensity", GridCross, (0.0, 2.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::CrossRotationSpeed, "crossRotationSpeed", "Cross rotation speed", GridCross, (0.0, 2.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::CrossWaveFrequency, "crossWaveFrequency", "Cross wave frequency", GridCross, (0.1, 5.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::GridWaveSpeed, "gridWaveSpeed", "Grid wave speed", GridCross, (0.1, 5.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::GridWaveFrequency, "gridWaveFrequency", "Grid wave frequency", GridCross, (0.1, 5.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::ColorCycleSpeed, "colorCycleSpeed", "Color cycle speed", GridCross, (0.1, 3.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::ColorSaturation, "colorSaturation", "Color saturation", GridCross, (0.0, 2.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::DepthEffect, "depthEffect", "Depth effect", GridCross, (0.0, 2.0, 0.1, 1.0), Cosmetic),
    spec(ParamKey::ParticleCount, "particleCount", "Particle count", Particles, (1000.0, 20000.0, 1000.0, 5000.0), RegenerateParticles),
    spec(ParamKey::ParticleSize, "particleSize", "Particle size", Particles, (1.0, 20.0, 0.5, 7.0), RegenerateParticles),
    spec(ParamKey::ParticleSizeVariation, "particleSizeVariation", "Size variation", Particles, (0.0, 10.0, 0.5, 5.0), RegenerateParticles),
    spec(ParamKey::ParticleSpeed, "particleSpeed", "Particle speed", Particles, (0.1, 2.0, 0.1, 0.5), Cosmetic),
    spec(ParamKey::ParticlePulseIntensity, "particlePulseIntensity", "Pulse intensity", Particles, (0.0, 2.0, 0.1, 0.5), Cosmetic),
    spec(ParamKey::ParticleAlpha, "particleAlpha", "Particle transparency", Particles, (0.1, 1.0, 0.1, 0.7), Cosmetic),
    spec(ParamKey::ParticleSpread, "particleSpread", "Spread", Particles, (5.0, 20.0, 0.5, 10.0), RegenerateParticles),
    spec(ParamKey::ParticleColorMix, "particleColorMix", "Color mix", Particles, (0.0, 1.0, 0.1, 1.0), RegenerateParticles),
    spec(ParamKey::ParticleMotionRadius, "particleMotionRadius", "Motion radius", Particles, (0.1, 2.0, 0.1, 1.0), RegenerateParticles),
];

/// Result of a single write: what was asked, what was stored, what it triggers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamUpdate {
    pub key: ParamKey,
    pub requested: f32,
    pub value: f32,
    pub previous: f32,
    pub effect: ParamEffect,
}

impl ParamUpdate {
    pub fn clamped(&self) -> bool {
        self.value != self.requested
    }

    pub fn changed(&self) -> bool {
        self.value != self.previous
    }
}

/// Current value of every tunable; always within the declared ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct GridParams {
    values: [f32; PARAM_COUNT],
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|i| PARAM_SPECS[i].default),
        }
    }
}

/// On-disk form of the parameter record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParamsDocument {
    pub version: u32,
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl GridParams {
    pub fn get(&self, key: ParamKey) -> f32 {
        self.values[key as usize]
    }

    /// Clamp and store. Non-finite input is rejected and leaves the value alone.
    pub fn set(&mut self, key: ParamKey, value: f32) -> Result<ParamUpdate, EngineError> {
        let spec = key.spec();
        if !value.is_finite() {
            return Err(EngineError::NonFiniteValue {
                key: spec.key_str,
                value,
            });
        }
        let previous = self.values[key as usize];
        let stored = spec.clamp(value);
        if stored != value {
            log::debug!("{} clamped {value} -> {stored}", spec.key_str);
        }
        self.values[key as usize] = stored;
        Ok(ParamUpdate {
            key,
            requested: value,
            value: stored,
            previous,
            effect: spec.effect,
        })
    }

    pub fn set_by_name(&mut self, key: &str, value: f32) -> Result<ParamUpdate, EngineError> {
        let key = ParamKey::from_key(key).ok_or_else(|| EngineError::UnknownParam(key.into()))?;
        self.set(key, value)
    }

    /// Flat key → value record for persistence or a control panel.
    pub fn export(&self) -> BTreeMap<String, f32> {
        PARAM_SPECS
            .iter()
            .map(|spec| (spec.key_str.to_string(), self.get(spec.key)))
            .collect()
    }

    /// Merge a flat record over the defaults. Unknown keys are ignored,
    /// missing or non-finite entries keep their default.
    pub fn import<K, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f32)>,
    {
        let mut params = Self::default();
        for (key, value) in entries {
            let key = key.as_ref();
            match params.set_by_name(key, value) {
                Ok(_) => {}
                Err(EngineError::UnknownParam(_)) => {
                    log::debug!("ignoring unknown parameter {key}")
                }
                Err(e) => log::warn!("keeping default: {e}"),
            }
        }
        params
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        let doc = ParamsDocument {
            version: PARAMS_VERSION,
            params: self.export(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn try_from_json(text: &str) -> Result<Self, EngineError> {
        let doc: ParamsDocument = serde_json::from_str(text)?;
        if doc.version > PARAMS_VERSION {
            log::warn!(
                "parameter document version {} is newer than {PARAMS_VERSION}; \
                 unknown keys are ignored",
                doc.version
            );
        }
        Ok(Self::import(doc.params))
    }

    /// Like [`GridParams::try_from_json`], but a corrupt document yields full defaults.
    pub fn from_json_or_default(text: &str) -> Self {
        Self::try_from_json(text).unwrap_or_else(|e| {
            log::warn!("{e}; using default parameters");
            Self::default()
        })
    }

    pub fn zoom(&self) -> f32 {
        self.get(ParamKey::Zoom)
    }

    pub fn animation_speed(&self) -> f32 {
        self.get(ParamKey::AnimationSpeed)
    }

    pub fn response_intensity(&self) -> f32 {
        self.get(ParamKey::ResponseIntensity)
    }

    pub fn band_weights(&self) -> BandWeights {
        BandWeights {
            bass: self.get(ParamKey::BassWeight),
            mid: self.get(ParamKey::MidWeight),
            high: self.get(ParamKey::HighWeight),
        }
    }

    pub fn grid_lines(&self) -> usize {
        self.get(ParamKey::GridDensity).round() as usize
    }

    pub fn particle_shape(&self) -> ParticleShape {
        ParticleShape {
            count: self.get(ParamKey::ParticleCount).round() as usize,
            size: self.get(ParamKey::ParticleSize),
            size_variation: self.get(ParamKey::ParticleSizeVariation),
            spread: self.get(ParamKey::ParticleSpread),
            color_mix: self.get(ParamKey::ParticleColorMix),
            motion_radius: self.get(ParamKey::ParticleMotionRadius),
        }
    }

    pub fn analyser_settings(&self) -> AnalyserSettings {
        AnalyserSettings {
            smoothing: self.get(ParamKey::SmoothingTimeConstant),
            min_decibels: self.get(ParamKey::MinDecibels),
            max_decibels: self.get(ParamKey::MaxDecibels),
        }
    }
}

/// Settings forwarded to the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyserSettings {
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}
