//! Command-line argument parsing.

use anyhow::Context;
use clap::Parser;
use spectra_core::{GridParams, ParamGroup, PARAM_SPECS};
use std::path::{Path, PathBuf};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectra")]
#[command(about = "Audio-reactive 3D line grid and particle visualizer", long_about = None)]
pub struct Args {
    /// Play and visualize a WAV file instead of capturing the default input device
    #[arg(long, value_name = "WAV")]
    pub input: Option<PathBuf>,

    /// Parameter file; loaded at start (if present) and saved on exit or `S`
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Override a parameter, e.g. `--set maxHeight=4` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub overrides: Vec<(String, f32)>,

    /// Print every tunable parameter with its range and exit
    #[arg(long)]
    pub list_params: bool,

    /// Seed for grid jitter and particle generation
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

fn parse_assignment(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for `{key}`: {e}"))?;
    Ok((key.trim().to_string(), value))
}

impl Args {
    /// Parameters from the params file (if any) with `--set` overrides applied.
    pub fn initial_params(&self) -> anyhow::Result<GridParams> {
        let mut params = match &self.params {
            Some(path) if path.exists() => load_params(path)?,
            Some(path) => {
                log::info!("{} not found; starting from defaults", path.display());
                GridParams::default()
            }
            None => GridParams::default(),
        };
        for (key, value) in &self.overrides {
            let update = params
                .set_by_name(key, *value)
                .with_context(|| format!("--set {key}={value}"))?;
            if update.clamped() {
                log::warn!("{key} clamped to {}", update.value);
            }
        }
        Ok(params)
    }
}

pub fn load_params(path: &Path) -> anyhow::Result<GridParams> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    log::info!("loaded parameters from {}", path.display());
    Ok(GridParams::from_json_or_default(&text))
}

pub fn save_params(path: &Path, params: &GridParams) -> anyhow::Result<()> {
    let text = params.to_json()?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved parameters to {}", path.display());
    Ok(())
}

/// Parameter table as printed by `--list-params`.
pub fn param_listing() -> String {
    let mut out = String::new();
    let mut group = None;
    for spec in PARAM_SPECS.iter() {
        if group != Some(spec.group) {
            group = Some(spec.group);
            let title = match spec.group {
                ParamGroup::Main => "Main",
                ParamGroup::GridCross => "Grid & cross",
                ParamGroup::Particles => "Particles",
            };
            out.push_str(&format!("[{title}]\n"));
        }
        out.push_str(&format!(
            "  {:<24} {:>8} ({} ..= {}, step {})  {}\n",
            spec.key_str, spec.default, spec.min, spec.max, spec.step, spec.name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectra_core::ParamKey;

    #[test]
    fn parses_assignments() {
        assert_eq!(
            parse_assignment("maxHeight=4.5").unwrap(),
            ("maxHeight".to_string(), 4.5)
        );
        assert_eq!(
            parse_assignment(" zoom = 2 ").unwrap(),
            ("zoom".to_string(), 2.0)
        );
        assert!(parse_assignment("zoom").is_err());
        assert!(parse_assignment("zoom=fast").is_err());
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let args = Args::parse_from(["spectra", "--set", "maxHeight=3", "--set", "zoom=9"]);
        let params = args.initial_params().unwrap();
        assert_eq!(params.get(ParamKey::MaxHeight), 3.0);
        assert_eq!(params.get(ParamKey::Zoom), 5.0);
    }

    #[test]
    fn unknown_override_is_an_error() {
        let args = Args::parse_from(["spectra", "--set", "warp=1"]);
        assert!(args.initial_params().is_err());
    }

    #[test]
    fn listing_covers_every_param() {
        let listing = param_listing();
        for spec in PARAM_SPECS.iter() {
            assert!(listing.contains(spec.key_str));
        }
        assert!(listing.starts_with("[Main]"));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("spectra-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("params.json");
        let mut params = GridParams::default();
        params.set(ParamKey::CrossSize, 0.25).unwrap();
        save_params(&path, &params).unwrap();
        assert_eq!(load_params(&path).unwrap(), params);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
