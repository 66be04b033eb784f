//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We try to find a nub.toml (working directory first, then
//! `$XDG_CONFIG_HOME/nub/`), and if present we load settings from there.
//! Every tuning constant of the scorer, allocator and selector lives here so
//! none of them is baked into an inner loop. CLI flags override these values.

use facet::Facet;
use std::fs;
use std::path::PathBuf;

#[derive(Facet, Clone)]
/// Tuning knobs loaded from nub.toml or falling back to defaults.
pub struct Config {
    /// Softmax temperature: lower concentrates budget on top scorers.
    #[facet(default = 0.5)]
    pub temperature: f64,
    /// Allocations under this many chars fold the child instead of rendering it.
    #[facet(default = 8)]
    pub min_line_chars: usize,
    /// Exponent of the positional U-curve over sibling position.
    #[facet(default = 2.0)]
    pub positional_alpha: f64,
    /// Exponent of the U-curve used when sampling lines inside a leaf block.
    #[facet(default = 2.0)]
    pub ucurve_beta: f64,
    /// Strength of the grep boost `1 + k * ln(1 + matches)`.
    #[facet(default = 2.0)]
    pub grep_k: f64,
    /// Intrinsic weight of container nodes (classes, directories).
    #[facet(default = 3.0)]
    pub container_weight: f64,
    /// Intrinsic weight of a level-1 heading; deeper headings divide by level.
    #[facet(default = 2.5)]
    pub section_weight: f64,
    /// Intrinsic weight of functions and methods.
    #[facet(default = 2.0)]
    pub definition_weight: f64,
    /// Intrinsic weight of collapsed import runs.
    #[facet(default = 0.3)]
    pub import_weight: f64,
    /// Intrinsic weight of plain text blocks.
    #[facet(default = 1.0)]
    pub text_weight: f64,
    /// Remove lines whose token 3-grams have all been seen already.
    #[facet(default = false)]
    pub deduplicate: bool,
    /// Files larger than this are read as head + tail around a truncation marker.
    #[facet(default = 1_048_576)]
    pub max_file_size: u64,
    /// Bytes kept from the start of an oversized file.
    #[facet(default = 524_288)]
    pub head_bytes: u64,
    /// Bytes kept from the end of an oversized file.
    #[facet(default = 524_288)]
    pub tail_bytes: u64,
}

impl Config {
    #[must_use]
    /// Load configuration from nub.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                    return config;
                }
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("nub.toml")];
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("nub").join("nub.toml"));
        } else if let Ok(home) = std::env::var("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("nub")
                    .join("nub.toml"),
            );
        }
        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        facet_toml::from_str::<Self>("").unwrap()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
