//! Run configuration.
//!
//! A run file is a TOML document describing everything a historical run needs besides the
//! modeling library's own configuration:
//! where that configuration lives, which temperature units to request,
//! how to bind to the engine, which results to extract and how to plot them.
//!
//! ```toml
//! config_path = "shasta_standalone.yaml"
//! profile_temp_units = "degF"
//!
//! [plots.releases]
//! select_years = [2014, 2015]
//! obs_label = "Obs Tailwater"
//! other_temp = "temperature_other"
//! other_label = "TCD Wt Avg"
//! ```
//!
//! Every table except `config_path` is optional and falls back to the values used for
//! the standalone Shasta example.

use crate::errors::{RunError, RunResult};
use crate::units::TemperatureUnits;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the simulated releases table in the results mapping.
pub const RELEASES_KEY: &str = "ReleaseDF";
/// Key of the temperature profiles table in the results mapping.
pub const PROFILES_KEY: &str = "ProfilesDF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the modeling library's configuration file.
    pub config_path: PathBuf,
    #[serde(default)]
    pub profile_temp_units: TemperatureUnits,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub results: ResultKeys,
    #[serde(default)]
    pub plots: PlotConfig,
}

/// Where the simulation engine lives and how it is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub module: String,
    pub class: String,
    pub constructor: String,
    /// Attribute holding the results mapping once the model is finalized.
    pub results_attribute: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            module: "r3tam.restemp".to_string(),
            class: "Res".to_string(),
            constructor: "initialize_model".to_string(),
            results_attribute: "Simulation_Results".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultKeys {
    pub releases: String,
    pub profiles: String,
}

impl Default for ResultKeys {
    fn default() -> Self {
        Self {
            releases: RELEASES_KEY.to_string(),
            profiles: PROFILES_KEY.to_string(),
        }
    }
}

/// Whether a plot is written to disk or shown interactively.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSave {
    #[default]
    Save,
    View,
}

impl ViewSave {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewSave::Save => "save",
            ViewSave::View => "view",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub enabled: bool,
    pub module: String,
    pub releases_function: String,
    pub profiles_function: String,
    pub releases: ReleasePlotOptions,
    pub profiles: ProfilePlotOptions,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            module: "r3tam.make_plots".to_string(),
            releases_function: "plotReleasesCompare".to_string(),
            profiles_function: "plotProfilesCompare2".to_string(),
            releases: ReleasePlotOptions::default(),
            profiles: ProfilePlotOptions::default(),
        }
    }
}

/// Display options for the simulated vs observed releases plot.
///
/// Labels that are unset or empty are left out of the plotting call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasePlotOptions {
    /// Years to plot. Empty plots every year.
    pub select_years: Vec<i32>,
    pub view_save: ViewSave,
    pub obs_label: Option<String>,
    /// Name of an additional temperature series to overlay.
    pub other_temp: Option<String>,
    pub other_label: Option<String>,
    /// Align years on water years (October to September) instead of calendar years.
    pub on_wy: bool,
}

impl Default for ReleasePlotOptions {
    fn default() -> Self {
        Self {
            select_years: vec![2014, 2015],
            view_save: ViewSave::Save,
            obs_label: Some("Obs Tailwater".to_string()),
            other_temp: Some("temperature_other".to_string()),
            other_label: Some("TCD Wt Avg".to_string()),
            on_wy: false,
        }
    }
}

/// Display options for the temperature profiles plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePlotOptions {
    pub select_years: Vec<i32>,
    pub view_save: ViewSave,
    pub on_wy: bool,
}

impl RunConfig {
    /// Create a configuration for the given model configuration with default settings.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            profile_temp_units: TemperatureUnits::default(),
            engine: EngineConfig::default(),
            results: ResultKeys::default(),
            plots: PlotConfig::default(),
        }
    }

    /// Parse and validate a run configuration.
    ///
    /// `config_path` is kept exactly as written.
    pub fn from_toml_str(content: &str) -> RunResult<Self> {
        let config: RunConfig =
            toml::from_str(content).map_err(|e| RunError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a run file from disk.
    ///
    /// A relative `config_path` is resolved against the directory containing the run file.
    pub fn from_file(path: &Path) -> RunResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| RunError::io(path.display(), e))?;
        let mut config = Self::from_toml_str(&content)?;
        if config.config_path.is_relative() {
            if let Some(parent) = path.parent() {
                config.config_path = parent.join(&config.config_path);
            }
        }
        log::debug!(
            "Loaded run file {} (model configuration {})",
            path.display(),
            config.config_path.display()
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> RunResult<String> {
        toml::to_string(self).map_err(|e| RunError::Error(e.to_string()))
    }

    /// Check the configuration for values that could never produce a run.
    pub fn validate(&self) -> RunResult<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(RunError::InvalidConfig(
                "config_path must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("engine.module", &self.engine.module),
            ("engine.class", &self.engine.class),
            ("engine.constructor", &self.engine.constructor),
            ("engine.results_attribute", &self.engine.results_attribute),
            ("results.releases", &self.results.releases),
            ("results.profiles", &self.results.profiles),
        ] {
            if value.trim().is_empty() {
                return Err(RunError::InvalidConfig(format!("{} must not be empty", name)));
            }
        }
        if self.results.releases == self.results.profiles {
            return Err(RunError::InvalidConfig(format!(
                "results.releases and results.profiles must differ (both are '{}')",
                self.results.releases
            )));
        }
        check_years("plots.releases.select_years", &self.plots.releases.select_years)?;
        check_years("plots.profiles.select_years", &self.plots.profiles.select_years)?;
        Ok(())
    }
}

fn check_years(name: &str, years: &[i32]) -> RunResult<()> {
    let mut seen = HashSet::new();
    for year in years {
        if !seen.insert(year) {
            return Err(RunError::InvalidConfig(format!(
                "{} contains {} more than once",
                name, year
            )));
        }
    }
    Ok(())
}
