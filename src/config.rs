use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Length of one lead-out step off a pin.
    pub exit_lead: f32,
    /// Upper bound on lead-out steps taken to clear the owning component.
    pub max_lead_steps: usize,
    /// Perpendicular shift applied to an overlapping segment.
    pub overlap_shift: f32,
    /// Overlap resolution passes.
    pub passes: usize,
    /// Emit a zero-length marker wire for every mapped pin.
    pub pin_markers: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            exit_lead: 10.0,
            max_lead_steps: 32,
            overlap_shift: 6.0,
            passes: 2,
            pin_markers: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub routing: RoutingConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    power_color: Option<String>,
    ground_color: Option<String>,
    signal_palette: Option<Vec<String>>,
    pin_marker_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RoutingConfigFile {
    exit_lead: Option<f32>,
    max_lead_steps: Option<usize>,
    overlap_shift: Option<f32>,
    passes: Option<usize>,
    pin_markers: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    routing: Option<RoutingConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => log::warn!("unknown theme {theme_name:?}, keeping default palette"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.power_color {
            config.theme.power_color = v;
        }
        if let Some(v) = vars.ground_color {
            config.theme.ground_color = v;
        }
        if let Some(v) = vars.signal_palette
            && !v.is_empty()
        {
            config.theme.signal_palette = v;
        }
        if let Some(v) = vars.pin_marker_color {
            config.theme.pin_marker_color = v;
        }
    }

    if let Some(routing) = parsed.routing {
        if let Some(v) = routing.exit_lead
            && v > 0.0
        {
            config.routing.exit_lead = v;
        }
        if let Some(v) = routing.max_lead_steps {
            config.routing.max_lead_steps = v.max(1);
        }
        if let Some(v) = routing.overlap_shift
            && v > 0.0
        {
            config.routing.overlap_shift = v;
        }
        if let Some(v) = routing.passes {
            config.routing.passes = v;
        }
        if let Some(v) = routing.pin_markers {
            config.routing.pin_markers = v;
        }
    }

    Ok(config)
}
