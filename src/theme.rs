use serde::{Deserialize, Serialize};

/// Signal wire colors in round-robin order.
pub const SIGNAL_PALETTE: [&str; 10] = [
    "#0000ff", // blue
    "#ffa500", // orange
    "#008000", // green
    "#8b4513", // brown
    "#808080", // gray
    "#ffffff", // white
    "#ffff00", // yellow
    "#ee82ee", // violet
    "#ff007f", // rose
    "#00ffff", // aqua
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub power_color: String,
    pub ground_color: String,
    pub signal_palette: Vec<String>,
    pub pin_marker_color: String,
}

impl Theme {
    pub fn breadboard() -> Self {
        Self {
            power_color: "#ff0000".to_string(),
            ground_color: "#000000".to_string(),
            signal_palette: SIGNAL_PALETTE.iter().map(|c| c.to_string()).collect(),
            pin_marker_color: "#00ff00".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "breadboard" | "default" => Some(Self::breadboard()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::breadboard()
    }
}
