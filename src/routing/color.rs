use crate::theme::Theme;

pub const POWER_ROLE: &str = "5V";
pub const GROUND_ROLE: &str = "GND";

/// Role-based wire coloring with a round-robin signal palette.
///
/// The cursor belongs to the session that owns this value, so two sessions
/// never share a sequence.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    power: String,
    ground: String,
    palette: Vec<String>,
    cursor: usize,
}

impl ColorCycle {
    pub fn new(theme: &Theme) -> Self {
        let palette = if theme.signal_palette.is_empty() {
            Theme::breadboard().signal_palette
        } else {
            theme.signal_palette.clone()
        };
        Self {
            power: theme.power_color.clone(),
            ground: theme.ground_color.clone(),
            palette,
            cursor: 0,
        }
    }

    pub fn color_for(&mut self, role: &str) -> &str {
        match role {
            POWER_ROLE => &self.power,
            GROUND_ROLE => &self.ground,
            _ => {
                let idx = self.cursor % self.palette.len();
                self.cursor = (self.cursor + 1) % self.palette.len();
                &self.palette[idx]
            }
        }
    }

    /// Signal colors handed out so far, modulo the palette length.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

pub(super) fn is_supply_role(role: &str) -> bool {
    role == POWER_ROLE || role == GROUND_ROLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_roles_are_fixed() {
        let mut colors = ColorCycle::new(&Theme::breadboard());
        assert_eq!(colors.color_for("5V"), "#ff0000");
        assert_eq!(colors.color_for("GND"), "#000000");
        colors.color_for("D2");
        assert_eq!(colors.color_for("5V"), "#ff0000");
        assert_eq!(colors.color_for("GND"), "#000000");
    }

    #[test]
    fn signal_roles_cycle_without_immediate_repeat() {
        let mut colors = ColorCycle::new(&Theme::breadboard());
        let first = colors.color_for("D13").to_string();
        let second = colors.color_for("D13").to_string();
        assert_ne!(first, second);
        assert_eq!(first, "#0000ff");
        assert_eq!(second, "#ffa500");
    }

    #[test]
    fn supply_roles_do_not_advance_the_cursor() {
        let mut colors = ColorCycle::new(&Theme::breadboard());
        colors.color_for("A0");
        colors.color_for("5V");
        colors.color_for("GND");
        assert_eq!(colors.cursor(), 1);
    }

    #[test]
    fn palette_wraps_after_full_cycle() {
        let mut colors = ColorCycle::new(&Theme::breadboard());
        let cycle: Vec<String> = (0..10).map(|i| colors.color_for(&format!("S{i}")).to_string()).collect();
        let mut unique = cycle.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 10);
        assert_eq!(colors.color_for("S10"), cycle[0]);
    }

    #[test]
    fn separate_sessions_start_fresh() {
        let mut a = ColorCycle::new(&Theme::breadboard());
        a.color_for("X");
        let mut b = ColorCycle::new(&Theme::breadboard());
        assert_eq!(b.color_for("X"), "#0000ff");
    }
}
