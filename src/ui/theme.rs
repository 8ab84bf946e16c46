use crossterm::style::{Color, Stylize};

/// Design tokens for declpack console output.
///
/// Only the five semantic colors below are used.
pub mod colors {
    use super::Color;

    /// #22C55E
    pub const SUCCESS: Color = Color::Green;
    /// #EF4444
    pub const ERROR: Color = Color::Red;
    /// #F59E0B
    pub const WARNING: Color = Color::Yellow;
    /// #06B6D4
    pub const INFO: Color = Color::Cyan;
    /// #6B7280
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const PROGRESS: &str = "●";
    pub const ARROW: &str = "↳";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";
    pub const PROGRESS: &str = "[..]";
    pub const ARROW: &str = "[>]";
}

/// Which icon set a sink renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub progress: &'static str,
    pub arrow: &'static str,
}

impl Icons {
    pub fn new(unicode: bool) -> Self {
        if unicode {
            Self {
                success: icons::SUCCESS,
                error: icons::ERROR,
                warning: icons::WARNING,
                progress: icons::PROGRESS,
                arrow: icons::ARROW,
            }
        } else {
            Self {
                success: icons_ascii::SUCCESS,
                error: icons_ascii::ERROR,
                warning: icons_ascii::WARNING,
                progress: icons_ascii::PROGRESS,
                arrow: icons_ascii::ARROW,
            }
        }
    }
}

/// Render `text` in `color`, or plain when color is off
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_without_color_returns_plain_text() {
        assert_eq!(paint("ok", colors::SUCCESS, false), "ok");
    }

    #[test]
    fn paint_with_color_includes_ansi_escape() {
        assert!(paint("no", colors::ERROR, true).contains("\u{1b}["));
    }

    #[test]
    fn ascii_icons_fall_back() {
        assert_eq!(Icons::new(false).warning, "[WARN]");
        assert_eq!(Icons::new(true).success, "✓");
    }
}
