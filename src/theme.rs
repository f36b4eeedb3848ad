//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colour names for piece indices 1..=7. Index 0 (empty) has no colour.
pub const COLOR_NAMES: [&str; 7] = ["yellow", "cyan", "red", "green", "orange", "blue", "purple"];

/// Piece colours plus board and UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours for cell values 1..=7, in `COLOR_NAMES` order.
    pub pieces: [Color; 7],
    /// Board background.
    pub bg: Color,
    /// Board / sidebar border.
    pub border: Color,
    /// Text.
    pub main_fg: Color,
    /// Titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: [
                Color::Rgb(255, 255, 0),   // yellow
                Color::Rgb(0, 255, 255),   // cyan
                Color::Rgb(255, 0, 0),     // red
                Color::Rgb(0, 128, 0),     // green
                Color::Rgb(255, 165, 0),   // orange
                Color::Rgb(0, 0, 255),     // blue
                Color::Rgb(128, 0, 128),   // purple
            ],
            bg: Color::Rgb(0, 0, 0),
            border: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
        }
    }
}

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to defaults if path is None or the file is missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Self::from_map(&parse_theme_file(&s))
    }

    /// Keys that are present must parse; absent keys keep their default.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::default();
        let get = |key: &str| map.get(key).map(|v| parse_hex(v)).transpose();
        for (slot, name) in theme.pieces.iter_mut().zip(COLOR_NAMES) {
            if let Some(c) = get(name)? {
                *slot = c;
            }
        }
        if let Some(c) = get("background")? {
            theme.bg = c;
        }
        if let Some(c) = get("border")? {
            theme.border = c;
        }
        if let Some(c) = get("main_fg")? {
            theme.main_fg = c;
        }
        if let Some(c) = get("title")? {
            theme.title = c;
        }
        Ok(theme)
    }

    /// Colour for a cell value; `None` for empty (0) or out-of-range values.
    #[inline]
    pub fn cell_color(&self, cell: u8) -> Option<Color> {
        match cell {
            0 => None,
            n => self.pieces.get(usize::from(n) - 1).copied(),
        }
    }
}

/// Name of the colour for a cell value (1 = yellow ... 7 = purple).
pub fn color_name(cell: u8) -> Option<&'static str> {
    match cell {
        0 => None,
        n => COLOR_NAMES.get(usize::from(n) - 1).copied(),
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GG0000"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[background]="#101010""##);
        assert_eq!(map.get("background"), Some(&"#101010".to_string()));
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_name(0), None);
        assert_eq!(color_name(1), Some("yellow"));
        assert_eq!(color_name(5), Some("orange"));
        assert_eq!(color_name(7), Some("purple"));
        assert_eq!(color_name(8), None);
    }

    #[test]
    fn test_cell_color_skips_empty() {
        let theme = Theme::default();
        assert_eq!(theme.cell_color(0), None);
        assert_eq!(theme.cell_color(2), Some(Color::Rgb(0, 255, 255)));
    }

    #[test]
    fn test_theme_overrides() {
        let src = "# comment\ntheme[red]=\"#AA0000\"\ntheme[background]='#111'\n";
        let theme = Theme::from_map(&parse_theme_file(src)).unwrap();
        assert_eq!(theme.cell_color(3), Some(Color::Rgb(0xAA, 0, 0)));
        assert_eq!(theme.bg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(theme.cell_color(1), Theme::default().cell_color(1));
    }

    #[test]
    fn test_theme_rejects_bad_value() {
        let map = parse_theme_file("theme[blue]=\"nope\"");
        assert!(Theme::from_map(&map).is_err());
    }

    #[test]
    fn test_missing_file_uses_default() {
        let theme = Theme::load(Some(Path::new("/nonexistent/blocktui.theme"))).unwrap();
        assert_eq!(theme.bg, Theme::default().bg);
    }
}
