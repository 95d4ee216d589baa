use ratatui::style::Color;
use ratatui::widgets::BorderType;

use crate::config::ColorsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    Auto,
    Truecolor,
    Color256,
    Mono,
}

impl ColorSupport {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "truecolor" | "24bit" => ColorSupport::Truecolor,
            "256" | "256color" => ColorSupport::Color256,
            "mono" | "monochrome" => ColorSupport::Mono,
            _ => ColorSupport::Auto,
        }
    }
}

pub fn detect_color_support() -> ColorSupport {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorSupport::Truecolor;
    }
    ColorSupport::Color256
}

pub fn resolve_color_support(config: &str) -> ColorSupport {
    let parsed = ColorSupport::from_config_str(config);
    if parsed == ColorSupport::Auto {
        detect_color_support()
    } else {
        parsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Rounded,
    Thin,
}

impl BorderStyle {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "thin" | "plain" => BorderStyle::Thin,
            _ => BorderStyle::Rounded,
        }
    }

    pub fn border_type(self) -> BorderType {
        match self {
            BorderStyle::Rounded => BorderType::Rounded,
            BorderStyle::Thin => BorderType::Plain,
        }
    }
}

/// Optional hex anchors for the gauge heat scale.
#[derive(Debug, Clone)]
pub struct HeatOverrides {
    pub low: String,
    pub mid: String,
    pub high: String,
}

impl HeatOverrides {
    pub fn from_config(colors: &ColorsConfig) -> Self {
        Self {
            low: colors.gauge_low.clone(),
            mid: colors.gauge_mid.clone(),
            high: colors.gauge_high.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub title_fg: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub unavailable: Color,
    pub gauge_unfilled: Color,
    /// Filled gauge color for low, mid and high load.
    pub heat_colors: [Color; 3],
    pub statusbar_bg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
}

impl Theme {
    pub fn from_config(theme_name: &str, heat: &HeatOverrides, support: ColorSupport) -> Self {
        let mut theme = match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" => Self::mono(),
            _ => Self::dark(),
        };

        if support == ColorSupport::Mono {
            theme = Self::mono();
        } else {
            theme.apply_heat_overrides(heat);
        }
        theme.apply_color_support(support);
        theme
    }

    pub fn next(&self, heat: &HeatOverrides, support: ColorSupport) -> Self {
        if support == ColorSupport::Mono {
            return Self::mono();
        }
        let next_name = match self.name {
            "dark" => "light",
            "light" => "mono",
            _ => "dark",
        };
        Theme::from_config(next_name, heat, support)
    }

    /// Gauge fill color for a fraction in `[0, 1]`.
    pub fn heat_color(&self, fraction: f64) -> Color {
        if fraction >= 0.8 {
            self.heat_colors[2]
        } else if fraction >= 0.5 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }

    fn apply_heat_overrides(&mut self, heat: &HeatOverrides) {
        let low = parse_hex_color(&heat.low);
        let mid = parse_hex_color(&heat.mid);
        let high = parse_hex_color(&heat.high);

        if let (Some(low), Some(mid), Some(high)) = (low, mid, high) {
            self.heat_colors = [low, mid, high];
        }
    }

    fn apply_color_support(&mut self, support: ColorSupport) {
        let map = |c: Color| adapt_color(c, support);

        self.title_fg = map(self.title_fg);
        self.border = map(self.border);
        self.text_primary = map(self.text_primary);
        self.text_secondary = map(self.text_secondary);
        self.unavailable = map(self.unavailable);
        self.gauge_unfilled = map(self.gauge_unfilled);
        self.statusbar_bg = map(self.statusbar_bg);
        self.pill_key_bg = map(self.pill_key_bg);
        self.pill_key_fg = map(self.pill_key_fg);
        self.pill_desc_fg = map(self.pill_desc_fg);
        self.heat_colors = self.heat_colors.map(map);
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            title_fg: Color::White,
            border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            unavailable: Color::Rgb(248, 113, 113),
            gauge_unfilled: Color::Rgb(35, 40, 51),
            heat_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
            statusbar_bg: Color::Reset,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::Gray,
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            title_fg: Color::Black,
            border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            unavailable: Color::Red,
            gauge_unfilled: Color::Rgb(220, 220, 220),
            heat_colors: [
                Color::Rgb(60, 160, 60),
                Color::Rgb(220, 180, 50),
                Color::Rgb(200, 60, 60),
            ],
            statusbar_bg: Color::Rgb(235, 235, 235),
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            title_fg: Color::White,
            border: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            unavailable: Color::White,
            gauge_unfilled: Color::Black,
            heat_colors: [Color::Gray, Color::White, Color::White],
            statusbar_bg: Color::Reset,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn adapt_color(color: Color, support: ColorSupport) -> Color {
    match support {
        ColorSupport::Truecolor | ColorSupport::Auto => color,
        ColorSupport::Color256 => match color {
            Color::Rgb(r, g, b) => Color::Indexed(rgb_to_ansi256(r, g, b)),
            _ => color,
        },
        ColorSupport::Mono => match color {
            Color::Rgb(r, g, b) => {
                let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
                if luminance > 128.0 {
                    Color::White
                } else {
                    Color::Black
                }
            }
            Color::White | Color::Black | Color::Gray | Color::DarkGray | Color::Reset => color,
            _ => Color::White,
        },
    }
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    let r = (r as f32 / 255.0 * 5.0).round() as u8;
    let g = (g as f32 / 255.0 * 5.0).round() as u8;
    let b = (b as f32 / 255.0 * 5.0).round() as u8;
    16 + 36 * r + 6 * g + b
}
