//! Color specification parsing.
//!
//! A spec is the part between `%color:` and `%` in a markup tag. Several
//! specs may be packed into one tag separated by `:`. Supported forms:
//!
//! - `reset()` to clear all styling
//! - Named colors with optional attribute prefixes: `red`, `bold_white`,
//!   `italic_bright_green`, `underline_strikethrough_cyan` (prefixes combine
//!   in any order; `purple` is accepted as an alias for `magenta`)
//! - `rgb(r,g,b)` with each channel 0–255
//! - `hex(RRGGBB)`, `hex(RGB)`, or `hex(R)` (short forms expand per digit)

use console::{Color, Style};

/// One of the eight base terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl BaseColor {
    fn from_name(name: &str) -> Result<Self, String> {
        let color = match name {
            "black" => BaseColor::Black,
            "red" => BaseColor::Red,
            "green" => BaseColor::Green,
            "yellow" => BaseColor::Yellow,
            "blue" => BaseColor::Blue,
            "magenta" | "purple" => BaseColor::Magenta,
            "cyan" => BaseColor::Cyan,
            "white" => BaseColor::White,
            _ => return Err(format!("unknown color name: {}", name)),
        };
        Ok(color)
    }

    fn console_color(self) -> Color {
        match self {
            BaseColor::Black => Color::Black,
            BaseColor::Red => Color::Red,
            BaseColor::Green => Color::Green,
            BaseColor::Yellow => Color::Yellow,
            BaseColor::Blue => Color::Blue,
            BaseColor::Magenta => Color::Magenta,
            BaseColor::Cyan => Color::Cyan,
            BaseColor::White => Color::White,
        }
    }

    /// Index 0–7 in the ANSI palette; bright variants live at index + 8.
    fn ansi_index(self) -> u8 {
        match self {
            BaseColor::Black => 0,
            BaseColor::Red => 1,
            BaseColor::Green => 2,
            BaseColor::Yellow => 3,
            BaseColor::Blue => 4,
            BaseColor::Magenta => 5,
            BaseColor::Cyan => 6,
            BaseColor::White => 7,
        }
    }
}

/// Text attributes that may prefix a named color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

/// The parsed form of a color spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// `reset()`, which clears any active styling.
    Reset,
    /// A named base color with optional attributes and brightness.
    Named {
        attrs: Attributes,
        bright: bool,
        color: BaseColor,
    },
    /// A direct RGB value (from `rgb(...)` or `hex(...)`).
    Rgb(u8, u8, u8),
}

/// A single color spec, keeping the raw source text alongside its parse.
///
/// The raw text is preserved so debug output can echo specs verbatim
/// (including hex digit case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpec {
    raw: String,
    kind: SpecKind,
}

impl ColorSpec {
    /// Parses one spec. The input must be exactly one spec, already split
    /// out of its tag.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("empty color spec".to_string());
        }

        let kind = if trimmed == "reset()" {
            SpecKind::Reset
        } else if let Some(args) = function_args(trimmed, "rgb") {
            parse_rgb(args)?
        } else if let Some(args) = function_args(trimmed, "hex") {
            parse_hex(args)?
        } else {
            parse_named(trimmed)?
        };

        Ok(Self {
            raw: trimmed.to_string(),
            kind,
        })
    }

    /// The spec text as written, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &SpecKind {
        &self.kind
    }

    /// Builds the `console` style this spec stands for.
    ///
    /// `reset()` maps to the empty style: each span is styled independently,
    /// so clearing is the absence of styling.
    pub fn to_style(&self) -> Style {
        match self.kind {
            SpecKind::Reset => Style::new(),
            SpecKind::Named {
                attrs,
                bright,
                color,
            } => {
                let mut style = Style::new();
                if attrs.bold {
                    style = style.bold();
                }
                if attrs.italic {
                    style = style.italic();
                }
                if attrs.underline {
                    style = style.underlined();
                }
                if attrs.strikethrough {
                    style = style.strikethrough();
                }
                if bright {
                    style.fg(Color::Color256(color.ansi_index() + 8))
                } else {
                    style.fg(color.console_color())
                }
            }
            SpecKind::Rgb(r, g, b) => {
                Style::new().fg(Color::Color256(rgb_to_ansi256((r, g, b))))
            }
        }
    }
}

/// Extracts `args` from `name(args)`, or `None` if `s` is not that call.
fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb(args: &str) -> Result<SpecKind, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!(
            "rgb() requires exactly 3 components, got {}",
            parts.len()
        ));
    }
    let mut channels = [0u8; 3];
    for (i, part) in parts.iter().enumerate() {
        channels[i] = part
            .parse::<u8>()
            .map_err(|_| format!("invalid rgb component '{}': expected 0-255", part))?;
    }
    Ok(SpecKind::Rgb(channels[0], channels[1], channels[2]))
}

fn parse_hex(args: &str) -> Result<SpecKind, String> {
    if !args.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {}", args));
    }
    let digit = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|_| format!("invalid hex color: {}", args))
    };
    match args.len() {
        // single digit: gray value, expanded like a short-form channel
        1 => {
            let v = digit(args)? * 17;
            Ok(SpecKind::Rgb(v, v, v))
        }
        3 => {
            let r = digit(&args[0..1])? * 17;
            let g = digit(&args[1..2])? * 17;
            let b = digit(&args[2..3])? * 17;
            Ok(SpecKind::Rgb(r, g, b))
        }
        6 => {
            let r = digit(&args[0..2])?;
            let g = digit(&args[2..4])?;
            let b = digit(&args[4..6])?;
            Ok(SpecKind::Rgb(r, g, b))
        }
        _ => Err(format!(
            "invalid hex color: {} (must be 1, 3 or 6 digits)",
            args
        )),
    }
}

fn parse_named(s: &str) -> Result<SpecKind, String> {
    let lower = s.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut attrs = Attributes::default();
    let mut bright = false;

    loop {
        if let Some(r) = rest.strip_prefix("bold_") {
            attrs.bold = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("italic_") {
            attrs.italic = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("underline_") {
            attrs.underline = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("strikethrough_") {
            attrs.strikethrough = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("bright_") {
            bright = true;
            rest = r;
        } else {
            break;
        }
    }

    let color = BaseColor::from_name(rest)?;
    Ok(SpecKind::Named {
        attrs,
        bright,
        color,
    })
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}
