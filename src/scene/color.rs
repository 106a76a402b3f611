use std::str::FromStr;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TokenError, TokenResult};

/// A parsed CSS color in straight (non-premultiplied) normalized RGBA.
///
/// Documents store colors as the CSS strings the editor produced (`#FF0000`,
/// `rgba(0,0,0,0.5)`, ...). They are parsed lazily at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDef {
    /// Red in `[0, 1]`.
    pub r: f64,
    /// Green in `[0, 1]`.
    pub g: f64,
    /// Blue in `[0, 1]`.
    pub b: f64,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl ColorDef {
    /// Build a color from normalized components.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color string.
    pub fn parse(s: &str) -> TokenResult<Self> {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if let Some(c) = named(&lower) {
            return Ok(c);
        }
        if let Some(hex) = t.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = func_args(&lower, "rgba").or_else(|| func_args(&lower, "rgb")) {
            return parse_rgb_fn(args);
        }
        if let Some(args) = func_args(&lower, "hsla").or_else(|| func_args(&lower, "hsl")) {
            return parse_hsl_fn(args);
        }
        Err(TokenError::validation(format!("unsupported color \"{s}\"")))
    }

    /// Convert to premultiplied RGBA8.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let a = self.a.clamp(0.0, 1.0);
        let r = (self.r.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let g = (self.g.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let b = (self.b.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);

        Rgba8Premul {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
            a: to_u8(a),
        }
    }

    /// Convert to straight RGBA8.
    pub fn to_rgba8_straight(self) -> [u8; 4] {
        let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

impl FromStr for ColorDef {
    type Err = TokenError;

    fn from_str(s: &str) -> TokenResult<Self> {
        Self::parse(s)
    }
}

fn named(s: &str) -> Option<ColorDef> {
    match s {
        "transparent" => Some(ColorDef::rgba(0.0, 0.0, 0.0, 0.0)),
        "black" => Some(ColorDef::rgba(0.0, 0.0, 0.0, 1.0)),
        "white" => Some(ColorDef::rgba(1.0, 1.0, 1.0, 1.0)),
        "red" => Some(ColorDef::rgba(1.0, 0.0, 0.0, 1.0)),
        "green" => Some(ColorDef::rgba(0.0, 128.0 / 255.0, 0.0, 1.0)),
        "blue" => Some(ColorDef::rgba(0.0, 0.0, 1.0, 1.0)),
        _ => None,
    }
}

fn func_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_number(part: &str) -> TokenResult<f64> {
    part.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TokenError::validation(format!("invalid color component \"{part}\"")))
}

// `50%` -> 0.5 * full, plain numbers are taken as-is.
fn parse_component(part: &str, full: f64) -> TokenResult<f64> {
    match part.strip_suffix('%') {
        Some(p) => Ok(parse_number(p)? / 100.0 * full),
        None => parse_number(part),
    }
}

fn parse_alpha(parts: &[&str]) -> TokenResult<f64> {
    match parts.get(3) {
        Some(p) => Ok(parse_component(p, 1.0)?.clamp(0.0, 1.0)),
        None => Ok(1.0),
    }
}

fn parse_rgb_fn(args: &str) -> TokenResult<ColorDef> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(TokenError::validation(
            "rgb()/rgba() expects 3 or 4 components",
        ));
    }
    let r = parse_component(parts[0], 255.0)? / 255.0;
    let g = parse_component(parts[1], 255.0)? / 255.0;
    let b = parse_component(parts[2], 255.0)? / 255.0;
    let a = parse_alpha(&parts)?;
    Ok(ColorDef::rgba(
        r.clamp(0.0, 1.0),
        g.clamp(0.0, 1.0),
        b.clamp(0.0, 1.0),
        a,
    ))
}

fn parse_hsl_fn(args: &str) -> TokenResult<ColorDef> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(TokenError::validation(
            "hsl()/hsla() expects 3 or 4 components",
        ));
    }
    let h = parse_number(parts[0].trim_end_matches("deg"))?;
    let s = parse_component(parts[1], 1.0)?;
    let l = parse_component(parts[2], 1.0)?;
    let a = parse_alpha(&parts)?;
    Ok(hsla_to_rgba(h, s, l, a))
}

fn parse_hex(s: &str) -> TokenResult<ColorDef> {
    fn hex_byte(pair: &str) -> TokenResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| TokenError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    let expanded;
    let s = if s.len() == 3 || s.len() == 4 {
        expanded = s.chars().flat_map(|c| [c, c]).collect::<String>();
        expanded.as_str()
    } else {
        s
    };
    if !s.is_ascii() {
        return Err(TokenError::validation("hex color must be ASCII"));
    }

    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(TokenError::validation(
                "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA",
            ));
        }
    };

    Ok(ColorDef::rgba(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> ColorDef {
    // Standard HSL -> RGB conversion (sRGB space, normalized 0..1 inputs).
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return ColorDef::rgba(l, l, l, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    ColorDef::rgba(r, g, b, a)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/color.rs"]
mod tests;
