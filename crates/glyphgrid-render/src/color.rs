#![forbid(unsafe_code)]

//! Colour resolution.
//!
//! Draw calls name colours symbolically (`"red"`, `"bright-blue"`), by hex
//! (`"#f80"`, `"#ff8800"`, `"#ff880080"`), as CSS functional values
//! (`"rgb(255, 136, 0)"`, `"rgba(255, 136, 0, 0.5)"`), by xterm-256 index
//! (`"ansi:208"`) or as an already packed [`PackedRgba`]. [`resolve`] turns any of these
//! into a concrete colour; `None` is handled by [`resolve_opt`] and means
//! "leave unset".

use std::borrow::Cow;
use std::fmt;

use crate::cell::PackedRgba;

/// A colour as written by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorRef {
    /// Palette name, hex string or `ansi:N` token.
    Name(Cow<'static, str>),
    /// Already concrete.
    Rgba(PackedRgba),
}

impl ColorRef {
    /// A palette name or raw string known at compile time.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<&'static str> for ColorRef {
    fn from(s: &'static str) -> Self {
        Self::Name(Cow::Borrowed(s))
    }
}

impl From<String> for ColorRef {
    fn from(s: String) -> Self {
        Self::Name(Cow::Owned(s))
    }
}

impl From<PackedRgba> for ColorRef {
    fn from(c: PackedRgba) -> Self {
        Self::Rgba(c)
    }
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Rgba(c) => f.write_str(&c.to_hex()),
        }
    }
}

/// Colour resolution failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not a palette name, not valid hex, not a valid `ansi:N` token.
    UnknownColor { name: String },
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColor { name } => write!(f, "unknown color: {name:?}"),
        }
    }
}

impl std::error::Error for ColorError {}

const ANSI16_PALETTE: [PackedRgba; 16] = [
    PackedRgba::rgb(0, 0, 0),       // Black
    PackedRgba::rgb(205, 0, 0),     // Red
    PackedRgba::rgb(0, 205, 0),     // Green
    PackedRgba::rgb(205, 205, 0),   // Yellow
    PackedRgba::rgb(0, 0, 238),     // Blue
    PackedRgba::rgb(205, 0, 205),   // Magenta
    PackedRgba::rgb(0, 205, 205),   // Cyan
    PackedRgba::rgb(229, 229, 229), // White
    PackedRgba::rgb(127, 127, 127), // Bright Black
    PackedRgba::rgb(255, 0, 0),     // Bright Red
    PackedRgba::rgb(0, 255, 0),     // Bright Green
    PackedRgba::rgb(255, 255, 0),   // Bright Yellow
    PackedRgba::rgb(92, 92, 255),   // Bright Blue
    PackedRgba::rgb(255, 0, 255),   // Bright Magenta
    PackedRgba::rgb(0, 255, 255),   // Bright Cyan
    PackedRgba::rgb(255, 255, 255), // Bright White
];

/// Names outside the ANSI set, after normalisation.
const EXTRA_NAMES: [(&str, PackedRgba); 5] = [
    ("orange", PackedRgba::rgb(255, 165, 0)),
    ("purple", PackedRgba::rgb(128, 0, 128)),
    ("pink", PackedRgba::rgb(255, 192, 203)),
    ("brown", PackedRgba::rgb(165, 42, 42)),
    ("transparent", PackedRgba::TRANSPARENT),
];

fn ansi16_index(name: &str) -> Option<usize> {
    let idx = match name {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        "bright_black" | "gray" | "grey" => 8,
        "bright_red" => 9,
        "bright_green" => 10,
        "bright_yellow" => 11,
        "bright_blue" => 12,
        "bright_magenta" => 13,
        "bright_cyan" => 14,
        "bright_white" => 15,
        _ => return None,
    };
    Some(idx)
}

/// Convert an xterm-256 index to RGB.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> PackedRgba {
    if index < 16 {
        return ANSI16_PALETTE[index as usize];
    }
    if index >= 232 {
        let gray = 8 + 10 * (index - 232);
        return PackedRgba::rgb(gray, gray, gray);
    }
    let idx = index - 16;
    let r = idx / 36;
    let g = (idx / 6) % 6;
    let b = idx % 6;
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    PackedRgba::rgb(LEVELS[r as usize], LEVELS[g as usize], LEVELS[b as usize])
}

/// Look up a palette name. Case-insensitive; `-` and ` ` count as `_`.
#[must_use]
pub fn palette(name: &str) -> Option<PackedRgba> {
    let normalized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    if let Some(idx) = ansi16_index(&normalized) {
        return Some(ANSI16_PALETTE[idx]);
    }
    EXTRA_NAMES
        .iter()
        .find(|(n, _)| *n == normalized)
        .map(|(_, c)| *c)
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_nibble(hi)? << 4 | hex_nibble(lo)?)
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[must_use]
pub fn parse_hex(s: &str) -> Option<PackedRgba> {
    let digits = s.strip_prefix('#')?.as_bytes();
    match digits.len() {
        3 => {
            let r = hex_nibble(digits[0])?;
            let g = hex_nibble(digits[1])?;
            let b = hex_nibble(digits[2])?;
            Some(PackedRgba::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(PackedRgba::rgb(
            hex_byte(digits[0], digits[1])?,
            hex_byte(digits[2], digits[3])?,
            hex_byte(digits[4], digits[5])?,
        )),
        8 => Some(PackedRgba::rgba(
            hex_byte(digits[0], digits[1])?,
            hex_byte(digits[2], digits[3])?,
            hex_byte(digits[4], digits[5])?,
            hex_byte(digits[6], digits[7])?,
        )),
        _ => None,
    }
}

/// Parse `rgb(r, g, b)` or `rgba(r, g, b, a)` with integer channels
/// `0..=255` and alpha in `0.0..=1.0`.
#[must_use]
pub fn parse_css_rgb(s: &str) -> Option<PackedRgba> {
    let s = s.trim();
    let open = s.find('(')?;
    let func = s[..open].trim().to_ascii_lowercase();
    let args = s[open + 1..].strip_suffix(')')?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |p: &str| p.parse::<u8>().ok();
    match (func.as_str(), parts.as_slice()) {
        ("rgb", [r, g, b]) => Some(PackedRgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        ("rgba", [r, g, b, a]) => {
            let a = a.parse::<f32>().ok().filter(|a| (0.0..=1.0).contains(a))?;
            Some(PackedRgba::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (a * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

fn parse_ansi_token(s: &str) -> Option<PackedRgba> {
    let (prefix, rest) = s.trim().split_once(':')?;
    if !prefix.eq_ignore_ascii_case("ansi") {
        return None;
    }
    rest.trim().parse::<u8>().ok().map(ansi256_to_rgb)
}

/// Resolve a colour reference to a concrete colour.
pub fn resolve(color: &ColorRef) -> Result<PackedRgba, ColorError> {
    let name = match color {
        ColorRef::Rgba(c) => return Ok(*c),
        ColorRef::Name(name) => name.as_ref(),
    };
    let resolved = if name.trim_start().starts_with('#') {
        parse_hex(name.trim())
    } else if name.contains('(') {
        parse_css_rgb(name)
    } else {
        palette(name).or_else(|| parse_ansi_token(name))
    };
    resolved.ok_or_else(|| ColorError::UnknownColor {
        name: name.to_string(),
    })
}

/// Resolve an optional reference; `None` stays `None`.
pub fn resolve_opt(color: Option<&ColorRef>) -> Result<Option<PackedRgba>, ColorError> {
    color.map(resolve).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &'static str) -> Result<PackedRgba, ColorError> {
        resolve(&ColorRef::from(s))
    }

    #[test]
    fn ansi_names_resolve() {
        assert_eq!(r("black"), Ok(PackedRgba::rgb(0, 0, 0)));
        assert_eq!(r("red"), Ok(PackedRgba::rgb(205, 0, 0)));
        assert_eq!(r("bright_white"), Ok(PackedRgba::rgb(255, 255, 255)));
    }

    #[test]
    fn gray_aliases_share_bright_black() {
        let bb = r("bright_black");
        assert_eq!(r("gray"), bb);
        assert_eq!(r("grey"), bb);
    }

    #[test]
    fn lookup_normalizes_case_and_separators() {
        let expected = r("bright_blue");
        assert_eq!(r("Bright-Blue"), expected);
        assert_eq!(r("BRIGHT BLUE"), expected);
    }

    #[test]
    fn extra_names() {
        assert_eq!(r("orange"), Ok(PackedRgba::rgb(255, 165, 0)));
        assert_eq!(r("transparent"), Ok(PackedRgba::TRANSPARENT));
    }

    #[test]
    fn hex_forms_pass_through() {
        assert_eq!(r("#f80"), Ok(PackedRgba::rgb(255, 136, 0)));
        assert_eq!(r("#FF8800"), Ok(PackedRgba::rgb(255, 136, 0)));
        assert_eq!(r("#ff880080"), Ok(PackedRgba::rgba(255, 136, 0, 128)));
    }

    #[test]
    fn css_functional_forms_pass_through() {
        assert_eq!(r("rgb(255, 136, 0)"), Ok(PackedRgba::rgb(255, 136, 0)));
        assert_eq!(r("RGB(1,2,3)"), Ok(PackedRgba::rgb(1, 2, 3)));
        assert_eq!(r("rgba(10, 20, 30, 0.502)"), Ok(PackedRgba::rgba(10, 20, 30, 128)));
        assert_eq!(r("rgba(1, 2, 3, 0.2)"), Ok(PackedRgba::rgba(1, 2, 3, 51)));
        assert_eq!(r("rgba(0, 0, 0, 0)"), Ok(PackedRgba::TRANSPARENT));
        assert_eq!(r(" rgba(9, 9, 9, 1) "), Ok(PackedRgba::rgb(9, 9, 9)));
    }

    #[test]
    fn malformed_css_is_unknown() {
        for bad in [
            "rgb(256, 0, 0)",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4)",
            "rgba(1, 2, 3, 1.5)",
            "rgba(1, 2, 3)",
            "rgb(1, 2, 3",
            "hsl(0, 0, 0)",
        ] {
            assert!(
                matches!(
                    resolve(&ColorRef::from(bad)),
                    Err(ColorError::UnknownColor { .. })
                ),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn malformed_hex_is_unknown() {
        for bad in ["#", "#12", "#12345", "#ggg", "#1234567"] {
            assert!(
                matches!(
                    resolve(&ColorRef::from(bad)),
                    Err(ColorError::UnknownColor { .. })
                ),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn unknown_name_fails_with_name() {
        let err = r("chartreuse-ish").unwrap_err();
        assert_eq!(
            err,
            ColorError::UnknownColor {
                name: "chartreuse-ish".into()
            }
        );
        assert!(err.to_string().contains("chartreuse-ish"));
    }

    #[test]
    fn ansi256_tokens() {
        assert_eq!(r("ansi:1"), r("red"));
        assert_eq!(r("ANSI:16"), Ok(PackedRgba::rgb(0, 0, 0)));
        assert_eq!(r("ansi:231"), Ok(PackedRgba::rgb(255, 255, 255)));
        assert_eq!(r("ansi:232"), Ok(PackedRgba::rgb(8, 8, 8)));
        assert!(r("ansi:256").is_err());
        assert!(r("ansi:").is_err());
    }

    #[test]
    fn packed_passes_through() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!(resolve(&ColorRef::from(c)), Ok(c));
    }

    #[test]
    fn none_is_no_paint() {
        assert_eq!(resolve_opt(None), Ok(None));
        assert_eq!(
            resolve_opt(Some(&ColorRef::named("blue"))),
            Ok(Some(PackedRgba::rgb(0, 0, 238)))
        );
        assert!(resolve_opt(Some(&ColorRef::named("nope"))).is_err());
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hex6_roundtrips_through_to_hex(r: u8, g: u8, b: u8) {
                let c = PackedRgba::rgb(r, g, b);
                prop_assert_eq!(resolve(&ColorRef::from(c.to_hex())), Ok(c));
            }

            #[test]
            fn hex8_roundtrips_through_to_hex(r: u8, g: u8, b: u8, a in 0u8..255) {
                let c = PackedRgba::rgba(r, g, b, a);
                prop_assert_eq!(resolve(&ColorRef::from(c.to_hex())), Ok(c));
            }

            #[test]
            fn every_ansi256_index_is_opaque(i: u8) {
                prop_assert_eq!(ansi256_to_rgb(i).a(), 255);
            }
        }
    }
}
