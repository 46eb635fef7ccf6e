#![forbid(unsafe_code)]

//! CSS strings for the canvas 2D context.

use glyphgrid_core::geometry::PixelRect;
use glyphgrid_render::cell::PackedRgba;

/// `fillStyle` string for a packed colour.
///
/// Opaque colours use `#rrggbb`; anything else uses `rgba(...)` with alpha
/// rounded to three decimals.
pub fn css_color(color: PackedRgba) -> String {
    if color.a() == 255 {
        return format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b());
    }
    format!(
        "rgba({}, {}, {}, {})",
        color.r(),
        color.g(),
        color.b(),
        css_alpha(color.a())
    )
}

fn css_alpha(a: u8) -> String {
    match a {
        0 => "0".to_owned(),
        255 => "1".to_owned(),
        _ => {
            let s = format!("{:.3}", f32::from(a) / 255.0);
            s.trim_end_matches('0').to_owned()
        }
    }
}

/// `font` string, e.g. `16px monospace`.
///
/// Families containing spaces are quoted unless already quoted or given as
/// a comma-separated list.
pub fn font_string(px: f32, family: &str) -> String {
    let family = family.trim();
    let quoted = family.contains(' ') && !family.contains(',') && !family.starts_with(['"', '\'']);
    if quoted {
        format!("{px}px \"{family}\"")
    } else {
        format!("{px}px {family}")
    }
}

/// Anchor point for a glyph drawn with `textAlign = center` and
/// `textBaseline = middle`.
pub fn glyph_origin(rect: PixelRect) -> (f64, f64) {
    (
        f64::from(rect.x) + f64::from(rect.width) / 2.0,
        f64::from(rect.y) + f64::from(rect.height) / 2.0,
    )
}
