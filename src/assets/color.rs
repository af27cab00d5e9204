use crate::foundation::error::{CertError, CertResult};

/// Straight-alpha RGBA8 text color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Opaque color from RGB channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA` or the `#RGB` shorthand (leading `#` optional, case-insensitive).
pub fn parse_hex_color(s: &str) -> CertResult<TextBrushRgba8> {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CertError::validation(format!("invalid hex color \"{s}\"")));
    }

    fn hex_byte(pair: &str) -> CertResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| CertError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, i) in out.iter_mut().zip(0..3) {
                let nib = hex_byte(&hex[i..i + 1])?;
                *slot = nib * 17;
            }
            Ok(TextBrushRgba8::rgb(out[0], out[1], out[2]))
        }
        6 => Ok(TextBrushRgba8::rgb(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
        )),
        8 => Ok(TextBrushRgba8 {
            r: hex_byte(&hex[0..2])?,
            g: hex_byte(&hex[2..4])?,
            b: hex_byte(&hex[4..6])?,
            a: hex_byte(&hex[6..8])?,
        }),
        _ => Err(CertError::validation(format!(
            "hex color must be #RGB, #RRGGBB or #RRGGBBAA (got \"{s}\")"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
