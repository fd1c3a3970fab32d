//! Per-point colours from coded values

use crate::error::PaletteError;

/// RGB triple in 0..1
pub type Rgb = [f32; 3];

/// Flat `[r, g, b, r, g, b, ...]` buffer for `codes`.
///
/// Code 0 takes `missing`; code `k` takes `palette[k - 1]`. A code with no
/// palette entry is an error rather than a silent fallback.
pub fn point_colors(codes: &[u16], palette: &[Rgb], missing: Rgb) -> Result<Vec<f32>, PaletteError> {
    let mut colors = Vec::with_capacity(codes.len() * 3);
    for &code in codes {
        let rgb = match code {
            0 => missing,
            k => *palette.get(k as usize - 1).ok_or(PaletteError::MissingColor {
                code,
                palette_len: palette.len(),
            })?,
        };
        colors.extend_from_slice(&rgb);
    }
    Ok(colors)
}
