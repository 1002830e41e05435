use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::GroupKey;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: n value → RGBColor
// ---------------------------------------------------------------------------

/// Assigns each series key a distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<GroupKey, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map from the keys, in the order given.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a GroupKey>) -> Self {
        let keys: Vec<GroupKey> = keys.into_iter().copied().collect();
        let palette = generate_palette(keys.len());
        let mapping: BTreeMap<GroupKey, RGBColor> =
            keys.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, key: &GroupKey) -> RGBColor {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_key_falls_back_to_grey() {
        let keys = [GroupKey::Integer(1), GroupKey::Integer(2)];
        let cm = ColorMap::new(&keys);
        assert_ne!(cm.color_for(&keys[0]), cm.color_for(&keys[1]));
        assert_eq!(cm.color_for(&GroupKey::Integer(99)), RGBColor(128, 128, 128));
    }
}
