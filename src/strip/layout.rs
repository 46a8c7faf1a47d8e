use crate::foundation::error::{BoothError, BoothResult};

/// Brand printed in every strip label.
pub const BRAND: &str = "Pocket Booth";

/// Fixed geometry of a labeled strip. All values are pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StripLayout {
    /// Side of each square photo cell.
    pub photo_size: u32,
    /// Left and right padding.
    pub padding_h: u32,
    /// Padding above the first photo.
    pub padding_top: u32,
    /// Vertical gap between photos.
    pub gap: u32,
    /// Band below the last photo holding the label line.
    pub label_band: u32,
    /// Padding below the label band.
    pub padding_bottom: u32,
    /// Label font size.
    pub label_font_px: f32,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            photo_size: 560,
            padding_h: 36,
            padding_top: 36,
            gap: 12,
            label_band: 52,
            padding_bottom: 36,
            label_font_px: 20.0,
        }
    }
}

impl StripLayout {
    /// Output `(width, height)` for `count` photos.
    pub fn canvas_size(&self, count: usize) -> BoothResult<(u32, u32)> {
        if count == 0 {
            return Err(BoothError::composition("cannot lay out a strip with no photos"));
        }
        let n = u32::try_from(count)
            .map_err(|_| BoothError::composition("too many photos for one strip"))?;
        let width = self.photo_size + 2 * self.padding_h;
        let height = n
            .checked_mul(self.photo_size)
            .and_then(|v| v.checked_add((n - 1) * self.gap))
            .and_then(|v| v.checked_add(self.padding_top + self.label_band + self.padding_bottom))
            .ok_or_else(|| BoothError::composition("strip height overflow"))?;
        Ok((width, height))
    }

    /// Top-left corner of photo `index` (0-based, top to bottom).
    pub fn photo_origin(&self, index: usize) -> (u32, u32) {
        let i = index as u32;
        (self.padding_h, self.padding_top + i * (self.photo_size + self.gap))
    }

    /// Top edge of the label band for `count` photos.
    pub fn label_top(&self, count: usize) -> u32 {
        let n = count.max(1) as u32;
        self.padding_top + n * self.photo_size + (n - 1) * self.gap
    }
}

/// Label line: `BRAND · DATE` upper-cased, or just the brand.
pub fn strip_label(date: Option<&str>) -> String {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => format!("{BRAND} · {d}").to_uppercase(),
        None => BRAND.to_uppercase(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/layout.rs"]
mod tests;
