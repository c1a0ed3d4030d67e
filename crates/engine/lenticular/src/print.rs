//! Print settings and render resolution
//!
//! A lenticular sheet has `lpi` lenses per inch and the printer lays down `dpi` dots
//! per inch, so every lens covers `dpi / lpi` printed columns. The render resolution
//! is chosen so the raster holds a whole number of lenses.

use crate::error::{LenticularError, Result};
use serde::{Deserialize, Serialize};

pub const CM_PER_INCH: f64 = 2.54;

pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_LPI: u32 = 60;
pub const DEFAULT_PRINT_WIDTH_CM: f64 = 9.1;
pub const DEFAULT_PRINT_HEIGHT_CM: f64 = 5.5;

pub const MIN_DPI: u32 = 100;
pub const MIN_LPI: u32 = 10;
pub const MIN_PRINT_SIZE_CM: f64 = 1.0;

/// Validated print parameters
///
/// Deserialization goes through [`PrintSettings::new`], so out-of-range values are
/// rejected there as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPrintSettings")]
pub struct PrintSettings {
    dpi: u32,
    lpi: u32,
    width_cm: f64,
    height_cm: f64,
}

#[derive(Deserialize)]
struct UncheckedPrintSettings {
    dpi: u32,
    lpi: u32,
    width_cm: f64,
    height_cm: f64,
}

impl TryFrom<UncheckedPrintSettings> for PrintSettings {
    type Error = LenticularError;

    fn try_from(raw: UncheckedPrintSettings) -> Result<Self> {
        Self::new(raw.dpi, raw.lpi, raw.width_cm, raw.height_cm)
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            lpi: DEFAULT_LPI,
            width_cm: DEFAULT_PRINT_WIDTH_CM,
            height_cm: DEFAULT_PRINT_HEIGHT_CM,
        }
    }
}

impl PrintSettings {
    pub fn new(dpi: u32, lpi: u32, width_cm: f64, height_cm: f64) -> Result<Self> {
        if dpi < MIN_DPI {
            return Err(LenticularError::InvalidSettings(format!(
                "dpi must be at least {MIN_DPI}, got {dpi}"
            )));
        }
        if lpi < MIN_LPI {
            return Err(LenticularError::InvalidSettings(format!(
                "lpi must be at least {MIN_LPI}, got {lpi}"
            )));
        }
        for (label, value) in [("width", width_cm), ("height", height_cm)] {
            if !value.is_finite() || value < MIN_PRINT_SIZE_CM {
                return Err(LenticularError::InvalidSettings(format!(
                    "print {label} must be at least {MIN_PRINT_SIZE_CM} cm, got {value}"
                )));
            }
        }
        Ok(Self {
            dpi,
            lpi,
            width_cm,
            height_cm,
        })
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn lpi(&self) -> u32 {
        self.lpi
    }

    pub fn width_cm(&self) -> f64 {
        self.width_cm
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    /// Printed columns under one lens (`dpi / lpi`)
    pub fn px_per_lens(&self) -> f64 {
        f64::from(self.dpi) / f64::from(self.lpi)
    }

    /// Only integral ratios map every lens onto the same set of columns
    pub fn has_integral_px_per_lens(&self) -> bool {
        self.dpi % self.lpi == 0
    }
}

/// Pixel size of the frames to render for a print
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderResolution {
    pub width: u32,
    pub height: u32,
    pub lens_count: u32,
    pub px_per_lens: f64,
}

/// Lens count rounds up so the print is fully covered; height follows the print's
/// aspect ratio.
pub fn compute_render_resolution(settings: &PrintSettings) -> RenderResolution {
    let px_per_lens = settings.px_per_lens();
    if !settings.has_integral_px_per_lens() {
        tracing::warn!(
            "{} dpi / {} lpi gives {:.3} px per lens; columns will not line up with lenses",
            settings.dpi,
            settings.lpi,
            px_per_lens
        );
    }

    let width_inches = settings.width_cm / CM_PER_INCH;
    let lens_count = (f64::from(settings.lpi) * width_inches).ceil() as u32;
    let width = (f64::from(lens_count) * px_per_lens).ceil() as u32;
    let height = (f64::from(width) * settings.height_cm / settings.width_cm).round() as u32;

    RenderResolution {
        width,
        height,
        lens_count,
        px_per_lens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_card_resolution() {
        let settings = PrintSettings::new(300, 60, 9.1, 5.5).unwrap();
        let resolution = compute_render_resolution(&settings);

        assert_eq!(resolution.px_per_lens, 5.0);
        // 60 * 9.1 / 2.54 = 214.96 lenses, rounded up
        assert_eq!(resolution.lens_count, 215);
        assert_eq!(resolution.width, 1075);
        assert_eq!(resolution.height, 650);
        assert_eq!(resolution.width % 5, 0);
    }

    #[test]
    fn test_width_is_whole_lenses() {
        for (dpi, lpi, width) in [(600, 40, 12.0), (300, 75, 20.3), (720, 60, 1.0)] {
            let settings = PrintSettings::new(dpi, lpi, width, 10.0).unwrap();
            let resolution = compute_render_resolution(&settings);
            assert_eq!(resolution.width, resolution.lens_count * (dpi / lpi));
        }
    }

    #[test]
    fn test_non_integral_ratio() {
        let settings = PrintSettings::new(300, 70, 5.0, 5.0).unwrap();
        assert!(!settings.has_integral_px_per_lens());

        let resolution = compute_render_resolution(&settings);
        assert!(resolution.px_per_lens > 4.28 && resolution.px_per_lens < 4.29);
        assert_eq!(resolution.width, resolution.height);
    }

    #[test]
    fn test_validation() {
        assert!(PrintSettings::new(99, 60, 9.1, 5.5).is_err());
        assert!(PrintSettings::new(300, 9, 9.1, 5.5).is_err());
        assert!(PrintSettings::new(300, 60, 0.5, 5.5).is_err());
        assert!(PrintSettings::new(300, 60, 9.1, f64::NAN).is_err());
        assert_eq!(
            PrintSettings::new(DEFAULT_DPI, DEFAULT_LPI, 9.1, 5.5).unwrap(),
            PrintSettings::default()
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let zero_lpi = r#"{"dpi":300,"lpi":0,"width_cm":9.1,"height_cm":5.5}"#;
        let err = serde_json::from_str::<PrintSettings>(zero_lpi).unwrap_err();
        assert!(err.to_string().contains("lpi"), "{err}");

        let json = serde_json::to_string(&PrintSettings::default()).unwrap();
        let settings: PrintSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, PrintSettings::default());
        assert_eq!(compute_render_resolution(&settings).lens_count, 215);
    }
}
