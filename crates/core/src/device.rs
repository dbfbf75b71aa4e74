//! Device presets and canvas resolution.

use serde::Serialize;

use crate::error::{RenderError, RenderResult};

/// A named phone screen with its lock-screen safe area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePreset {
    pub id: &'static str,
    pub display_name: &'static str,
    pub width_px: u32,
    pub height_px: u32,
    /// Fraction of the height covered by the clock/notch.
    pub safe_area_top: f64,
    /// Fraction of the height covered by the home indicator.
    pub safe_area_bottom: f64,
}

pub const DEFAULT_DEVICE_ID: &str = "iphone15pro";

/// Registry order is display order.
pub static DEVICES: &[DevicePreset] = &[
    DevicePreset {
        id: "iphone16promax",
        display_name: "iPhone 16 Pro Max",
        width_px: 1320,
        height_px: 2868,
        safe_area_top: 0.25,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphone16pro",
        display_name: "iPhone 16 Pro",
        width_px: 1206,
        height_px: 2622,
        safe_area_top: 0.25,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphone15promax",
        display_name: "iPhone 15 Pro Max",
        width_px: 1290,
        height_px: 2796,
        safe_area_top: 0.25,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: DEFAULT_DEVICE_ID,
        display_name: "iPhone 15 Pro",
        width_px: 1179,
        height_px: 2556,
        safe_area_top: 0.25,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphone15",
        display_name: "iPhone 15 / 14",
        width_px: 1170,
        height_px: 2532,
        safe_area_top: 0.22,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphone13",
        display_name: "iPhone 13",
        width_px: 1170,
        height_px: 2532,
        safe_area_top: 0.22,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphone13mini",
        display_name: "iPhone 13 mini",
        width_px: 1080,
        height_px: 2340,
        safe_area_top: 0.22,
        safe_area_bottom: 0.05,
    },
    DevicePreset {
        id: "iphonese",
        display_name: "iPhone SE",
        width_px: 750,
        height_px: 1334,
        safe_area_top: 0.18,
        safe_area_bottom: 0.05,
    },
];

/// Exact lookup; `None` for unknown ids.
pub fn find_device(id: &str) -> Option<&'static DevicePreset> {
    DEVICES.iter().find(|d| d.id == id)
}

pub fn default_device() -> &'static DevicePreset {
    find_device(DEFAULT_DEVICE_ID).unwrap_or(&DEVICES[0])
}

/// Lookup that never fails: unknown or absent ids map to the default preset.
pub fn device_or_default(id: Option<&str>) -> &'static DevicePreset {
    match id.and_then(find_device) {
        Some(device) => device,
        None => {
            if let Some(unknown) = id {
                tracing::warn!(device = unknown, "unknown device id, using {DEFAULT_DEVICE_ID}");
            }
            default_device()
        }
    }
}

/// Concrete pixel canvas for one render, with its safe-area insets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width_px: u32,
    pub height_px: u32,
    pub safe_area_top: f64,
    pub safe_area_bottom: f64,
}

impl CanvasSpec {
    pub fn new(
        width_px: u32,
        height_px: u32,
        safe_area_top: f64,
        safe_area_bottom: f64,
    ) -> RenderResult<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::InvalidCanvas(format!(
                "dimensions must be positive, got {width_px}x{height_px}"
            )));
        }
        let in_range = |f: f64| (0.0..1.0).contains(&f);
        if !in_range(safe_area_top)
            || !in_range(safe_area_bottom)
            || safe_area_top + safe_area_bottom >= 1.0
        {
            return Err(RenderError::InvalidCanvas(format!(
                "safe area {safe_area_top} + {safe_area_bottom} leaves no content height"
            )));
        }
        Ok(Self {
            width_px,
            height_px,
            safe_area_top,
            safe_area_bottom,
        })
    }

    pub fn from_preset(device: &DevicePreset) -> Self {
        Self {
            width_px: device.width_px,
            height_px: device.height_px,
            safe_area_top: device.safe_area_top,
            safe_area_bottom: device.safe_area_bottom,
        }
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width_px)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.height_px)
    }

    pub fn safe_top_px(&self) -> f64 {
        self.height() * self.safe_area_top
    }

    pub fn safe_bottom_px(&self) -> f64 {
        self.height() * self.safe_area_bottom
    }

    /// Height left for content once both insets are removed.
    pub fn available_height(&self) -> f64 {
        self.height() - self.safe_top_px() - self.safe_bottom_px()
    }
}

/// Resolve a canvas from an optional preset id and optional pixel overrides.
///
/// Both overrides must be present and positive to replace the preset's
/// dimensions. The safe-area fractions always come from the preset (or the
/// default preset when the id is absent or unknown).
pub fn resolve(device_id: Option<&str>, width: Option<u32>, height: Option<u32>) -> CanvasSpec {
    let device = device_or_default(device_id);
    let mut canvas = CanvasSpec::from_preset(device);
    if let (Some(w), Some(h)) = (width, height)
        && w > 0
        && h > 0
    {
        canvas.width_px = w;
        canvas.height_px = h;
    }
    canvas
}

/// Entry for a device picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub dimensions: String,
}

pub fn device_options() -> Vec<DeviceOption> {
    DEVICES
        .iter()
        .map(|d| DeviceOption {
            id: d.id,
            name: d.display_name,
            dimensions: format!("{} × {}", d.width_px, d.height_px),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_device_falls_back_to_default() {
        let canvas = resolve(Some("xyz"), None, None);
        assert_eq!((canvas.width_px, canvas.height_px), (1179, 2556));
        assert!((canvas.safe_area_top - 0.25).abs() < f64::EPSILON);
        assert_eq!(resolve(None, None, None), canvas);
    }

    #[test]
    fn overrides_keep_device_insets() {
        let canvas = resolve(Some("iphonese"), Some(500), Some(900));
        assert_eq!((canvas.width_px, canvas.height_px), (500, 900));
        assert!((canvas.safe_area_top - 0.18).abs() < f64::EPSILON);
        assert!((canvas.safe_area_bottom - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_or_zero_overrides_are_ignored() {
        let preset = resolve(Some("iphone15"), None, None);
        assert_eq!(resolve(Some("iphone15"), Some(500), None), preset);
        assert_eq!(resolve(Some("iphone15"), Some(0), Some(900)), preset);
    }

    #[test]
    fn available_height_excludes_insets() {
        let canvas = resolve(Some("iphone15pro"), Some(1000), Some(2000));
        assert!((canvas.safe_top_px() - 500.0).abs() < 1e-9);
        assert!((canvas.available_height() - 1400.0).abs() < 1e-9);
    }

    #[test]
    fn canvas_validation() {
        assert!(CanvasSpec::new(0, 100, 0.1, 0.1).is_err());
        assert!(CanvasSpec::new(100, 100, 0.6, 0.4).is_err());
        assert!(CanvasSpec::new(100, 100, -0.1, 0.1).is_err());
        assert!(CanvasSpec::new(100, 100, 0.2, 0.05).is_ok());
    }

    #[test]
    fn registry_spans_expected_range() {
        let widths: Vec<u32> = DEVICES.iter().map(|d| d.width_px).collect();
        let heights: Vec<u32> = DEVICES.iter().map(|d| d.height_px).collect();
        assert_eq!(widths.iter().min(), Some(&750));
        assert_eq!(widths.iter().max(), Some(&1320));
        assert_eq!(heights.iter().min(), Some(&1334));
        assert_eq!(heights.iter().max(), Some(&2868));
        for d in DEVICES {
            assert!((0.18..=0.25).contains(&d.safe_area_top), "{}", d.id);
            assert!((d.safe_area_bottom - 0.05).abs() < f64::EPSILON);
            assert!(CanvasSpec::new(d.width_px, d.height_px, d.safe_area_top, d.safe_area_bottom).is_ok());
        }
    }

    #[test]
    fn options_list_every_preset() {
        let options = device_options();
        assert_eq!(options.len(), DEVICES.len());
        let pro = options.iter().find(|o| o.id == "iphone15pro");
        assert_eq!(pro.map(|o| o.dimensions.as_str()), Some("1179 × 2556"));
    }
}
