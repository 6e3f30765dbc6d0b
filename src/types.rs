use fixed::types::I32F32;
use std::fmt;

/// PostScript point (1/72 in), stored as fixed-point so page geometry
/// serializes identically across platforms.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Pt(I32F32);

impl Pt {
    pub const ZERO: Pt = Pt(I32F32::from_bits(0));

    pub fn from_f32(value: f32) -> Pt {
        if !value.is_finite() {
            return Pt::ZERO;
        }
        let milli = (value as f64 * 1000.0).round();
        let milli = milli.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
        Pt::from_milli_i64(milli)
    }

    pub fn to_milli_i64(self) -> i64 {
        let bits = self.0.to_bits() as i128;
        let denom = 1i128 << 32;
        let scaled = bits * 1000;
        let adj = if scaled >= 0 { denom / 2 } else { -denom / 2 };
        let milli = (scaled + adj) / denom;
        milli.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn from_milli_i64(milli: i64) -> Pt {
        let milli = milli as i128;
        let denom = 1i128 << 32;
        let adj = if milli >= 0 { 500 } else { -500 };
        let bits = (milli * denom + adj) / 1000;
        let bits = bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        Pt(I32F32::from_bits(bits))
    }

    pub fn is_negative(self) -> bool {
        self.to_milli_i64() < 0
    }
}

// CSS length in `pt`, at most three decimals, trailing zeros trimmed.
impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let milli = self.to_milli_i64();
        let sign = if milli < 0 { "-" } else { "" };
        let abs = milli.unsigned_abs();
        let whole = abs / 1000;
        let frac = abs % 1000;
        if frac == 0 {
            return write!(f, "{sign}{whole}pt");
        }
        let frac = format!("{frac:03}");
        write!(f, "{sign}{whole}.{}pt", frac.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Pt,
    pub height: Pt,
}

impl Size {
    pub fn a4() -> Self {
        Self {
            width: Pt::from_f32(595.28),
            height: Pt::from_f32(841.89),
        }
    }

    pub fn letter() -> Self {
        // 8.5in x 11in at 72pt/in.
        Self {
            width: Pt::from_f32(612.0),
            height: Pt::from_f32(792.0),
        }
    }

    pub fn from_inches(width_in: f32, height_in: f32) -> Self {
        Self {
            width: Pt::from_f32(width_in * 72.0),
            height: Pt::from_f32(height_in * 72.0),
        }
    }

    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width: Pt::from_f32(width_mm * 72.0 / 25.4),
            height: Pt::from_f32(height_mm * 72.0 / 25.4),
        }
    }

    /// `a4`, `letter`, or explicit dimensions such as `210x297mm` and
    /// `8.5x11in`. Case-insensitive; non-positive dimensions are rejected.
    pub fn from_name(raw: &str) -> Option<Self> {
        let name = raw.trim().to_ascii_lowercase();
        match name.as_str() {
            "a4" => return Some(Size::a4()),
            "letter" => return Some(Size::letter()),
            _ => {}
        }
        if let Some(dims) = name.strip_suffix("mm") {
            let (width, height) = parse_dimensions(dims)?;
            Some(Size::from_mm(width, height))
        } else if let Some(dims) = name.strip_suffix("in") {
            let (width, height) = parse_dimensions(dims)?;
            Some(Size::from_inches(width, height))
        } else {
            None
        }
    }
}

fn parse_dimensions(raw: &str) -> Option<(f32, f32)> {
    let (width, height) = raw.split_once('x')?;
    let width = width.trim().parse::<f32>().ok()?;
    let height = height.trim().parse::<f32>().ok()?;
    (width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0)
        .then_some((width, height))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: Pt::from_f32(top),
            right: Pt::from_f32(right),
            bottom: Pt::from_f32(bottom),
            left: Pt::from_f32(left),
        }
    }

    pub fn horizontal(&self) -> Pt {
        Pt::from_milli_i64(self.left.to_milli_i64() + self.right.to_milli_i64())
    }

    pub fn vertical(&self) -> Pt {
        Pt::from_milli_i64(self.top.to_milli_i64() + self.bottom.to_milli_i64())
    }
}
