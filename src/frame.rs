//! Frame specification and resolution.
//!
//! A [`FrameSpec`] is an element's requested size, per axis either an absolute
//! point value, a percentage of the immediate container, or `Fill`. An unset
//! axis falls back to the element's natural size, which only the rendering
//! backend can measure, so [`resolve`] returns `None` for it and
//! [`ResolvedFrame::or_natural`] fills it in later.

use crate::geometry::{non_negative, Size};
use crate::script::{ArgError, ScriptValue};

/// Error produced by a malformed frame value. The offending axis is treated as unset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameParseError {
    #[error("invalid frame value {0:?}: expected a number, a percentage like \"50%\", or \"fill\"")]
    InvalidString(String),
    #[error("invalid frame value of type {0}")]
    InvalidType(&'static str),
    #[error("frame value is not a finite number")]
    NonFinite,
}

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// One axis of a frame request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Dimension {
    /// An absolute size in points.
    Absolute(f32),
    /// A percentage (0–100) of the immediate container.
    Percentage(f32),
    /// The full extent of the immediate container.
    Fill,
}

impl Dimension {
    /// A percentage dimension, clamped to `0.0..=100.0`.
    pub fn percentage(p: f32) -> Dimension {
        Dimension::Percentage(if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) })
    }

    /// Resolve against the container's extent on the same axis.
    pub fn resolve(self, container: f32) -> f32 {
        let container = non_negative(container);
        match self {
            Dimension::Absolute(v) => non_negative(v),
            Dimension::Percentage(p) => container * p / 100.0,
            Dimension::Fill => container,
        }
    }

    /// Parse the string form: `"<digits>[.<digits>]%"` or `"fill"`.
    pub fn parse(s: &str) -> Result<Dimension, FrameParseError> {
        if s == "fill" {
            return Ok(Dimension::Fill);
        }
        parse_percentage(s)
            .map(Dimension::percentage)
            .ok_or_else(|| FrameParseError::InvalidString(s.to_owned()))
    }

    /// Normalize a script value: numbers are absolute points, strings are parsed.
    pub fn from_script(value: &ScriptValue) -> Result<Dimension, FrameParseError> {
        match value {
            ScriptValue::Number(n) if n.is_finite() => Ok(Dimension::Absolute(*n as f32)),
            ScriptValue::Number(_) => Err(FrameParseError::NonFinite),
            ScriptValue::String(s) => Dimension::parse(s),
            other => Err(FrameParseError::InvalidType(other.type_name())),
        }
    }
}

fn parse_percentage(s: &str) -> Option<f32> {
    let body = s.strip_suffix('%')?;
    let (int, frac) = match body.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (body, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || frac.is_some_and(|f| !all_digits(f)) {
        return None;
    }
    body.parse::<f32>().ok()
}

// ---------------------------------------------------------------------------
// FrameSpec
// ---------------------------------------------------------------------------

/// Requested width and height; `None` means "natural size".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameSpec {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

impl FrameSpec {
    pub const fn new() -> Self {
        Self { width: None, height: None }
    }

    /// Fixed width and height in points.
    pub const fn fixed(width: f32, height: f32) -> Self {
        Self { width: Some(Dimension::Absolute(width)), height: Some(Dimension::Absolute(height)) }
    }

    /// Fill the container on both axes.
    pub const fn fill() -> Self {
        Self { width: Some(Dimension::Fill), height: Some(Dimension::Fill) }
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: Dimension) -> Self {
        self.height = Some(height);
        self
    }

    /// Whether neither axis is set.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Parse a `{w, h}` (or `{width, height}`) table.
    ///
    /// A malformed axis is logged and left unset; only a non-table argument
    /// is an error.
    pub fn from_script(value: &ScriptValue) -> Result<FrameSpec, ArgError> {
        let ScriptValue::Table(_) = value else {
            return Err(ArgError::expected("table", value));
        };
        let axis = |short: &str, long: &str| -> Option<Dimension> {
            let raw = value.get(short).or_else(|| value.get(long))?;
            match Dimension::from_script(raw) {
                Ok(d) => Some(d),
                Err(e) => {
                    log::warn!("frame: ignoring {long}: {e}");
                    None
                }
            }
        };
        Ok(FrameSpec { width: axis("w", "width"), height: axis("h", "height") })
    }
}

/// Result of [`resolve`]: concrete axes, or `None` where the natural size applies.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedFrame {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ResolvedFrame {
    /// Fill unset axes from `natural`; the result is never negative.
    pub fn or_natural(self, natural: Size) -> Size {
        Size {
            width: self.width.unwrap_or(natural.width),
            height: self.height.unwrap_or(natural.height),
        }
        .clamped()
    }
}

/// Resolve `spec` against the immediate container's size.
///
/// Pure: the same inputs always give the same output. A zero-area container
/// resolves every axis, set or not, to zero.
pub fn resolve(spec: &FrameSpec, container: Size) -> ResolvedFrame {
    let container = container.clamped();
    if container.is_empty() {
        return ResolvedFrame { width: Some(0.0), height: Some(0.0) };
    }
    ResolvedFrame {
        width: spec.width.map(|d| d.resolve(container.width)),
        height: spec.height.map(|d| d.resolve(container.height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size { width: 200.0, height: 100.0 };

    #[test]
    fn percentage_of_width() {
        let spec = FrameSpec::new().with_width(Dimension::Percentage(50.0));
        assert_eq!(resolve(&spec, CONTAINER).width, Some(100.0));
    }

    #[test]
    fn fill_takes_container_axis() {
        let spec = FrameSpec::new().with_width(Dimension::Fill);
        assert_eq!(resolve(&spec, CONTAINER).width, Some(200.0));
        assert_eq!(resolve(&FrameSpec::fill(), CONTAINER).or_natural(Size::ZERO), CONTAINER);
    }

    #[test]
    fn absolute_is_passed_through() {
        let r = resolve(&FrameSpec::fixed(30.0, 400.0), CONTAINER);
        assert_eq!(r, ResolvedFrame { width: Some(30.0), height: Some(400.0) });
    }

    #[test]
    fn negative_absolute_clamps_to_zero() {
        assert_eq!(Dimension::Absolute(-5.0).resolve(100.0), 0.0);
    }

    #[test]
    fn unset_axis_defers_to_natural() {
        let spec = FrameSpec::new().with_height(Dimension::Absolute(10.0));
        let resolved = resolve(&spec, CONTAINER);
        assert_eq!(resolved.width, None);
        assert_eq!(resolved.or_natural(Size::new(42.0, 99.0)), Size::new(42.0, 10.0));
    }

    #[test]
    fn resolve_is_idempotent() {
        let spec = FrameSpec::new()
            .with_width(Dimension::Percentage(33.0))
            .with_height(Dimension::Fill);
        assert_eq!(resolve(&spec, CONTAINER), resolve(&spec, CONTAINER));
    }

    #[test]
    fn zero_container_yields_zero() {
        let spec = FrameSpec::fixed(50.0, 50.0);
        assert_eq!(resolve(&spec, Size::ZERO).or_natural(Size::new(10.0, 10.0)), Size::ZERO);
        let spec = FrameSpec::new().with_width(Dimension::Percentage(50.0));
        assert_eq!(resolve(&spec, Size::new(0.0, 80.0)).or_natural(Size::new(5.0, 5.0)), Size::ZERO);
    }

    #[test]
    fn percentage_clamps() {
        assert_eq!(Dimension::percentage(150.0), Dimension::Percentage(100.0));
        assert_eq!(Dimension::percentage(-3.0), Dimension::Percentage(0.0));
    }

    #[test]
    fn parse_valid_strings() {
        assert_eq!(Dimension::parse("50%"), Ok(Dimension::Percentage(50.0)));
        assert_eq!(Dimension::parse("12.5%"), Ok(Dimension::Percentage(12.5)));
        assert_eq!(Dimension::parse("fill"), Ok(Dimension::Fill));
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        for bad in ["50", "%", "5.%", ".5%", "-5%", "50 %", " 50%", "Fill", "abc", "1e2%"] {
            assert!(Dimension::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn from_script_numbers_and_strings() {
        assert_eq!(Dimension::from_script(&ScriptValue::from(40)), Ok(Dimension::Absolute(40.0)));
        assert_eq!(Dimension::from_script(&ScriptValue::from("100%")), Ok(Dimension::Percentage(100.0)));
        assert_eq!(Dimension::from_script(&ScriptValue::Number(f64::INFINITY)), Err(FrameParseError::NonFinite));
        assert_eq!(Dimension::from_script(&ScriptValue::Bool(true)), Err(FrameParseError::InvalidType("boolean")));
    }

    #[test]
    fn frame_table_with_bad_axis_keeps_the_other() {
        let table = ScriptValue::table([("w", ScriptValue::from("wide")), ("h", ScriptValue::from("25%"))]);
        let spec = FrameSpec::from_script(&table).unwrap();
        assert_eq!(spec.width, None);
        assert_eq!(spec.height, Some(Dimension::Percentage(25.0)));
    }

    #[test]
    fn frame_table_accepts_long_keys() {
        let table = ScriptValue::table([("width", ScriptValue::from(10)), ("height", ScriptValue::from("fill"))]);
        let spec = FrameSpec::from_script(&table).unwrap();
        assert_eq!(spec, FrameSpec::new().with_width(Dimension::Absolute(10.0)).with_height(Dimension::Fill));
    }

    #[test]
    fn frame_from_non_table_is_error() {
        assert!(FrameSpec::from_script(&ScriptValue::from(5)).is_err());
    }
}
