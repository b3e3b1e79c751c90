//! Values crossing the script/native boundary and their normalization.
//!
//! The scripting runtime marshals every argument into a [`ScriptValue`].
//! Arguments that may arrive either as a literal or as a reference to a
//! reactive box are normalized here, once, into typed values (see
//! [`FromScript`]) so that element code never inspects argument shape.

use std::collections::BTreeMap;
use std::fmt;

use crate::callback::Callback;
use crate::color::{Color, ColorParseError};
use crate::element::image::{AspectMode, ImageSource};
use crate::element::style::{Font, FontWeight};
use crate::geometry::{non_negative, EdgeInsets, Rect};
use crate::reactive::{Source, ValueBox};

/// Error produced when an argument has the wrong shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgError {
    #[error("expected {expected}, got {found}")]
    Expected { expected: &'static str, found: &'static str },
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error("unknown aspect mode {0:?}: expected \"fit\" or \"fill\"")]
    AspectMode(String),
    #[error("unknown font weight {0:?}")]
    FontWeight(String),
}

impl ArgError {
    pub fn expected(expected: &'static str, found: &ScriptValue) -> Self {
        ArgError::Expected { expected, found: found.type_name() }
    }
}

// ---------------------------------------------------------------------------
// ScriptValue
// ---------------------------------------------------------------------------

/// A value handed over by the scripting runtime.
#[derive(Clone, Debug)]
pub enum ScriptValue {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ScriptValue>),
    Table(BTreeMap<String, ScriptValue>),
    /// A reactive color box created by the host.
    Color(ValueBox<Color>),
    /// A reactive text box created by the host.
    Text(ValueBox<String>),
    /// A reactive image box created by the host.
    Image(ValueBox<ImageSource>),
    Callback(Callback),
}

impl ScriptValue {
    /// Build a table from key/value pairs.
    pub fn table<K: Into<String>>(entries: impl IntoIterator<Item = (K, ScriptValue)>) -> ScriptValue {
        ScriptValue::Table(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Human-readable type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Nil => "nil",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::List(_) => "list",
            ScriptValue::Table(_) => "table",
            ScriptValue::Color(_) => "color box",
            ScriptValue::Text(_) => "text box",
            ScriptValue::Image(_) => "image box",
            ScriptValue::Callback(_) => "function",
        }
    }

    /// Look up a key in a table. Non-tables have no keys.
    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        match self {
            ScriptValue::Table(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, ScriptValue::Nil)
    }
}

impl From<bool> for ScriptValue {
    fn from(v: bool) -> Self {
        ScriptValue::Bool(v)
    }
}

impl From<f64> for ScriptValue {
    fn from(v: f64) -> Self {
        ScriptValue::Number(v)
    }
}

impl From<f32> for ScriptValue {
    fn from(v: f32) -> Self {
        ScriptValue::Number(v as f64)
    }
}

impl From<i32> for ScriptValue {
    fn from(v: i32) -> Self {
        ScriptValue::Number(v as f64)
    }
}

impl From<i64> for ScriptValue {
    fn from(v: i64) -> Self {
        ScriptValue::Number(v as f64)
    }
}

impl From<usize> for ScriptValue {
    fn from(v: usize) -> Self {
        ScriptValue::Number(v as f64)
    }
}

impl From<&str> for ScriptValue {
    fn from(v: &str) -> Self {
        ScriptValue::String(v.to_owned())
    }
}

impl From<String> for ScriptValue {
    fn from(v: String) -> Self {
        ScriptValue::String(v)
    }
}

impl From<Vec<ScriptValue>> for ScriptValue {
    fn from(v: Vec<ScriptValue>) -> Self {
        ScriptValue::List(v)
    }
}

impl From<ValueBox<Color>> for ScriptValue {
    fn from(v: ValueBox<Color>) -> Self {
        ScriptValue::Color(v)
    }
}

impl From<ValueBox<String>> for ScriptValue {
    fn from(v: ValueBox<String>) -> Self {
        ScriptValue::Text(v)
    }
}

impl From<ValueBox<ImageSource>> for ScriptValue {
    fn from(v: ValueBox<ImageSource>) -> Self {
        ScriptValue::Image(v)
    }
}

impl From<Callback> for ScriptValue {
    fn from(v: Callback) -> Self {
        ScriptValue::Callback(v)
    }
}

/// Geometry tables: `{x, y, w, h}`.
impl From<Rect> for ScriptValue {
    fn from(r: Rect) -> Self {
        ScriptValue::table([
            ("x", ScriptValue::from(r.x)),
            ("y", ScriptValue::from(r.y)),
            ("w", ScriptValue::from(r.width)),
            ("h", ScriptValue::from(r.height)),
        ])
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Nil => write!(f, "nil"),
            ScriptValue::Bool(b) => write!(f, "{b}"),
            ScriptValue::Number(n) => write!(f, "{}", format_number(*n)),
            ScriptValue::String(s) => write!(f, "{s}"),
            other => write!(f, "<{}>", other.type_name()),
        }
    }
}

/// Integral numbers print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Conversion from a script argument into a typed value.
pub trait FromScript: Sized {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError>;
}

impl FromScript for Source<Color> {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::String(s) => Ok(Source::Literal(Color::parse(s)?)),
            ScriptValue::Color(b) => Ok(Source::Reactive(b.clone())),
            ScriptValue::Table(_) => {
                let channel = |k: &str, default: f64| value.get(k).and_then(ScriptValue::as_f64).unwrap_or(default);
                Ok(Source::Literal(Color::from_unit(
                    channel("red", 0.0),
                    channel("green", 0.0),
                    channel("blue", 0.0),
                    channel("alpha", 1.0),
                )))
            }
            other => Err(ArgError::expected("color", other)),
        }
    }
}

impl FromScript for Source<String> {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::String(s) => Ok(Source::Literal(s.clone())),
            ScriptValue::Number(_) | ScriptValue::Bool(_) => Ok(Source::Literal(value.to_string())),
            ScriptValue::Text(b) => Ok(Source::Reactive(b.clone())),
            other => Err(ArgError::expected("text", other)),
        }
    }
}

impl FromScript for Source<ImageSource> {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::String(path) => Ok(Source::Literal(ImageSource::file(path))),
            ScriptValue::Image(b) => Ok(Source::Reactive(b.clone())),
            ScriptValue::Table(_) => match value.get("named").and_then(ScriptValue::as_str) {
                Some(name) => Ok(Source::Literal(ImageSource::Named(name.to_owned()))),
                None => Err(ArgError::expected("image path or {named = ...}", value)),
            },
            other => Err(ArgError::expected("image", other)),
        }
    }
}

impl FromScript for Font {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::Number(size) => Ok(Font::default().with_size(*size as f32)),
            ScriptValue::String(name) => Ok(Font::default().with_name(name.clone())),
            ScriptValue::Table(_) => {
                let mut font = Font::default();
                if let Some(name) = value.get("name").and_then(ScriptValue::as_str) {
                    font = font.with_name(name);
                }
                if let Some(size) = value.get("size").and_then(ScriptValue::as_f64) {
                    font = font.with_size(size as f32);
                }
                if let Some(weight) = value.get("weight") {
                    font.weight = FontWeight::from_script(weight)?;
                }
                Ok(font)
            }
            other => Err(ArgError::expected("font", other)),
        }
    }
}

impl FromScript for FontWeight {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::String(s) => match s.as_str() {
                "regular" | "normal" => Ok(FontWeight::Regular),
                "medium" => Ok(FontWeight::Medium),
                "bold" => Ok(FontWeight::Bold),
                _ => Err(ArgError::FontWeight(s.clone())),
            },
            ScriptValue::Number(n) if *n >= 600.0 => Ok(FontWeight::Bold),
            ScriptValue::Number(n) if *n >= 500.0 => Ok(FontWeight::Medium),
            ScriptValue::Number(_) => Ok(FontWeight::Regular),
            other => Err(ArgError::expected("font weight", other)),
        }
    }
}

impl FromScript for EdgeInsets {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::Number(n) => Ok(EdgeInsets::all(non_negative(*n as f32))),
            ScriptValue::Table(_) => {
                let edge = |k: &str| non_negative(value.get(k).and_then(ScriptValue::as_f64).unwrap_or(0.0) as f32);
                Ok(EdgeInsets::new(edge("top"), edge("right"), edge("bottom"), edge("left")))
            }
            other => Err(ArgError::expected("number or {top,left,bottom,right}", other)),
        }
    }
}

impl FromScript for AspectMode {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value.as_str() {
            Some("fit") => Ok(AspectMode::Fit),
            Some("fill") => Ok(AspectMode::Fill),
            Some(other) => Err(ArgError::AspectMode(other.to_owned())),
            None => Err(ArgError::expected("\"fit\" or \"fill\"", value)),
        }
    }
}

/// Surface geometry from a `{x, y, w, h}` table (`width`/`height` also accepted).
///
/// Missing fields default to zero with a warning; negative sizes clamp to zero.
impl FromScript for Rect {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        if !matches!(value, ScriptValue::Table(_)) {
            return Err(ArgError::expected("geometry table {x,y,w,h}", value));
        }
        let field = |short: &str, long: &str| -> f32 {
            match value.get(short).or_else(|| value.get(long)).and_then(ScriptValue::as_f64) {
                Some(n) if n.is_finite() => n as f32,
                _ => {
                    log::warn!("geometry: missing or non-numeric field {short:?}, using 0");
                    0.0
                }
            }
        };
        Ok(Rect::new(
            field("x", "x"),
            field("y", "y"),
            non_negative(field("w", "width")),
            non_negative(field("h", "height")),
        ))
    }
}

impl FromScript for Callback {
    fn from_script(value: &ScriptValue) -> Result<Self, ArgError> {
        match value {
            ScriptValue::Callback(cb) => Ok(cb.clone()),
            other => Err(ArgError::expected("function", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(ScriptValue::Nil.type_name(), "nil");
        assert_eq!(ScriptValue::from(1).type_name(), "number");
        assert_eq!(ScriptValue::from("x").type_name(), "string");
        assert_eq!(ScriptValue::table::<&str>([]).type_name(), "table");
    }

    #[test]
    fn display_numbers() {
        assert_eq!(ScriptValue::from(3).to_string(), "3");
        assert_eq!(ScriptValue::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn color_literal_and_reactive() {
        let lit = Source::<Color>::from_script(&"#FF0000".into()).unwrap();
        assert!(matches!(lit, Source::Literal(c) if c == Color::RED));

        let b = ValueBox::new(Color::BLUE);
        let reactive = Source::<Color>::from_script(&b.clone().into()).unwrap();
        match reactive {
            Source::Reactive(r) => assert_eq!(r.id(), b.id()),
            Source::Literal(_) => panic!("expected reactive"),
        }
    }

    #[test]
    fn color_from_unit_table() {
        let table = ScriptValue::table([
            ("red", ScriptValue::from(1.0)),
            ("green", ScriptValue::from(0.0)),
            ("blue", ScriptValue::from(0.0)),
        ]);
        let src = Source::<Color>::from_script(&table).unwrap();
        assert_eq!(src.current(), Color::RED);
    }

    #[test]
    fn color_errors() {
        assert!(matches!(
            Source::<Color>::from_script(&"nope".into()),
            Err(ArgError::Color(ColorParseError::UnknownName(_)))
        ));
        assert_eq!(
            Source::<Color>::from_script(&ScriptValue::from(3)).unwrap_err(),
            ArgError::Expected { expected: "color", found: "number" }
        );
    }

    #[test]
    fn text_accepts_numbers() {
        let src = Source::<String>::from_script(&ScriptValue::from(42)).unwrap();
        assert_eq!(src.current(), "42");
    }

    #[test]
    fn image_path_and_named() {
        let src = Source::<ImageSource>::from_script(&"/tmp/a.png".into()).unwrap();
        assert_eq!(src.current(), ImageSource::file("/tmp/a.png"));
        let named = ScriptValue::table([("named", ScriptValue::from("caution"))]);
        let src = Source::<ImageSource>::from_script(&named).unwrap();
        assert_eq!(src.current(), ImageSource::Named("caution".into()));
    }

    #[test]
    fn font_forms() {
        assert_eq!(Font::from_script(&ScriptValue::from(20)).unwrap().size, 20.0);
        assert_eq!(Font::from_script(&"Menlo".into()).unwrap().name.as_deref(), Some("Menlo"));
        let table = ScriptValue::table([("size", ScriptValue::from(9)), ("weight", ScriptValue::from("bold"))]);
        let font = Font::from_script(&table).unwrap();
        assert_eq!(font.size, 9.0);
        assert_eq!(font.weight, FontWeight::Bold);
    }

    #[test]
    fn padding_forms() {
        assert_eq!(EdgeInsets::from_script(&ScriptValue::from(4)).unwrap(), EdgeInsets::all(4.0));
        let table = ScriptValue::table([("top", ScriptValue::from(1)), ("left", ScriptValue::from(2))]);
        assert_eq!(EdgeInsets::from_script(&table).unwrap(), EdgeInsets::new(1.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn aspect_mode_strings() {
        assert_eq!(AspectMode::from_script(&"fit".into()), Ok(AspectMode::Fit));
        assert_eq!(AspectMode::from_script(&"fill".into()), Ok(AspectMode::Fill));
        assert_eq!(AspectMode::from_script(&"stretch".into()), Err(ArgError::AspectMode("stretch".into())));
    }

    #[test]
    fn geometry_table() {
        let rect = Rect::from_script(&Rect::new(1.0, 2.0, 300.0, 200.0).into()).unwrap();
        assert_eq!(rect, Rect::new(1.0, 2.0, 300.0, 200.0));
        let partial = ScriptValue::table([("width", ScriptValue::from(10)), ("h", ScriptValue::from(-5))]);
        assert_eq!(Rect::from_script(&partial).unwrap(), Rect::new(0.0, 0.0, 10.0, 0.0));
    }
}
