use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConversionError, Result};
use crate::outcome::{Outcome, describe_input, kind_name};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Fallback returned for descriptors that cannot be parsed.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

const BASIC_COLORS: [(&str, Rgb); 16] = [
    ("black", Rgb::new(0, 0, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("gray", Rgb::new(128, 128, 128)),
    ("white", Rgb::new(255, 255, 255)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("red", Rgb::new(255, 0, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("green", Rgb::new(0, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("navy", Rgb::new(0, 0, 128)),
    ("blue", Rgb::new(0, 0, 255)),
    ("teal", Rgb::new(0, 128, 128)),
    ("aqua", Rgb::new(0, 255, 255)),
];

/// Lookup table from lowercase color names to values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    named: BTreeMap<String, Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        let named = BASIC_COLORS
            .iter()
            .map(|(name, rgb)| (name.to_string(), *rgb))
            .collect();
        Self { named }
    }
}

impl Palette {
    /// Palette with no named colors; only hex, `rgb()` and numeric forms parse.
    pub fn empty() -> Self {
        Self {
            named: BTreeMap::new(),
        }
    }

    /// Add or replace a named color. Names are matched case-insensitively.
    pub fn insert(&mut self, name: &str, rgb: Rgb) {
        self.named.insert(name.trim().to_lowercase(), rgb);
    }

    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.named.get(&name.trim().to_lowercase()).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}

/// Parse a color descriptor with the basic named colors.
pub fn parse_color(descriptor: &Value) -> Outcome<Rgb> {
    parse_color_with(&Palette::default(), descriptor)
}

/// Parse a color descriptor, resolving names through `palette`.
///
/// Out-of-range channels are clamped to `0..=255`. Anything that cannot be
/// read as a color yields black with an `unexpected_error` diagnostic.
pub fn parse_color_with(palette: &Palette, descriptor: &Value) -> Outcome<Rgb> {
    Outcome::recover(
        resolve(palette, descriptor),
        Rgb::BLACK,
        describe_input(descriptor),
    )
}

fn resolve(palette: &Palette, descriptor: &Value) -> Result<Rgb> {
    match descriptor {
        Value::String(text) => resolve_text(palette, text),
        Value::Array(items) => {
            let [r, g, b] = items.as_slice() else {
                return Err(unrecognized(format!(
                    "expected 3 channels, got {}",
                    items.len()
                )));
            };
            Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
        }
        Value::Object(fields) => {
            let field = |key: &str| {
                fields
                    .get(key)
                    .ok_or_else(|| unrecognized(format!("missing channel '{key}'")))
                    .and_then(channel)
            };
            Ok(Rgb::new(field("r")?, field("g")?, field("b")?))
        }
        other => Err(unrecognized(format!(
            "{} is not a color descriptor",
            kind_name(other)
        ))),
    }
}

fn resolve_text(palette: &Palette, text: &str) -> Result<Rgb> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = text.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args);
    }
    palette
        .get(text)
        .ok_or_else(|| unrecognized(format!("unknown color name '{text}'")))
}

fn parse_hex(hex: &str) -> Result<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(unrecognized(format!("'#{hex}' is not hexadecimal")));
    }
    // Every char is an ASCII hex digit here.
    match hex.len() {
        6 => Ok(Rgb::new(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
        )),
        3 => {
            let short = |idx: usize| hex_byte(&hex[idx..idx + 1]).map(|nibble| nibble * 17);
            Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
        }
        len => Err(unrecognized(format!(
            "'#{hex}' has {len} hex digits, expected 3 or 6"
        ))),
    }
}

fn hex_byte(digits: &str) -> Result<u8> {
    u8::from_str_radix(digits, 16).map_err(|err| unrecognized(format!("'{digits}': {err}")))
}

fn parse_functional(args: &str) -> Result<Rgb> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(unrecognized(format!("rgb() takes 3 channels, got {}", parts.len())));
    };
    let parse = |part: &str| {
        part.parse::<f64>()
            .map_err(|_| unrecognized(format!("'{part}' is not a number")))
            .and_then(clamp_channel)
    };
    Ok(Rgb::new(parse(*r)?, parse(*g)?, parse(*b)?))
}

fn channel(value: &Value) -> Result<u8> {
    match value.as_f64() {
        Some(number) => clamp_channel(number),
        None => Err(unrecognized(format!(
            "channel must be a number, got {}",
            kind_name(value)
        ))),
    }
}

fn clamp_channel(number: f64) -> Result<u8> {
    if number.is_nan() {
        return Err(unrecognized("channel is NaN".to_string()));
    }
    Ok(number.round().clamp(0.0, 255.0) as u8)
}

fn unrecognized(detail: String) -> ConversionError {
    ConversionError::Unexpected(format!("unparseable color: {detail}"))
}
