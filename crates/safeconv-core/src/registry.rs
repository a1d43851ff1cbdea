use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::color::{Palette, Rgb, parse_color_with};
use crate::divide::safe_divide;
use crate::error::ConversionError;
use crate::json_file::load_json_map;
use crate::outcome::{Outcome, describe_input, kind_name};
use crate::scalar::{to_bool, to_float, to_int};

type ConvertFn = fn(&Palette, &[Value]) -> Outcome<Value>;

#[derive(Clone, Copy)]
struct Converter {
    arity: usize,
    convert: ConvertFn,
}

/// Named conversions callable by identifier.
///
/// Identifiers resolve through a fixed table; nothing is evaluated.
#[derive(Clone)]
pub struct ConverterRegistry {
    palette: Palette,
    converters: BTreeMap<&'static str, Converter>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("palette", &self.palette)
            .field("converters", &self.names())
            .finish()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl ConverterRegistry {
    pub fn new(palette: Palette) -> Self {
        let mut converters = BTreeMap::new();
        converters.insert("divide", Converter { arity: 2, convert: divide });
        converters.insert("parse_color", Converter { arity: 1, convert: color });
        converters.insert("load_json", Converter { arity: 1, convert: load_json });
        converters.insert("to_int", Converter { arity: 1, convert: int });
        converters.insert("to_float", Converter { arity: 1, convert: float });
        converters.insert("to_bool", Converter { arity: 1, convert: boolean });
        Self {
            palette,
            converters,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Registered identifiers in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.converters.keys().copied().collect()
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.converters.get(name).map(|converter| converter.arity)
    }

    /// Run the converter registered as `name`.
    ///
    /// Unknown names and wrong argument counts fall back to `null`.
    pub fn convert(&self, name: &str, args: &[Value]) -> Outcome<Value> {
        let input = render_call(name, args);
        let Some(converter) = self.converters.get(name) else {
            return Outcome::recover(
                Err(ConversionError::Unexpected(format!(
                    "no converter named '{name}'"
                ))),
                Value::Null,
                input,
            );
        };

        if args.len() != converter.arity {
            return Outcome::recover(
                Err(ConversionError::TypeMismatch(format!(
                    "{name} takes {} argument(s), got {}",
                    converter.arity,
                    args.len()
                ))),
                Value::Null,
                input,
            );
        }

        (converter.convert)(&self.palette, args)
    }
}

fn render_call(name: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(describe_input).collect();
    format!("{name}({})", rendered.join(", "))
}

fn divide(_: &Palette, args: &[Value]) -> Outcome<Value> {
    safe_divide(&args[0], &args[1]).map(Value::from)
}

fn color(palette: &Palette, args: &[Value]) -> Outcome<Value> {
    parse_color_with(palette, &args[0]).map(rgb_value)
}

fn load_json(_: &Palette, args: &[Value]) -> Outcome<Value> {
    match &args[0] {
        Value::String(path) => load_json_map(path).map(Value::Object),
        other => Outcome::recover(
            Err(ConversionError::TypeMismatch(format!(
                "path must be a string, got {}",
                kind_name(other)
            ))),
            Value::Object(Map::new()),
            describe_input(other),
        ),
    }
}

fn int(_: &Palette, args: &[Value]) -> Outcome<Value> {
    to_int(&args[0]).map(Value::from)
}

fn float(_: &Palette, args: &[Value]) -> Outcome<Value> {
    to_float(&args[0]).map(Value::from)
}

fn boolean(_: &Palette, args: &[Value]) -> Outcome<Value> {
    to_bool(&args[0]).map(Value::from)
}

fn rgb_value(rgb: Rgb) -> Value {
    json!({ "r": rgb.r, "g": rgb.g, "b": rgb.b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureCategory;

    #[test]
    fn lists_converters_sorted() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry.names(),
            vec!["divide", "load_json", "parse_color", "to_bool", "to_float", "to_int"]
        );
        assert_eq!(registry.arity("divide"), Some(2));
        assert_eq!(registry.arity("eval"), None);
    }

    #[test]
    fn dispatches_by_name() {
        let registry = ConverterRegistry::default();

        let outcome = registry.convert("divide", &[json!(9), json!(3)]);
        assert!(outcome.is_success());
        assert_eq!(outcome.value, json!(3.0));

        let outcome = registry.convert("parse_color", &[json!("#FF0000")]);
        assert_eq!(outcome.value, json!({"r": 255, "g": 0, "b": 0}));

        let outcome = registry.convert("to_int", &[json!("12")]);
        assert_eq!(outcome.value, json!(12));
    }

    #[test]
    fn unknown_name_is_unexpected() {
        let registry = ConverterRegistry::default();
        let outcome = registry.convert("__import__('os')", &[json!(1)]);
        assert_eq!(outcome.value, Value::Null);
        assert_eq!(outcome.category(), Some(FailureCategory::Unexpected));
    }

    #[test]
    fn wrong_arity_is_type_mismatch() {
        let registry = ConverterRegistry::default();
        let outcome = registry.convert("divide", &[json!(1)]);
        assert_eq!(outcome.value, Value::Null);
        assert_eq!(outcome.category(), Some(FailureCategory::TypeMismatch));
        let diagnostic = outcome.diagnostic.expect("diagnostic");
        assert_eq!(diagnostic.input, "divide(1)");
    }

    #[test]
    fn load_json_requires_string_path() {
        let registry = ConverterRegistry::default();
        let outcome = registry.convert("load_json", &[json!(7)]);
        assert_eq!(outcome.value, json!({}));
        assert_eq!(outcome.category(), Some(FailureCategory::TypeMismatch));
    }

    #[test]
    fn uses_registry_palette() {
        let mut palette = Palette::default();
        palette.insert("brand", Rgb::new(1, 2, 3));
        let registry = ConverterRegistry::new(palette);
        let outcome = registry.convert("parse_color", &[json!("BRAND")]);
        assert_eq!(outcome.value, json!({"r": 1, "g": 2, "b": 3}));
    }
}
