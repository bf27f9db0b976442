//! Python display conventions for values.
//!
//! `repr` quotes strings; `to_str` is `str()`, which leaves a top-level
//! string as is. Elements of a list always use `repr`.

use pyx_ir::StringInterner;

use super::Value;
use crate::heap::ObjectStore;
use crate::numeric::Complex;

/// `repr(x)` for a float.
///
/// Magnitudes of at least 1e16 or below 1e-4 use scientific notation with
/// a signed, two-digit exponent. Otherwise whole numbers keep a `.0`.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-4..1e16).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            text + ".0"
        }
    } else {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => text,
        }
    }
}

/// A float part of a complex number: like `float_repr` without `.0`.
fn complex_part(value: f64) -> String {
    let text = float_repr(value);
    match text.strip_suffix(".0") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// `repr(z)`: `2j` when the real part is +0, otherwise `(3+0j)`.
pub fn complex_repr(value: Complex) -> String {
    let imag = complex_part(value.im);
    if value.re == 0.0 && value.re.is_sign_positive() {
        return format!("{imag}j");
    }
    let sign = if imag.starts_with('-') { "" } else { "+" };
    format!("({}{sign}{imag}j)", complex_part(value.re))
}

/// `repr(s)`: single quotes unless the text contains one and no double
/// quote.
pub fn string_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// `repr(x)`.
pub fn repr(value: &Value, objects: &ObjectStore, interner: &StringInterner) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => float_repr(*f),
        Value::Complex(c) => complex_repr(*c),
        Value::Str(s) => string_repr(s),
        Value::Closure(id) => match objects.closure(*id) {
            Some(closure) => format!("<function {}>", closure.display_name(interner)),
            None => "<function>".to_string(),
        },
        Value::List(id) => {
            let items: Vec<String> = objects
                .list(*id)
                .unwrap_or_default()
                .iter()
                .map(|item| repr(item, objects, interner))
                .collect();
            format!("[{}]", items.join(", "))
        }
        Value::Builtin(builtin) => format!("<built-in function {}>", builtin.name),
        Value::Error(err) => format!("Error: {}", err.message),
    }
}

/// `str(x)`.
pub fn to_str(value: &Value, objects: &ObjectStore, interner: &StringInterner) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        other => repr(other, objects, interner),
    }
}
