//! printf-style number formatting for chart annotations and table cells.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^%(?P<flags>[-+0]*)(?P<width>\d+)?(?:\.(?P<precision>\d+))?(?P<conv>[fFeEdgs])$")
        .expect("format regex is valid")
});

/// Errors that can occur while parsing a format string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The format string is not a supported printf conversion.
    #[error("Invalid number format: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Fixed,
    Exponent,
    Integer,
    General,
    Shortest,
}

/// A parsed printf-style conversion such as `%.2f`, `%8.3e` or `%d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    conversion: Conversion,
    precision: Option<usize>,
    width: usize,
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    spec: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        // "%.2f"
        Self {
            conversion: Conversion::Fixed,
            precision: Some(2),
            width: 0,
            left_align: false,
            zero_pad: false,
            plus_sign: false,
            spec: "%.2f".to_string(),
        }
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = FORMAT_RE
            .captures(s)
            .ok_or_else(|| FormatError::Invalid(s.to_string()))?;
        let flags = caps.name("flags").map_or("", |m| m.as_str());
        let width = caps
            .name("width")
            .map_or(Ok(0), |m| m.as_str().parse())
            .map_err(|_| FormatError::Invalid(s.to_string()))?;
        let precision = caps
            .name("precision")
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| FormatError::Invalid(s.to_string()))?;
        let conversion = match &caps["conv"] {
            "f" | "F" => Conversion::Fixed,
            "e" | "E" => Conversion::Exponent,
            "d" => Conversion::Integer,
            "g" => Conversion::General,
            _ => Conversion::Shortest,
        };

        Ok(Self {
            conversion,
            precision,
            width,
            left_align: flags.contains('-'),
            zero_pad: flags.contains('0'),
            plus_sign: flags.contains('+'),
            spec: s.to_string(),
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

impl NumberFormat {
    /// Format a value.
    pub fn format(&self, value: f64) -> String {
        let body = match self.conversion {
            Conversion::Fixed => format!("{:.*}", self.precision.unwrap_or(6), value),
            Conversion::Exponent => format_exponent(value, self.precision.unwrap_or(6)),
            Conversion::Integer => format!("{}", value.trunc() as i64),
            Conversion::General => format_general(value, self.precision.unwrap_or(6)),
            Conversion::Shortest => {
                let text = format_shortest(value);
                match self.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                }
            }
        };
        let body = if self.plus_sign && value >= 0.0 {
            format!("+{body}")
        } else {
            body
        };

        let pad = self.width.saturating_sub(body.chars().count());
        if pad == 0 {
            body
        } else if self.left_align {
            format!("{body}{}", " ".repeat(pad))
        } else if self.zero_pad {
            match body.strip_prefix('-').or_else(|| body.strip_prefix('+')) {
                Some(digits) => format!("{}{}{digits}", &body[..1], "0".repeat(pad)),
                None => format!("{}{body}", "0".repeat(pad)),
            }
        } else {
            format!("{}{body}", " ".repeat(pad))
        }
    }
}

/// Split Rust's `1.5e-3` exponent notation into mantissa and exponent.
fn split_exponent(text: &str) -> (&str, i32) {
    match text.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

/// C-style exponent suffix with a sign and at least two digits: `e+03`.
fn exponent_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{sign}{:02}", exp.unsigned_abs())
}

/// C-style exponent form: `1.50e+03`.
fn format_exponent(value: f64, precision: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let rust = format!("{:.*e}", precision, value);
    let (mantissa, exp) = split_exponent(&rust);
    format!("{mantissa}{}", exponent_suffix(exp))
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("nan".to_string())
    } else if value.is_infinite() {
        Some(if value < 0.0 { "-inf" } else { "inf" }.to_string())
    } else {
        None
    }
}

/// `%g`: `precision` significant digits, exponent form when the exponent is
/// below -4 or at least the precision, trailing zeros removed.
fn format_general(value: f64, precision: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let precision = precision.max(1);
    let rounded = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = split_exponent(&rounded);
    if exp < -4 || exp >= precision as i32 {
        format!("{}{}", trim_fraction(mantissa), exponent_suffix(exp))
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// `%s`: shortest round-trip digits, always with a fraction or an exponent
/// (`7.0`, `0.001`, `1e+16`, `1.5e-05`).
fn format_shortest(value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let shortest = format!("{value:e}");
    let (mantissa, exp) = split_exponent(&shortest);
    if (-4..16).contains(&exp) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        format!("{mantissa}{}", exponent_suffix(exp))
    }
}
