//! Value Formatting - Raw Values to Display Strings
//!
//! Formatting never fails. When a rule cannot be applied the stringified raw
//! value is used and the result is marked [`Formatted::Degraded`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::templates::{Annotation, CaseTransform, FieldType, NumberStyle};
use crate::value::{is_blank, is_truthy, parse_float, stringify};

pub const CHECKMARK: &str = "✓";
pub const SSN_PATTERN: &str = "###-##-####";
const DEFAULT_PRECISION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Ok(String),
    Degraded { display: String, reason: String },
}

impl Formatted {
    pub fn display(&self) -> &str {
        match self {
            Formatted::Ok(display) | Formatted::Degraded { display, .. } => display,
        }
    }

    pub fn into_display(self) -> String {
        match self {
            Formatted::Ok(display) | Formatted::Degraded { display, .. } => display,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Formatted::Degraded { .. })
    }
}

/// Format a raw value for display according to the annotation's type and
/// format rules. Degraded results are logged.
pub fn format_value(raw: Option<&Value>, annotation: &Annotation) -> Formatted {
    let result = match raw {
        Some(value) if !is_blank(raw) => format_present(value, annotation),
        _ => Formatted::Ok(String::new()),
    };
    if let Formatted::Degraded { reason, .. } = &result {
        tracing::warn!(field_id = %annotation.field_id, %reason, "formatting fell back to raw value");
    }
    result
}

fn format_present(value: &Value, annotation: &Annotation) -> Formatted {
    let rules = annotation.format_rules.as_ref();
    let plain = stringify(value);

    match annotation.field_type {
        FieldType::Ssn => {
            let pattern = rules.and_then(|r| r.pattern.as_deref());
            if pattern == Some(SSN_PATTERN) && plain.chars().count() == 9 {
                Formatted::Ok(dash_ssn(&plain))
            } else {
                Formatted::Ok(plain)
            }
        }
        FieldType::Currency => {
            if rules.and_then(|r| r.number_style) != Some(NumberStyle::Currency) {
                return Formatted::Ok(plain);
            }
            with_number(value, plain, |n| format!("${}", group_fixed(n.abs(), 2)).with_sign(n))
        }
        FieldType::Number => {
            let style = match rules.and_then(|r| r.number_style) {
                Some(NumberStyle::Currency) | None => return Formatted::Ok(plain),
                Some(style) => style,
            };
            // A zero precision reads as unset.
            let precision = rules
                .and_then(|r| r.precision)
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PRECISION);
            with_number(value, plain, |n| match style {
                NumberStyle::Percentage => {
                    format!("{}%", group_fixed(n.abs(), precision)).with_sign(n)
                }
                NumberStyle::Integer => format!("{:.0}", round_half_up(n)),
                _ => group_fixed(n.abs(), precision).with_sign(n),
            })
        }
        FieldType::Date => {
            let Some(pattern) = rules.and_then(|r| r.pattern.as_deref()) else {
                return Formatted::Ok(plain);
            };
            let layout = match pattern {
                "MM/DD/YYYY" => "%-m/%-d/%Y",
                "YYYY-MM-DD" => "%Y-%m-%d",
                _ => return Formatted::Ok(plain),
            };
            match parse_date(value) {
                Some(date) => Formatted::Ok(date.format(layout).to_string()),
                None => Formatted::Degraded {
                    reason: format!("unparseable date: {}", plain),
                    display: plain,
                },
            }
        }
        FieldType::Checkbox => Formatted::Ok(checkbox_mark(value).to_string()),
        FieldType::Text | FieldType::Other => {
            let mut text = match rules.and_then(|r| r.case) {
                Some(CaseTransform::Uppercase) => plain.to_uppercase(),
                Some(CaseTransform::Lowercase) => plain.to_lowercase(),
                Some(CaseTransform::Titlecase) => title_case(&plain),
                None => plain,
            };
            if let Some(max) = rules.and_then(|r| r.max_length) {
                if let Some((cut, _)) = text.char_indices().nth(max) {
                    text.truncate(cut);
                }
            }
            Formatted::Ok(text)
        }
    }
}

fn with_number(value: &Value, plain: String, render: impl FnOnce(f64) -> String) -> Formatted {
    match parse_float(value) {
        Some(n) if n.is_finite() => Formatted::Ok(render(n)),
        Some(_) => Formatted::Degraded {
            reason: format!("non-finite number: {}", plain),
            display: plain,
        },
        None => Formatted::Degraded {
            reason: format!("not a number: {}", plain),
            display: plain,
        },
    }
}

trait WithSign {
    fn with_sign(self, n: f64) -> String;
}

impl WithSign for String {
    fn with_sign(self, n: f64) -> String {
        if n < 0.0 {
            format!("-{}", self)
        } else {
            self
        }
    }
}

/// Nearest integer, ties toward positive infinity.
fn round_half_up(n: f64) -> f64 {
    let r = n.round();
    let r = if n - r == 0.5 { r + 1.0 } else { r };
    // Normalise -0 so it renders as "0".
    r + 0.0
}

/// Round the shortest decimal form of a non-negative number to `decimals`
/// places, ties away from zero. Returns integer and fraction digits.
fn round_decimal(n: f64, decimals: usize) -> (Vec<u8>, Vec<u8>) {
    let shortest = n.to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    let mut int_digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let mut frac_digits: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();

    let round_up = frac_digits.get(decimals).map_or(false, |d| *d >= 5);
    frac_digits.resize(decimals, 0);
    if round_up {
        let mut carry = true;
        for d in frac_digits.iter_mut().rev().chain(int_digits.iter_mut().rev()) {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            int_digits.insert(0, 1);
        }
    }
    (int_digits, frac_digits)
}

/// Fixed-point rendering of a non-negative number with `,` thousands
/// separators.
fn group_fixed(n: f64, decimals: usize) -> String {
    let (int_digits, frac_digits) = round_decimal(n, decimals);
    let mut grouped = String::with_capacity(int_digits.len() + int_digits.len() / 3 + decimals + 1);
    for (i, d) in int_digits.iter().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(b'0' + d));
    }
    if !frac_digits.is_empty() {
        grouped.push('.');
        grouped.extend(frac_digits.iter().map(|d| char::from(b'0' + d)));
    }
    grouped
}

fn dash_ssn(plain: &str) -> String {
    let chars: Vec<char> = plain.chars().collect();
    let area: String = chars[..3].iter().collect();
    let group: String = chars[3..5].iter().collect();
    let serial: String = chars[5..].iter().collect();
    format!("{}-{}-{}", area, group, serial)
}

fn checkbox_mark(value: &Value) -> &'static str {
    match value {
        Value::Bool(true) => CHECKMARK,
        Value::Bool(false) => "",
        Value::String(s) => match s.as_str() {
            "true" | "X" | "Yes" | "1" | CHECKMARK => CHECKMARK,
            "false" | "" | "No" | "0" => "",
            _ => CHECKMARK,
        },
        other if is_truthy(other) => CHECKMARK,
        _ => "",
    }
}

/// Capitalise the first character of each whitespace-delimited token and
/// lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_start = true;
            out.push(c);
        } else if at_start {
            at_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            DateTime::<Utc>::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
        }
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc).date_naive())
                })
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                        .ok()
                        .map(|dt| dt.date())
                })
                .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
        }
        _ => None,
    }
}
