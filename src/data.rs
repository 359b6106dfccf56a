//! Cell values, column types, and the parsing rules that turn raw CSV text
//! into typed trip-record cells.
//!
//! Missing cells are represented as `None` throughout the crate; a raw field
//! is missing when it is empty or one of [`MISSING_TOKENS`].

use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIMESTAMP_FRACTION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Field contents treated as missing on load, compared after trimming.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => (if *b { "True" } else { "False" }).to_string(),
            Value::DateTime(dt) if dt.nanosecond() != 0 => {
                dt.format(TIMESTAMP_FRACTION_FORMAT).to_string()
            }
            Value::DateTime(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Exact identity of the value, used to detect duplicate rows.
    pub fn key(&self) -> ValueKey<'_> {
        match self {
            Value::String(s) => ValueKey::Text(s),
            Value::Integer(i) => ValueKey::Integer(*i),
            // -0.0 and 0.0 compare equal, so they share a key
            Value::Float(f) => {
                let normalized = if *f == 0.0 { 0.0 } else { *f };
                ValueKey::Float(normalized.to_bits())
            }
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::String(_) => ColumnType::String,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::DateTime(_) => ColumnType::DateTime,
        }
    }

    /// Converts the value into the representation used by a column of `target`
    /// type. Only widening conversions produced by [`ColumnType::unify`] are
    /// meaningful; anything else is re-rendered as text.
    pub fn cast(self, target: &ColumnType) -> Value {
        match (self, target) {
            (Value::Integer(i), ColumnType::Float) => Value::Float(i as f64),
            (value, ColumnType::String) => match value {
                Value::String(s) => Value::String(s),
                other => Value::String(other.as_display()),
            },
            (value, _) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Text(&'a str),
    Integer(i64),
    Float(u64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Common type for cells of `self` and `other` held in one column.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                ColumnType::Float
            }
            _ => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Spellings such as `NAN` that parse as a float NaN without being listed in
/// [`MISSING_TOKENS`]. Numeric columns hold them as missing.
fn is_nan_literal(trimmed: &str) -> bool {
    trimmed.parse::<f64>().is_ok_and(f64::is_nan)
}

fn parse_boolean_token(value: &str) -> Option<bool> {
    match value {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct TypeCandidate {
    non_missing: usize,
    boolean_matches: usize,
    integer_matches: usize,
    float_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if is_nan_literal(trimmed) {
            return;
        }
        self.non_missing += 1;
        if parse_boolean_token(trimmed).is_some() {
            self.boolean_matches += 1;
        }
        if trimmed.parse::<i64>().is_ok() {
            self.integer_matches += 1;
        }
        if trimmed.parse::<f64>().is_ok() {
            self.float_matches += 1;
        }
    }

    fn decide(&self) -> ColumnType {
        if self.non_missing == 0 {
            ColumnType::String
        } else if self.boolean_matches == self.non_missing {
            ColumnType::Boolean
        } else if self.integer_matches == self.non_missing {
            ColumnType::Integer
        } else if self.float_matches == self.non_missing {
            ColumnType::Float
        } else {
            ColumnType::String
        }
    }
}

/// Infers the narrowest column type every non-missing cell satisfies.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut candidate = TypeCandidate::default();
    for raw in cells.into_iter().flatten() {
        candidate.update(raw);
    }
    candidate.decide()
}

/// Parses a raw field for a column of type `ty`. Missing fields yield `None`.
pub fn parse_cell(raw: &str, ty: &ColumnType) -> Result<Option<Value>> {
    if is_missing_token(raw) {
        return Ok(None);
    }
    let trimmed = raw.trim();
    if ty.is_numeric() && is_nan_literal(trimmed) {
        return Ok(None);
    }
    let parsed = match ty {
        ColumnType::String => Value::String(raw.to_string()),
        ColumnType::Integer => Value::Integer(
            trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{raw}' as integer"))?,
        ),
        ColumnType::Float => Value::Float(
            trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{raw}' as float"))?,
        ),
        ColumnType::Boolean => match parse_boolean_token(trimmed) {
            Some(flag) => Value::Boolean(flag),
            None => bail!("Failed to parse '{raw}' as boolean"),
        },
        ColumnType::DateTime => Value::DateTime(parse_timestamp(trimmed)?),
    };
    Ok(Some(parsed))
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Parses a booking timestamp. Date-only values resolve to midnight and
/// offset-qualified RFC 3339 values are normalized to UTC.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M",
        "%d-%m-%Y %H:%M",
    ];
    let value = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }
    if let Ok(date) = parse_naive_date(value) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(anyhow!("Failed to parse '{value}' as timestamp"))
}
