//! Data Paths - Reading and Writing Nested Values
//!
//! A data path is a dot-separated list of segments. A segment is either a
//! key (`taxpayer`) or a key followed by one non-negative index
//! (`dependents[0]`). Reads never fail on missing data; they resolve to
//! `None`.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Data path is empty")]
    Empty,

    #[error("Empty segment in data path: {0}")]
    EmptySegment(String),

    #[error("Malformed index in segment: {0}")]
    MalformedIndex(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Indexed(String, usize),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::EmptySegment(raw.to_string()));
        }
        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(PathError::MalformedIndex(raw.to_string()));
            }
            return Ok(Segment::Key(raw.to_string()));
        };
        let name = &raw[..open];
        let index = raw[open + 1..]
            .strip_suffix(']')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| PathError::MalformedIndex(raw.to_string()))?;
        if name.is_empty() {
            return Err(PathError::MalformedIndex(raw.to_string()));
        }
        Ok(Segment::Indexed(name.to_string(), index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Indexed(k, i) => write!(f, "{}[{}]", k, i),
        }
    }
}

/// A parsed data path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath {
    segments: Vec<Segment>,
}

impl DataPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = path
            .split('.')
            .map(|raw| {
                Segment::parse(raw).map_err(|e| match e {
                    PathError::EmptySegment(_) => PathError::EmptySegment(path.to_string()),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk `data` along this path. Any missing or null step yields `None`.
    pub fn resolve<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        let mut current = data;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.as_object()?.get(key)?,
                Segment::Indexed(key, index) => {
                    current.as_object()?.get(key)?.as_array()?.get(*index)?
                }
            };
        }
        Some(current)
    }

    /// Return a copy of `data` with `value` stored at this path. The input
    /// is left untouched; missing or scalar intermediates become objects and
    /// indexed segments grow arrays, padding with null.
    pub fn set(&self, data: &Value, value: Value) -> Value {
        let mut root = data.clone();
        insert(&mut root, &self.segments, value);
        root
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(Segment::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just made an object"),
    }
}

fn insert(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    let map = ensure_object(node);
    match head {
        Segment::Key(key) => {
            let child = map.entry(key.clone()).or_insert(Value::Null);
            insert(child, rest, value);
        }
        Segment::Indexed(key, index) => {
            let slot = map.entry(key.clone()).or_insert(Value::Null);
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                insert(&mut items[*index], rest, value);
            }
        }
    }
}

/// Resolve `path` against `data`. Unparseable paths resolve to `None`.
pub fn resolve<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    DataPath::parse(path).ok()?.resolve(data)
}

/// Non-mutating set: returns a new tree with `value` at `path`.
pub fn set_value(data: &Value, path: &str, value: Value) -> Result<Value, PathError> {
    Ok(DataPath::parse(path)?.set(data, value))
}
