//! Combinator schemas over JSON values.
//!
//! ```
//! use tollgate_core::schema::{Schema, number_from_string, object, optional, string};
//! use serde_json::json;
//!
//! let query = object([
//!     ("q", string()),
//!     ("page", optional(number_from_string())),
//! ]);
//! assert_eq!(query.decode(&json!({ "q": "rust", "page": "2" })).unwrap(),
//!            json!({ "q": "rust", "page": 2 }));
//! ```
//!
//! Coercing codecs also accept the type they coerce to, so decoding an
//! already decoded value returns it unchanged.

use super::{DecodeResult, Schema};
use crate::issue::{Issue, Path};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    NumberFromString,
    BooleanFromString,
    Literal(Value),
    Array(Box<Codec>),
    Optional(Box<Codec>),
    Object {
        fields: Vec<(String, Codec)>,
        strict: bool,
    },
    Union(Vec<Codec>),
}

/// A schema built from the constructor functions in this module.
#[derive(Debug, Clone, PartialEq)]
pub struct Codec {
    name: String,
    kind: Kind,
}

impl Codec {
    fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Replaces the type name reported in issues.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Drops keys an object schema does not declare. No effect on other codecs.
    pub fn strict(mut self) -> Self {
        if let Kind::Object { strict, .. } = &mut self.kind {
            *strict = true;
        }
        self
    }
}

pub fn string() -> Codec {
    Codec::new("string", Kind::String)
}

pub fn number() -> Codec {
    Codec::new("number", Kind::Number)
}

/// A number without a fractional part.
pub fn integer() -> Codec {
    Codec::new("Int", Kind::Integer)
}

pub fn boolean() -> Codec {
    Codec::new("boolean", Kind::Boolean)
}

pub fn null() -> Codec {
    Codec::new("null", Kind::Null)
}

/// A number, or a string holding one (`"42"` decodes to `42`).
pub fn number_from_string() -> Codec {
    Codec::new("NumberFromString", Kind::NumberFromString)
}

/// A boolean, or the string `"true"` / `"false"`.
pub fn boolean_from_string() -> Codec {
    Codec::new("BooleanFromString", Kind::BooleanFromString)
}

pub fn literal(value: impl Into<Value>) -> Codec {
    let value = value.into();
    Codec::new(value.to_string(), Kind::Literal(value))
}

pub fn array(item: Codec) -> Codec {
    Codec::new(format!("Array<{}>", item.name), Kind::Array(Box::new(item)))
}

/// Field that may be absent or `null`.
pub fn optional(inner: Codec) -> Codec {
    Codec::new(
        format!("({} | undefined)", inner.name),
        Kind::Optional(Box::new(inner)),
    )
}

/// Object with the given fields. Undeclared keys pass through unless the
/// codec is made [`strict`](Codec::strict).
pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Codec)>) -> Codec {
    let fields: Vec<(String, Codec)> = fields.into_iter().map(|(k, c)| (k.into(), c)).collect();
    let name = if fields.is_empty() {
        "{}".to_string()
    } else {
        let body = fields
            .iter()
            .map(|(key, codec)| format!("{}: {}", key, codec.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{ {body} }}")
    };
    Codec::new(
        name,
        Kind::Object {
            fields,
            strict: false,
        },
    )
}

/// First member that accepts the value wins.
pub fn union(members: impl IntoIterator<Item = Codec>) -> Codec {
    let members: Vec<Codec> = members.into_iter().collect();
    let name = format!(
        "({})",
        members
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    Codec::new(name, Kind::Union(members))
}

impl Schema for Codec {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn accepts_missing(&self) -> bool {
        matches!(self.kind, Kind::Optional(_))
    }

    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult {
        match &self.kind {
            Kind::String => accept_if(raw.is_string(), raw, path),
            Kind::Number => accept_if(raw.is_number(), raw, path),
            Kind::Integer => accept_if(
                raw.as_f64().is_some_and(|n| n.fract() == 0.0),
                raw,
                path,
            ),
            Kind::Boolean => accept_if(raw.is_boolean(), raw, path),
            Kind::Null => accept_if(raw.is_null(), raw, path),
            Kind::Literal(expected) => accept_if(raw == expected, raw, path),
            Kind::NumberFromString => {
                coerce_number(raw).ok_or_else(|| vec![Issue::invalid(path, raw)])
            }
            Kind::BooleanFromString => {
                coerce_bool(raw).ok_or_else(|| vec![Issue::invalid(path, raw)])
            }
            Kind::Optional(inner) => {
                if raw.is_null() {
                    Ok(Value::Null)
                } else {
                    inner.validate(raw, path)
                }
            }
            Kind::Array(item) => validate_array(item, raw, path),
            Kind::Object { fields, strict } => validate_object(fields, *strict, raw, path),
            Kind::Union(members) => validate_union(members, raw, path),
        }
    }
}

fn accept_if(ok: bool, raw: &Value, path: &Path) -> DecodeResult {
    if ok {
        Ok(raw.clone())
    } else {
        Err(vec![Issue::invalid(path, raw)])
    }
}

fn coerce_number(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(_) => Some(raw.clone()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(int) = s.parse::<i64>() {
                return Some(Value::from(int));
            }
            let float = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
            if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
                return Some(Value::from(float as i64));
            }
            Number::from_f64(float).map(Value::Number)
        }
        _ => None,
    }
}

fn coerce_bool(raw: &Value) -> Option<Value> {
    match raw {
        Value::Bool(_) => Some(raw.clone()),
        Value::String(s) if s == "true" => Some(Value::Bool(true)),
        Value::String(s) if s == "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn validate_array(item: &Codec, raw: &Value, path: &Path) -> DecodeResult {
    let Some(values) = raw.as_array() else {
        return Err(vec![Issue::invalid(path, raw)]);
    };
    let mut decoded = Vec::with_capacity(values.len());
    let mut issues = Vec::new();
    for (index, value) in values.iter().enumerate() {
        match item.validate(value, &path.child(index.to_string(), item.name())) {
            Ok(v) => decoded.push(v),
            Err(mut errs) => issues.append(&mut errs),
        }
    }
    if issues.is_empty() {
        Ok(Value::Array(decoded))
    } else {
        Err(issues)
    }
}

fn validate_object(
    fields: &[(String, Codec)],
    strict: bool,
    raw: &Value,
    path: &Path,
) -> DecodeResult {
    let Some(map) = raw.as_object() else {
        return Err(vec![Issue::invalid(path, raw)]);
    };
    let mut decoded = if strict { Map::new() } else { map.clone() };
    let mut issues = Vec::new();
    for (key, codec) in fields {
        let child = path.child(key.as_str(), codec.name());
        match map.get(key) {
            Some(value) => match codec.validate(value, &child) {
                Ok(v) => {
                    decoded.insert(key.clone(), v);
                }
                Err(mut errs) => issues.append(&mut errs),
            },
            None if codec.accepts_missing() => {}
            None => issues.push(Issue::missing(&child)),
        }
    }
    if issues.is_empty() {
        Ok(Value::Object(decoded))
    } else {
        Err(issues)
    }
}

fn validate_union(members: &[Codec], raw: &Value, path: &Path) -> DecodeResult {
    let mut issues = Vec::new();
    for member in members {
        // union members are unnamed steps
        match member.validate(raw, &path.child("", member.name())) {
            Ok(v) => return Ok(v),
            Err(mut errs) => issues.append(&mut errs),
        }
    }
    if issues.is_empty() {
        issues.push(Issue::invalid(path, raw));
    }
    Err(issues)
}
