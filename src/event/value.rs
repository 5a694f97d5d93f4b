//! Field values carried by log events.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

/// A single value in an event.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Exception(ExceptionInfo),
}

impl FieldValue {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        FieldValue::Bytes(data.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Truthiness in the loose sense used by `exc_info` and friends.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Int(i) => *i != 0,
            FieldValue::Float(f) => *f != 0.0,
            FieldValue::Str(s) => !s.is_empty(),
            FieldValue::Bytes(b) => !b.is_empty(),
            FieldValue::List(l) => !l.is_empty(),
            FieldValue::Map(m) => !m.is_empty(),
            FieldValue::Exception(_) => true,
        }
    }

    /// Text used by renderers for a value.
    ///
    /// Text is shown as-is; bytes keep an escaped `b'..'` form so an
    /// undecoded value is visibly different from decoded text.
    pub fn repr(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => format!("{:?}", f),
            FieldValue::Str(s) => s.clone(),
            FieldValue::Bytes(b) => format!("b'{}'", b.escape_ascii()),
            FieldValue::List(_) | FieldValue::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
            FieldValue::Exception(e) => e.to_string(),
        }
    }

    /// Quoted representation used by `%r` interpolation.
    pub fn quoted(&self) -> String {
        match self {
            FieldValue::Str(s) => format!("'{}'", s),
            other => other.repr(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Bytes(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            FieldValue::Exception(e) => serializer.serialize_str(&e.format()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Str(s.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(FieldValue::Int)
            .unwrap_or(FieldValue::Float(i as f64))
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        FieldValue::from(i as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(b: &[u8]) -> Self {
        FieldValue::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for FieldValue {
    fn from(b: &[u8; N]) -> Self {
        FieldValue::Bytes(b.to_vec())
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(entries: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(entries)
    }
}

impl From<ExceptionInfo> for FieldValue {
    fn from(e: ExceptionInfo) -> Self {
        FieldValue::Exception(e)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::Str(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

/// A captured error, detached from the error value that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionInfo {
    pub kind: String,
    pub message: String,
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    /// Capture a concrete error, keeping its type name.
    pub fn capture<E: Error + ?Sized>(err: &E) -> Self {
        let kind = short_type_name(std::any::type_name::<E>());
        Self {
            kind,
            message: err.to_string(),
            causes: collect_causes(err.source()),
        }
    }

    /// Capture a type-erased error.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        if let Some(info) = err.downcast_ref::<ExceptionInfo>() {
            return info.clone();
        }
        Self {
            kind: "Error".to_string(),
            message: err.to_string(),
            causes: collect_causes(err.source()),
        }
    }

    /// Multi-line traceback-style text.
    pub fn format(&self) -> String {
        let mut out = format!("{}: {}", self.kind, self.message);
        if !self.causes.is_empty() {
            out.push_str("\n\nCaused by:");
            for (i, cause) in self.causes.iter().enumerate() {
                out.push_str(&format!("\n    {}: {}", i, cause));
            }
        }
        out
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ExceptionInfo {}

fn collect_causes(mut source: Option<&(dyn Error + 'static)>) -> Vec<String> {
    let mut causes = Vec::new();
    while let Some(err) = source {
        causes.push(err.to_string());
        source = err.source();
    }
    causes
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("write failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_repr() {
        assert_eq!(FieldValue::from("abc").repr(), "abc");
        assert_eq!(FieldValue::bytes(b"abc".to_vec()).repr(), "b'abc'");
        assert_eq!(FieldValue::from(1.0).repr(), "1.0");
        assert_eq!(FieldValue::from(42).repr(), "42");
        assert_eq!(FieldValue::from("x").quoted(), "'x'");
    }

    #[test]
    fn test_capture_error_chain() {
        let info = ExceptionInfo::capture(&Outer(Inner));
        assert_eq!(info.kind, "Outer");
        assert_eq!(info.message, "write failed");
        assert_eq!(info.causes, vec!["disk full"]);
        assert_eq!(
            info.format(),
            "Outer: write failed\n\nCaused by:\n    0: disk full"
        );
    }

    #[test]
    fn test_from_error_preserves_captured_info() {
        let info = ExceptionInfo::capture(&Outer(Inner));
        let erased: &(dyn Error + 'static) = &info;
        assert_eq!(ExceptionInfo::from_error(erased), info);
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(json!({"a": [1, "two", null], "b": 1.5}));
        let map = value.as_map().unwrap();
        assert_eq!(
            map["a"],
            FieldValue::List(vec![
                FieldValue::Int(1),
                FieldValue::from("two"),
                FieldValue::Null
            ])
        );
        assert_eq!(map["b"], FieldValue::Float(1.5));
    }

    #[test]
    fn test_serialize_bytes_as_text() {
        let value = FieldValue::bytes(b"abc".to_vec());
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"abc\"");
    }
}
