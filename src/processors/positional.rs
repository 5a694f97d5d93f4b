//! %-style interpolation of positional arguments into the message.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{ProcessResult, Processor};
use crate::event::{EventDict, FieldValue, EVENT_KEY, POSITIONAL_ARGS_KEY};
use crate::pipeline::handle::LoggerHandle;

lazy_static! {
    /// One conversion specifier: `%(name)-08.3f` and friends.
    static ref SPEC_PATTERN: Regex = Regex::new(
        r"%(?:\((?P<name>[^)]*)\))?(?P<flags>[-+ 0#]*)(?P<width>\d+)?(?:\.(?P<prec>\d+))?(?P<conv>[sdirfxX%])"
    )
    .unwrap();
}

/// Interpolate `positional_args` into the message.
#[derive(Debug, Clone)]
pub struct PositionalArgumentsFormatter {
    remove_positional_args: bool,
}

impl Default for PositionalArgumentsFormatter {
    fn default() -> Self {
        Self {
            remove_positional_args: true,
        }
    }
}

impl PositionalArgumentsFormatter {
    /// Keep `positional_args` in the event after formatting.
    pub fn keeping_args() -> Self {
        Self {
            remove_positional_args: false,
        }
    }
}

impl Processor for PositionalArgumentsFormatter {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        let Some(args) = event.get(POSITIONAL_ARGS_KEY).cloned() else {
            return Ok(event);
        };

        if args.is_truthy() {
            if let Some(template) = event.message() {
                if let Some(formatted) = percent_format(template, &args) {
                    event.insert(EVENT_KEY, formatted);
                }
            }
        }

        if self.remove_positional_args {
            event.remove(POSITIONAL_ARGS_KEY);
        }
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "positional_arguments_formatter"
    }
}

enum Args<'a> {
    Positional(Vec<&'a FieldValue>),
    Mapping(&'a BTreeMap<String, FieldValue>),
}

/// Apply %-interpolation. Returns `None` when the template and the
/// arguments do not line up.
pub fn percent_format(template: &str, args: &FieldValue) -> Option<String> {
    let args = match args {
        FieldValue::Map(m) => Args::Mapping(m),
        FieldValue::List(items) => match items.as_slice() {
            [FieldValue::Map(m)] if uses_names(template) => Args::Mapping(m),
            _ => Args::Positional(items.iter().collect()),
        },
        single => Args::Positional(vec![single]),
    };

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut consumed = 0;

    for caps in SPEC_PATTERN.captures_iter(template) {
        let whole = caps.get(0)?;
        let literal = &template[last..whole.start()];
        if literal.contains('%') {
            return None;
        }
        out.push_str(literal);
        last = whole.end();

        let conv = caps.name("conv")?.as_str();
        if conv == "%" {
            out.push('%');
            continue;
        }

        let value = match (&args, caps.name("name")) {
            (Args::Mapping(m), Some(name)) => m.get(name.as_str())?,
            (Args::Positional(items), None) => {
                let value = items.get(consumed)?;
                consumed += 1;
                *value
            }
            _ => return None,
        };
        out.push_str(&convert(value, &caps)?);
    }

    let tail = &template[last..];
    if tail.contains('%') {
        return None;
    }
    out.push_str(tail);

    match args {
        Args::Positional(items) if consumed != items.len() => None,
        _ => Some(out),
    }
}

fn uses_names(template: &str) -> bool {
    SPEC_PATTERN
        .captures_iter(template)
        .any(|caps| caps.name("name").is_some())
}

fn convert(value: &FieldValue, caps: &Captures<'_>) -> Option<String> {
    let flags = caps.name("flags").map_or("", |m| m.as_str());
    let width: usize = caps.name("width").map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let precision: Option<usize> = match caps.name("prec") {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    let conv = caps.name("conv")?.as_str();

    let (body, numeric) = match conv {
        "s" => (truncate(value.repr(), precision), false),
        "r" => (truncate(value.quoted(), precision), false),
        "d" | "i" => (signed(as_int(value)?.to_string(), flags), true),
        "f" => {
            let f = as_float(value)?;
            (signed(format!("{:.*}", precision.unwrap_or(6), f), flags), true)
        }
        "x" => (format!("{:x}", as_int(value)?), true),
        "X" => (format!("{:X}", as_int(value)?), true),
        _ => return None,
    };

    Some(pad(body, width, flags, numeric))
}

fn as_int(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) => Some(f.trunc() as i64),
        FieldValue::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn as_float(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Int(i) => Some(*i as f64),
        FieldValue::Float(f) => Some(*f),
        FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    }
}

fn signed(text: String, flags: &str) -> String {
    if text.starts_with('-') {
        return text;
    }
    if flags.contains('+') {
        format!("+{}", text)
    } else if flags.contains(' ') {
        format!(" {}", text)
    } else {
        text
    }
}

fn pad(body: String, width: usize, flags: &str, numeric: bool) -> String {
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if flags.contains('-') {
        format!("{}{}", body, " ".repeat(fill))
    } else if numeric && flags.contains('0') {
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+' | ' ')) => (c.to_string(), &body[1..]),
            _ => (String::new(), body.as_str()),
        };
        format!("{}{}{}", sign, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}
