//! Timestamps.

use std::fmt::Write;

use chrono::{DateTime, Local, SecondsFormat, Utc};

use super::{ProcessResult, Processor};
use crate::config::settings::DEFAULT_TIMESTAMP_FORMAT;
use crate::event::{EventDict, TIMESTAMP_KEY};
use crate::pipeline::handle::LoggerHandle;

/// Format name selecting RFC 3339 output.
pub const ISO_FORMAT: &str = "iso";

/// Stamp the event with the current time.
#[derive(Debug, Clone)]
pub struct TimeStamper {
    fmt: String,
    utc: bool,
    key: String,
}

impl Default for TimeStamper {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT, true)
    }
}

impl TimeStamper {
    /// `fmt` is a strftime pattern, or `"iso"` for RFC 3339.
    pub fn new(fmt: &str, utc: bool) -> Self {
        Self {
            fmt: fmt.to_string(),
            utc,
            key: TIMESTAMP_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Render `now` the way this stamper would.
    pub fn stamp(&self, now: DateTime<Utc>) -> String {
        if self.utc {
            self.render(&now)
        } else {
            self.render(&now.with_timezone(&Local))
        }
    }

    fn render<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if self.fmt == ISO_FORMAT {
            return now.to_rfc3339_opts(SecondsFormat::Micros, self.utc);
        }

        // An invalid pattern errors out of `write!` instead of panicking.
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.fmt)).is_ok() {
            return out;
        }
        now.format(DEFAULT_TIMESTAMP_FORMAT).to_string()
    }
}

impl Processor for TimeStamper {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        event.insert(self.key.clone(), self.stamp(Utc::now()));
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "timestamper"
    }
}
