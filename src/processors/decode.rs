//! Byte values to text.

use super::{ProcessResult, Processor};
use crate::event::{EventDict, FieldValue};
use crate::pipeline::handle::LoggerHandle;

/// Decode top-level byte values as UTF-8, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeDecoder;

impl Processor for UnicodeDecoder {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        for (_, value) in event.iter_mut() {
            if let FieldValue::Bytes(bytes) = value {
                *value = FieldValue::Str(String::from_utf8_lossy(bytes).into_owned());
            }
        }
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "unicode_decoder"
    }
}
