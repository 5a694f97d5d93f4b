//! Captured errors to text.

use super::{ProcessResult, Processor};
use crate::event::{EventDict, FieldValue, EXCEPTION_KEY, EXC_INFO_KEY};
use crate::pipeline::handle::LoggerHandle;

/// Replace `exc_info` with a formatted `exception`.
///
/// Flags without a captured error are dropped; any other value is left in
/// place untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatExcInfo;

impl Processor for FormatExcInfo {
    fn process(&self, _logger: Option<&LoggerHandle>, _method_name: &str, mut event: EventDict) -> ProcessResult {
        match event.remove(EXC_INFO_KEY) {
            Some(FieldValue::Exception(info)) => {
                event.insert(EXCEPTION_KEY, info.format());
            }
            Some(FieldValue::Bool(_)) | Some(FieldValue::Null) | None => {}
            Some(other) => {
                event.insert(EXC_INFO_KEY, other);
            }
        }
        Ok(event)
    }

    fn name(&self) -> &'static str {
        "format_exc_info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ExceptionInfo;

    #[test]
    fn test_formats_captured_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
        let mut event = EventDict::with_message("boom");
        event.insert(EXC_INFO_KEY, ExceptionInfo::capture(&err));

        let event = FormatExcInfo.process(None, "exception", event).unwrap();
        assert!(!event.contains_key(EXC_INFO_KEY));
        assert_eq!(event.get_str(EXCEPTION_KEY), Some("Error: config missing"));
    }

    #[test]
    fn test_flag_without_error_is_noop() {
        let mut event = EventDict::with_message("m");
        event.insert(EXC_INFO_KEY, true);
        let event = FormatExcInfo.process(None, "error", event).unwrap();
        assert!(!event.contains_key(EXC_INFO_KEY));
        assert!(!event.contains_key(EXCEPTION_KEY));
    }

    #[test]
    fn test_unrecognized_value_passes_through() {
        let mut event = EventDict::new();
        event.insert(EXC_INFO_KEY, "not an error");
        let event = FormatExcInfo.process(None, "error", event).unwrap();
        assert_eq!(event.get_str(EXC_INFO_KEY), Some("not an error"));
        assert!(!event.contains_key(EXCEPTION_KEY));
    }
}
