//! One JSON object per line.

use super::Renderer;
use crate::event::EventDict;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, event: EventDict) -> String {
        serde_json::to_string(&event).unwrap_or_else(|e| {
            format!("{{\"event\":\"unrenderable event\",\"error\":\"{}\"}}", e)
        })
    }
}
