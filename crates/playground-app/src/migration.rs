// One-shot migration of content saved by older builds under a local storage key.

use playground_core::{LocalStorage, Notifier, Severity};
use serde_json::Value;

use crate::consts::{LEGACY_CONTENT_KEY, RESTORED_MESSAGE};

/// Read and clear the legacy key. A non-empty string is adopted as the
/// initial document and the user is told it was restored. An empty string
/// is still adopted, but the key stays and no notice is shown.
pub fn migrate_legacy_content(
    storage: &mut dyn LocalStorage,
    notifier: &mut dyn Notifier,
) -> Option<String> {
    let value = match storage.get(LEGACY_CONTENT_KEY)? {
        Value::Null => return None,
        Value::String(s) if s.is_empty() => {
            log::debug!("legacy content is empty; adopted without clearing");
            return Some(s);
        }
        value => value,
    };

    storage.remove(LEGACY_CONTENT_KEY);
    match value {
        Value::String(content) => {
            log::info!("restored {} bytes of legacy content", content.len());
            notifier.notify(RESTORED_MESSAGE, Severity::Warning);
            Some(content)
        }
        other => {
            log::warn!("legacy content is not a string ({}); discarded", kind(&other));
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
