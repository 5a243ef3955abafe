use crate::tree::ObjectSet;

/// Format an object set as pretty JSON.
pub fn format_json(set: &ObjectSet) -> String {
    serde_json::to_string_pretty(set).unwrap_or_else(|_| "{}".to_string())
}
