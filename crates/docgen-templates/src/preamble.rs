//! Page/text preamble derived from spacing mode (§4.4.2).

use docgen_types::model::SpacingMode;

/// Resolve the effective spacing mode from (in order) the helper
/// config, `data.spacing_mode`, `data.spacingMode`, default `compact`.
pub fn resolve_spacing_mode(
    config_mode: Option<SpacingMode>,
    data: &serde_json::Value,
) -> SpacingMode {
    if let Some(mode) = config_mode {
        return mode;
    }
    for key in ["spacing_mode", "spacingMode"] {
        if let Some(s) = data.get(key).and_then(serde_json::Value::as_str) {
            if let Some(mode) = SpacingMode::from_str_loose(s) {
                return mode;
            }
        }
    }
    SpacingMode::default()
}

/// Emit the `#set page(...)` / `#set text(...)` / `#set par(...)` preamble
/// for the resolved spacing mode.
pub fn emit_preamble(mode: SpacingMode) -> String {
    let (margin, font_pt, leading) = mode.preamble_values();
    format!(
        "#set document(title: \"Document\")\n\
         #set page(paper: \"us-letter\", margin: {margin}cm)\n\
         #set text(font: \"Liberation Sans\", size: {font_pt}pt)\n\
         #set par(leading: {leading}em, justify: false)\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_mode_wins_over_data() {
        let data = json!({"spacing_mode": "normal"});
        let mode = resolve_spacing_mode(Some(SpacingMode::UltraCompact), &data);
        assert_eq!(mode, SpacingMode::UltraCompact);
    }

    #[test]
    fn snake_case_key_checked_before_camel_case() {
        let data = json!({"spacing_mode": "ultra-compact", "spacingMode": "normal"});
        assert_eq!(resolve_spacing_mode(None, &data), SpacingMode::UltraCompact);
    }

    #[test]
    fn defaults_to_compact_when_absent() {
        assert_eq!(resolve_spacing_mode(None, &json!({})), SpacingMode::Compact);
    }

    #[test]
    fn preamble_contains_resolved_margin_and_font_size() {
        let text = emit_preamble(SpacingMode::Compact);
        assert!(text.contains("0.55cm"));
        assert!(text.contains("10pt"));
    }
}
