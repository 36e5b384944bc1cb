//! JSON Schema of `km.toml`, for editor validation.

use schemars::schema_for;

use crate::config::Config;

/// Draft-07 schema of [`Config`], pretty-printed.
pub fn config_schema() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_config() {
        let text = config_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["$schema"], "http://json-schema.org/draft-07/schema#");
        assert_eq!(value["title"], "Config");
        assert!(value["properties"]["mappings"].is_object());

        let definitions = &value["definitions"];
        assert!(definitions["Settings"]["properties"]["path_from_module"].is_object());
        assert!(definitions["MappingSettings"]["properties"]["override"].is_object());
        assert!(definitions["DestinationSpec"]["properties"]["map"].is_object());
        let styles = definitions["Style"].to_string();
        for style in ["pointer", "value", "standalone"] {
            assert!(styles.contains(style), "{style} missing from {styles}");
        }
    }
}
