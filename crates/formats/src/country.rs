use serde_json::{Map, Value};

/// Property keys consulted, in order, for a feature's display name.
pub const NAME_PROPERTY_KEYS: [&str; 3] = ["NAME", "name", "NAME_EN"];

/// Name given to features that carry none of [`NAME_PROPERTY_KEYS`].
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// First non-empty string value among [`NAME_PROPERTY_KEYS`], else [`UNKNOWN_COUNTRY`].
pub fn resolve_country_name(properties: &Map<String, Value>) -> String {
    NAME_PROPERTY_KEYS
        .iter()
        .filter_map(|key| properties.get(*key))
        .filter_map(Value::as_str)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_COUNTRY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{UNKNOWN_COUNTRY, resolve_country_name};
    use serde_json::{Map, Value, json};

    fn props(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn prefers_upper_case_name() {
        let p = props(json!({ "NAME": "Brazil", "name": "Brasil", "NAME_EN": "Brazil EN" }));
        assert_eq!(resolve_country_name(&p), "Brazil");
    }

    #[test]
    fn falls_back_through_keys() {
        assert_eq!(resolve_country_name(&props(json!({ "name": "Chile" }))), "Chile");
        assert_eq!(
            resolve_country_name(&props(json!({ "NAME": "", "NAME_EN": "Peru" }))),
            "Peru"
        );
    }

    #[test]
    fn non_string_and_missing_names_are_unknown() {
        assert_eq!(resolve_country_name(&props(json!({ "NAME": 42 }))), UNKNOWN_COUNTRY);
        assert_eq!(resolve_country_name(&Map::new()), UNKNOWN_COUNTRY);
    }
}
