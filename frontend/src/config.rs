use gloo_utils::document;
use shared::{ClientConfig, SharedError};

/// Id of the `<script type="application/json">` block the server renders.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Raw JSON of the embedded config block, if the page has one.
pub fn raw_config() -> Option<String> {
    document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Parses the embedded block. Absent config is not an error; a broken one is
/// reported so the caller can log it once logging is up.
pub fn load() -> (ClientConfig, Option<SharedError>) {
    match raw_config() {
        Some(raw) => match ClientConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(e) => (ClientConfig::default(), Some(e)),
        },
        None => (ClientConfig::default(), None),
    }
}
