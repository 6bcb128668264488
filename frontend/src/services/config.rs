use shared::{RevealTimings, FADE_OUT_MS};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// LocalStorage key holding the signed-in user
pub const AUTH_STORAGE_KEY: &str = "advent-calendar.user";

/// Runtime settings for the calendar UI.
///
/// The backend URL can be baked in at build time with `ADVENT_BACKEND_URL`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub reveal: RevealTimings,
    pub fade_out_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: normalize_base_url(
                option_env!("ADVENT_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL),
            ),
            reveal: RevealTimings::default(),
            fade_out_ms: FADE_OUT_MS,
        }
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_default_timings() {
        let config = AppConfig::default();
        assert_eq!(config.reveal.door_open_ms, 300);
        assert_eq!(config.reveal.settle_ms, 1500);
        assert_eq!(config.fade_out_ms, 200);
        assert!(!config.backend_url.ends_with('/'));
    }

    #[wasm_bindgen_test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:5000/"), "http://localhost:5000");
        assert_eq!(normalize_base_url(" https://advent.example// "), "https://advent.example");
    }
}
