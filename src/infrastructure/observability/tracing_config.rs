/// How log output is rendered.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

impl TracingConfig {
    /// `LOG_FORMAT=json` or the `logging.json` setting turns on JSON output.
    pub fn with_json(mut self, json_from_settings: bool) -> Self {
        self.json_format |= json_from_settings;
        self
    }
}
