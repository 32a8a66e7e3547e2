/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Extra `EnvFilter` directives; `RUST_LOG` still wins when set.
    pub directives: Option<String>,
}

impl TracingConfig {
    pub fn new(environment: String, json_format: bool, directives: Option<String>) -> Self {
        Self {
            environment,
            json_format,
            directives,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            directives: None,
        }
    }
}
