use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    /// Human-readable lines with local timestamps.
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) log_format: LogFormat,
    /// Warnings captured during config parsing so they can be logged after tracing is initialized.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();

        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = env_string("STAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let mut warnings = Vec::new();
        let log_format = match env_string("LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => parse_log_format(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "LOG_FORMAT is invalid (value: {raw}); defaulting to text"
                ));
                LogFormat::Text
            }),
            _ => LogFormat::Text,
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            log_format,
            warnings,
        }
    }
}

fn parse_log_format(input: &str) -> Option<LogFormat> {
    match input.trim().to_ascii_lowercase().as_str() {
        "text" | "pretty" | "plain" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string())
}
