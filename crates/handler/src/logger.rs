use lambda_runtime::tracing;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Error,
}

/// One structured log line: a level and message plus free-form context fields.
#[derive(Debug, Serialize, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        LogEvent {
            level,
            message: message.into(),
            context: Map::new(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        LogEvent::new(LogLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        LogEvent::new(LogLevel::Error, message)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

/// Sink for structured events.
pub trait EventLog: Send + Sync {
    fn emit(&self, event: LogEvent);
}

/// Writes each event as a single JSON line through `tracing`.
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn emit(&self, event: LogEvent) {
        let line: String = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                tracing::error!("Failed to serialize log event {:?}: {}", event.message, err);
                return;
            }
        };

        match event.level {
            LogLevel::Info => tracing::info!("{}", line),
            LogLevel::Error => tracing::error!("{}", line),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_serializes_as_flat_object() {
        let event: LogEvent = LogEvent::info("Processing request")
            .with("request_id", "r-1")
            .with("table_name", None::<String>);

        let value: Value = serde_json::to_value(&event).expect("Event should serialize");

        assert_eq!(
            json!({
                "level": "INFO",
                "message": "Processing request",
                "request_id": "r-1",
                "table_name": null,
            }),
            value
        );
    }

    #[test]
    fn error_level_is_uppercase() {
        let line: String = serde_json::to_string(&LogEvent::error("boom")).unwrap();

        assert!(line.contains(r#""level":"ERROR""#));
    }
}
