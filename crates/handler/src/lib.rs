use crate::env::InvocationEnv;
use crate::error::HandlerError;
use crate::logger::{EventLog, LogEvent, TracingEventLog};
use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use lambda_runtime::tracing::{Instrument, Span};
use lambda_runtime::{tracing, LambdaEvent};
use model::env::TABLE_NAME;
use model::{Error, Record};
use serde_json::Value;
use std::sync::Arc;
use store::RecordStore;

pub mod env;
pub mod error;
pub mod logger;
pub mod response;

const SUCCESS_MESSAGE: &str = "Successfully inserted data!";

pub type HttpLambdaEvent = LambdaEvent<ApiGatewayV2httpRequest>;

/// Turns one HTTP API request into one record write and one response.
///
/// The store and event log are built once at startup and shared by every invocation.
///
/// ```no_compile
/// let handler: RecordHandler = RecordHandler::new(Arc::new(DynamoDbRecordStore::new(client)));
/// let handler_ref: &RecordHandler = &handler;
///
/// lambda_runtime::run(service_fn(move |event: HttpLambdaEvent| async move {
///     handler_ref.handle(event).await
/// }))
/// .await
/// ```
pub struct RecordHandler {
    store: Arc<dyn RecordStore>,
    event_log: Arc<dyn EventLog>,
}

impl RecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        RecordHandler::with_event_log(store, Arc::new(TracingEventLog))
    }

    pub fn with_event_log(store: Arc<dyn RecordStore>, event_log: Arc<dyn EventLog>) -> Self {
        RecordHandler { store, event_log }
    }

    /// Handle a request using the table and trace id from the process environment.
    pub async fn handle(&self, event: HttpLambdaEvent) -> Result<ApiGatewayV2httpResponse, Error> {
        let request_id: String = event.context.request_id.clone();
        let span: Span = tracing::span!(tracing::Level::INFO, "Record Handler", request_id);

        self.handle_with_env(event, InvocationEnv::from_env())
            .instrument(span)
            .await
    }

    /// Every failure while processing becomes a 400 or 500 response.
    /// `Err` is only returned if the response body itself cannot be serialized.
    pub async fn handle_with_env(
        &self,
        event: HttpLambdaEvent,
        env: InvocationEnv,
    ) -> Result<ApiGatewayV2httpResponse, Error> {
        let request_id: &str = &event.context.request_id;

        self.event_log.emit(
            LogEvent::info("Processing request")
                .with("request_id", request_id)
                .with("trace_id", env.trace_id.as_str())
                .with("table_name", env.table_name.clone()),
        );

        let body: Option<&str> = event.payload.body.as_deref();

        match self.process(request_id, body, &env).await {
            Ok(()) => {
                self.event_log.emit(
                    LogEvent::info("Successfully inserted data").with("request_id", request_id),
                );

                response::success(SUCCESS_MESSAGE)
            }
            Err(err) => {
                self.event_log.emit(error_event(&err, request_id, &env));

                response::failure(err.status_code(), err.client_message())
            }
        }
    }

    async fn process(
        &self,
        request_id: &str,
        body: Option<&str>,
        env: &InvocationEnv,
    ) -> Result<(), HandlerError> {
        let record: Record = match body.filter(|body| !body.is_empty()) {
            Some(body) => self.record_from_body(request_id, body)?,
            None => {
                self.event_log.emit(
                    LogEvent::info("No payload provided, using default data")
                        .with("request_id", request_id),
                );

                Record::default_movie()
            }
        };

        let table_name: &str = env.table_name.as_deref().ok_or_else(|| {
            HandlerError::internal("MissingConfig", format!("{} is not set", TABLE_NAME))
        })?;

        self.store.put_record(table_name, &record).await?;

        Ok(())
    }

    fn record_from_body(&self, request_id: &str, body: &str) -> Result<Record, HandlerError> {
        let payload: Value = serde_json::from_str(body).map_err(HandlerError::InvalidJson)?;

        self.event_log.emit(
            LogEvent::info("Received payload")
                .with("request_id", request_id)
                .with("payload", payload.clone()),
        );

        let Value::Object(fields) = &payload else {
            return Err(HandlerError::internal(
                "UnexpectedPayload",
                format!("expected a JSON object but got {}", json_kind(&payload)),
            ));
        };

        Ok(Record::from_payload(fields)?)
    }
}

/// Only internal failures carry the trace id.
fn error_event(err: &HandlerError, request_id: &str, env: &InvocationEnv) -> LogEvent {
    let mut event: LogEvent = LogEvent::error(err.log_message()).with("request_id", request_id);

    if err.is_internal() {
        event = event.with("trace_id", env.trace_id.as_str());
    }

    event
        .with("error", err.to_string())
        .with("error_type", err.error_type())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
