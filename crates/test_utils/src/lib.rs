use async_trait::async_trait;
use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
use aws_smithy_mocks::{mock, mock_client, Rule};
use lambda_runtime::{Context, LambdaEvent};
use model::env::{TABLE_NAME, TRACE_ID};
use model::Record;
use store::StoreErrorReason::BackendFailure;
use store::StoreOperation::PutRecord;
use store::{RecordStore, StoreError};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Test table and trace values
pub const TEST_TABLE: &str = "movies";
pub const TEST_TRACE_ID: &str = "Root=1-5759e988-bd862e3fe1be46a994272793;Sampled=1";
pub const TEST_REQUEST_ID: &str = "request-1";

/// Create an HTTP API request with an optional body
pub fn http_request_with_body(body: Option<&str>) -> ApiGatewayV2httpRequest {
    ApiGatewayV2httpRequest {
        body: body.map(str::to_string),
        ..Default::default()
    }
}

/// Wrap a request in a Lambda event carrying `TEST_REQUEST_ID`
pub fn lambda_event(request: ApiGatewayV2httpRequest) -> LambdaEvent<ApiGatewayV2httpRequest> {
    let mut context: Context = Context::default();
    context.request_id = TEST_REQUEST_ID.to_string();

    LambdaEvent::new(request, context)
}

/// A default mock DynamoDB client which accepts every put
pub fn create_mock_dynamodb_client() -> aws_sdk_dynamodb::Client {
    let put_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::put_item)
        .match_requests(|_| true)
        .sequence()
        .output(|| PutItemOutput::builder().build())
        .repeatedly()
        .build();

    mock_client!(aws_sdk_dynamodb, [&put_item_rule])
}

/// A mock DynamoDB client whose puts fail as if the table did not exist
pub fn create_failing_dynamodb_client() -> aws_sdk_dynamodb::Client {
    let put_item_rule: Rule = mock!(aws_sdk_dynamodb::Client::put_item)
        .match_requests(|_| true)
        .sequence()
        .error(|| {
            PutItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        })
        .repeatedly()
        .build();

    mock_client!(aws_sdk_dynamodb, [&put_item_rule])
}

/// A store whose writes always fail, counting attempts.
#[derive(Default)]
pub struct FailingRecordStore {
    attempts: AtomicUsize,
}

impl FailingRecordStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn put_record(&self, _table_name: &str, record: &Record) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        Err(StoreError::new(
            record.id.clone(),
            PutRecord,
            BackendFailure("connection reset".into()),
        ))
    }
}

/// Setup default environment variables used in testing
pub fn setup_default_env() {
    unsafe {
        env::set_var(TABLE_NAME, TEST_TABLE);
        env::set_var(TRACE_ID, TEST_TRACE_ID);
    }
}
