use aws_config::BehaviorVersion;
use handler::{HttpLambdaEvent, RecordHandler};
use lambda_runtime::{service_fn, tracing};
use model::Error;
use std::sync::Arc;
use store_dynamodb::DynamoDbRecordStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Built once per execution environment and reused across invocations
    let dynamodb_client: aws_sdk_dynamodb::Client =
        aws_sdk_dynamodb::Client::new(&aws_config::load_defaults(BehaviorVersion::latest()).await);

    let handler: RecordHandler =
        RecordHandler::new(Arc::new(DynamoDbRecordStore::new(dynamodb_client)));
    let handler_ref: &RecordHandler = &handler;

    lambda_runtime::run(service_fn(move |event: HttpLambdaEvent| async move {
        handler_ref.handle(event).await
    }))
    .await
}
