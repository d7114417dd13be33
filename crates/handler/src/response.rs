use aws_lambda_events::apigw::ApiGatewayV2httpResponse;
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use model::Error;
use serde::Serialize;

const APPLICATION_JSON: &str = "application/json";

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn success(message: &str) -> Result<ApiGatewayV2httpResponse, Error> {
    json_response(StatusCode::OK, &MessageBody { message })
}

pub fn failure(status: StatusCode, error: &str) -> Result<ApiGatewayV2httpResponse, Error> {
    json_response(status, &ErrorBody { error })
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

    Ok(ApiGatewayV2httpResponse {
        status_code: i64::from(status.as_u16()),
        headers,
        body: Some(Body::Text(serde_json::to_string(body)?)),
        ..Default::default()
    })
}
