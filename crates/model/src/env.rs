/// Environment variable containing the name of the target DynamoDB table
pub const TABLE_NAME: &str = "TABLE_NAME";
/// Environment variable the Lambda runtime populates with the X-Ray trace header
pub const TRACE_ID: &str = "_X_AMZN_TRACE_ID";
/// Logged in place of the trace id when none is set
pub const TRACE_ID_FALLBACK: &str = "N/A";
