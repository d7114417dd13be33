use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::types::AttributeValue;
use lambda_runtime::tracing;
use model::record::{ID, TITLE, YEAR};
use model::Record;
use store::StoreErrorReason::{BackendFailure, BadRecord};
use store::StoreOperation::PutRecord;
use store::{StoreError, RecordStore};
use std::collections::HashMap;

/// Writes records as `{year: N, title: S, id: S}` items.
pub struct DynamoDbRecordStore {
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoDbRecordStore {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client) -> Self {
        DynamoDbRecordStore { dynamodb_client }
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: HashMap<String, AttributeValue>,
    ) -> Result<PutItemOutput, SdkError<PutItemError, HttpResponse>> {
        self.dynamodb_client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
    }
}

#[async_trait]
impl RecordStore for DynamoDbRecordStore {
    async fn put_record(&self, table_name: &str, record: &Record) -> Result<(), StoreError> {
        let item: HashMap<String, AttributeValue> = record_item(record)?;

        tracing::debug!(table_name, id = %record.id, "Putting record");

        self.put_item(table_name, item)
            .await
            .map_err(|err| StoreError::new(record.id.clone(), PutRecord, BackendFailure(err.into())))?;

        Ok(())
    }
}

// Limits of the DynamoDB number type
const MAX_PRECISION: usize = 38;
const MAX_MAGNITUDE: i64 = 125;
const MIN_MAGNITUDE: i64 = -130;

/// Convert a record into the item written to the table.
pub fn record_item(record: &Record) -> Result<HashMap<String, AttributeValue>, StoreError> {
    check_number(&record.year).map_err(|reason| {
        StoreError::new(
            record.id.clone(),
            PutRecord,
            BadRecord(format!("year {}", reason)),
        )
    })?;

    Ok(HashMap::from([
        (YEAR.to_string(), AttributeValue::N(record.year.clone())),
        (TITLE.to_string(), AttributeValue::S(record.title.clone())),
        (ID.to_string(), AttributeValue::S(record.id.clone())),
    ]))
}

/// Check a number literal fits the precision and magnitude DynamoDB accepts.
fn check_number(text: &str) -> Result<(), String> {
    let unsigned: &str = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent): (&str, i64) = match unsigned.find(['e', 'E']) {
        Some(index) => {
            let exponent: i64 = unsigned[index + 1..]
                .parse()
                .map_err(|_| format!("{} has an exponent out of range", text))?;
            (&unsigned[..index], exponent)
        }
        None => (unsigned, 0),
    };

    let (integer, fraction): (&str, &str) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits: String = format!("{}{}", integer, fraction);
    let significant: &str = digits.trim_matches('0');

    if significant.is_empty() {
        return Ok(());
    }
    if significant.len() > MAX_PRECISION {
        return Err(format!("{} has more than {} significant digits", text, MAX_PRECISION));
    }

    let leading_zeros: usize = digits.len() - digits.trim_start_matches('0').len();
    let magnitude: i64 = exponent + integer.len() as i64 - leading_zeros as i64 - 1;

    if !(MIN_MAGNITUDE..=MAX_MAGNITUDE).contains(&magnitude) {
        return Err(format!("{} is out of range", text));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{create_failing_dynamodb_client, create_mock_dynamodb_client, TEST_TABLE};

    fn movie(year: &str) -> Record {
        Record {
            year: year.to_string(),
            title: "The Matrix".to_string(),
            id: "tm-1".to_string(),
        }
    }

    #[test]
    fn record_item_tags_year_as_number() {
        let item: HashMap<String, AttributeValue> =
            record_item(&movie("1999")).expect("Record should convert to an item");

        assert_eq!(Some(&AttributeValue::N("1999".to_string())), item.get("year"));
        assert_eq!(Some(&AttributeValue::S("The Matrix".to_string())), item.get("title"));
        assert_eq!(Some(&AttributeValue::S("tm-1".to_string())), item.get("id"));
        assert_eq!(3, item.len());
    }

    #[test]
    fn record_item_keeps_large_years_exact() {
        let year: &str = "123456789012345678901234567890";

        let item: HashMap<String, AttributeValue> =
            record_item(&movie(year)).expect("30 digits fit a DynamoDB number");

        assert_eq!(Some(&AttributeValue::N(year.to_string())), item.get("year"));
    }

    #[test]
    fn record_item_rejects_numbers_dynamodb_cannot_hold() {
        for year in ["1e400", "1e-200", "123456789012345678901234567890123456789"] {
            let err: StoreError = record_item(&movie(year)).expect_err("Year should be rejected");

            assert!(matches!(err.reason, BadRecord(_)));
        }
    }

    #[test]
    fn check_number_accepts_boundaries() {
        let years: [&str; 7] = [
            "0",
            "-0.0",
            "2012",
            "1999.5",
            "9.9999999999999999999999999999999999999E+125",
            "1E-130",
            "0.00120",
        ];

        for year in years {
            assert!(check_number(year).is_ok(), "{} should be accepted", year);
        }
    }

    #[tokio::test]
    async fn put_record_succeeds() {
        let store: DynamoDbRecordStore = DynamoDbRecordStore::new(create_mock_dynamodb_client());

        store
            .put_record(TEST_TABLE, &movie("1999"))
            .await
            .expect("Put should succeed");
    }

    #[tokio::test]
    async fn put_record_reports_backend_failure() {
        let store: DynamoDbRecordStore = DynamoDbRecordStore::new(create_failing_dynamodb_client());

        let err: StoreError = store
            .put_record(TEST_TABLE, &movie("1999"))
            .await
            .expect_err("Put should fail");

        assert_eq!("tm-1", err.record_id);
        assert!(matches!(err.reason, BackendFailure(_)));
    }
}
