/// Common test fixtures
///
/// Typed models, wire-level page builders and store failures shared by the
/// test files.
use super::{Deserialize, Error, Item, Serialize};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::types::error::{
    ConditionalCheckFailedException, TransactionCanceledException,
};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::{Response, StatusCode};
use aws_smithy_types::body::SdkBody;
use ddb_access::codec::{self, WireItem};

/// Table name used by the mock-backed tests
pub const TABLE: &str = "tests_items";

/// A typed item stored under the reserved keys
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Order {
    pub _pk: String,
    pub _sk: String,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Order {
    pub fn new(customer: &str, order: &str, total: u32) -> Self {
        Self {
            _pk: format!("customer#{customer}"),
            _sk: format!("order#{order}"),
            total,
            note: None,
        }
    }

    pub fn item(&self) -> Item {
        codec::to_item(self).unwrap()
    }
}

/// Orders `first..first + count` of one customer
pub fn orders(first: u32, count: u32) -> Vec<Item> {
    (first..first + count)
        .map(|n| Order::new("1", &format!("{n:03}"), n).item())
        .collect()
}

/// Wire form of a native item
pub fn wire(item: &Item) -> WireItem {
    codec::encode_item(item).unwrap()
}

/// Continuation token pointing at `sort_key`
pub fn token(sort_key: &str) -> WireItem {
    WireItem::from([
        (
            "_pk".to_string(),
            AttributeValue::S("customer#1".to_string()),
        ),
        ("_sk".to_string(), AttributeValue::S(sort_key.to_string())),
    ])
}

/// One query page
pub fn query_page(items: &[Item], next: Option<WireItem>) -> QueryOutput {
    QueryOutput::builder()
        .set_items(Some(items.iter().map(wire).collect()))
        .count(items.len() as i32)
        .scanned_count(items.len() as i32)
        .set_last_evaluated_key(next)
        .build()
}

/// One scan page
pub fn scan_page(items: &[Item], next: Option<WireItem>) -> ScanOutput {
    ScanOutput::builder()
        .set_items(Some(items.iter().map(wire).collect()))
        .count(items.len() as i32)
        .scanned_count(items.len() as i32)
        .set_last_evaluated_key(next)
        .build()
}

/// One count-only scan page
pub fn count_page(count: i32, next: Option<WireItem>) -> ScanOutput {
    ScanOutput::builder()
        .count(count)
        .scanned_count(count)
        .set_last_evaluated_key(next)
        .build()
}

fn bad_request() -> Response {
    Response::new(StatusCode::try_from(400).unwrap(), SdkBody::empty())
}

fn conditional_check_failed_exception() -> ConditionalCheckFailedException {
    ConditionalCheckFailedException::builder()
        .message("The conditional request failed")
        .build()
}

/// Store rejection of a conditional put
pub fn put_condition_failed() -> Error {
    SdkError::service_error(
        PutItemError::ConditionalCheckFailedException(conditional_check_failed_exception()),
        bad_request(),
    )
    .into()
}

/// Store rejection of a conditional update
pub fn update_condition_failed() -> Error {
    SdkError::service_error(
        UpdateItemError::ConditionalCheckFailedException(conditional_check_failed_exception()),
        bad_request(),
    )
    .into()
}

/// Store cancellation of a write transaction
pub fn transaction_canceled() -> Error {
    SdkError::service_error(
        TransactWriteItemsError::TransactionCanceledException(
            TransactionCanceledException::builder()
                .message("Transaction cancelled, please refer cancellation reasons for specific reasons [ConditionalCheckFailed, None]")
                .build(),
        ),
        bad_request(),
    )
    .into()
}
