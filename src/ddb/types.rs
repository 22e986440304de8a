use aws_sdk_dynamodb::operation::batch_get_item::{BatchGetItemInput, BatchGetItemOutput};
use aws_sdk_dynamodb::operation::batch_write_item::{BatchWriteItemInput, BatchWriteItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::transact_get_items::{
    TransactGetItemsInput, TransactGetItemsOutput,
};
use aws_sdk_dynamodb::operation::transact_write_items::{
    TransactWriteItemsInput, TransactWriteItemsOutput,
};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::types::{ReturnConsumedCapacity, ReturnValue, Select};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::pagination::Paginated;
use crate::codec;
use crate::error::Error;
use crate::value::{Item, Key};

/// Expression attribute names (`#placeholder -> attribute`)
pub type ExpressionNames = HashMap<String, String>;

/// Read a single item by key
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItemRequest {
    /// Table to read from
    pub table_name: String,
    /// Primary key of the item
    pub key: Key,
    /// Strongly consistent read
    pub consistent_read: Option<bool>,
    /// Attributes to return
    pub projection_expression: Option<String>,
    /// Name placeholders used by the projection
    pub expression_attribute_names: Option<ExpressionNames>,
}

impl GetItemRequest {
    /// Request the item stored under `key`
    pub fn new(table_name: impl Into<String>, key: Key) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }

    /// Use a strongly consistent read
    pub fn consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = Some(consistent_read);
        self
    }

    /// Only return the projected attributes
    pub fn projection(mut self, expression: impl Into<String>, names: Option<ExpressionNames>) -> Self {
        self.projection_expression = Some(expression.into());
        self.expression_attribute_names = names;
        self
    }
}

/// Write a whole item
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItemRequest {
    /// Table to write to
    pub table_name: String,
    /// Item to store; bookkeeping timestamps are added when missing
    pub item: Item,
    /// Condition the existing item must satisfy
    pub condition_expression: Option<String>,
    /// Name placeholders used by the condition
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders used by the condition
    pub expression_attribute_values: Option<Item>,
    /// Return the previous image
    pub return_values: Option<ReturnValue>,
}

impl PutItemRequest {
    /// Request storing `item`
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            ..Default::default()
        }
    }

    /// Only write when `expression` holds for the stored item
    pub fn condition(
        mut self,
        expression: impl Into<String>,
        names: Option<ExpressionNames>,
        values: Option<Item>,
    ) -> Self {
        self.condition_expression = Some(expression.into());
        self.expression_attribute_names = names;
        self.expression_attribute_values = values;
        self
    }
}

/// Modify attributes of an item in place
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItemRequest {
    /// Table holding the item
    pub table_name: String,
    /// Primary key of the item
    pub key: Key,
    /// Caller update expression; the update timestamp is merged in
    pub update_expression: Option<String>,
    /// Condition the existing item must satisfy
    pub condition_expression: Option<String>,
    /// Name placeholders
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders
    pub expression_attribute_values: Option<Item>,
}

impl UpdateItemRequest {
    /// Request updating the item stored under `key`
    pub fn new(table_name: impl Into<String>, key: Key) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }

    /// Set the update expression
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.update_expression = Some(expression.into());
        self
    }

    /// Set the condition expression
    pub fn condition(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
        self
    }

    /// Set the name placeholders
    pub fn names(mut self, names: ExpressionNames) -> Self {
        self.expression_attribute_names = Some(names);
        self
    }

    /// Set the value placeholders
    pub fn values(mut self, values: Item) -> Self {
        self.expression_attribute_values = Some(values);
        self
    }
}

/// Remove an item by key
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItemRequest {
    /// Table holding the item
    pub table_name: String,
    /// Primary key of the item
    pub key: Key,
    /// Condition the existing item must satisfy
    pub condition_expression: Option<String>,
    /// Name placeholders used by the condition
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders used by the condition
    pub expression_attribute_values: Option<Item>,
    /// Return the deleted image
    pub return_values: Option<ReturnValue>,
}

impl DeleteItemRequest {
    /// Request deleting the item stored under `key`
    pub fn new(table_name: impl Into<String>, key: Key) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }

    /// Only delete when `expression` holds for the stored item
    pub fn condition(
        mut self,
        expression: impl Into<String>,
        names: Option<ExpressionNames>,
        values: Option<Item>,
    ) -> Self {
        self.condition_expression = Some(expression.into());
        self.expression_attribute_names = names;
        self.expression_attribute_values = values;
        self
    }
}

/// Assert a condition on an item as part of a write transaction
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionCheckRequest {
    /// Table holding the item
    pub table_name: String,
    /// Primary key of the item
    pub key: Key,
    /// Condition that must hold
    pub condition_expression: String,
    /// Name placeholders used by the condition
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders used by the condition
    pub expression_attribute_values: Option<Item>,
}

impl ConditionCheckRequest {
    /// Require `condition_expression` to hold for the item under `key`
    pub fn new(
        table_name: impl Into<String>,
        key: Key,
        condition_expression: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            condition_expression: condition_expression.into(),
            ..Default::default()
        }
    }

    /// Set the name placeholders
    pub fn names(mut self, names: ExpressionNames) -> Self {
        self.expression_attribute_names = Some(names);
        self
    }

    /// Set the value placeholders
    pub fn values(mut self, values: Item) -> Self {
        self.expression_attribute_values = Some(values);
        self
    }
}

/// Keys to read from one table in a batch
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeysRequest {
    /// Primary keys
    pub keys: Vec<Key>,
    /// Strongly consistent read
    pub consistent_read: Option<bool>,
    /// Attributes to return
    pub projection_expression: Option<String>,
    /// Name placeholders used by the projection
    pub expression_attribute_names: Option<ExpressionNames>,
}

impl KeysRequest {
    /// Read `keys`
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }
}

/// Read many items across tables in one round trip
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetRequest {
    /// Keys to read, per table
    pub request_items: HashMap<String, KeysRequest>,
    /// Consumed capacity reporting
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl BatchGetRequest {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `keys` from `table_name`
    pub fn table(mut self, table_name: impl Into<String>, keys: KeysRequest) -> Self {
        let _ = self.request_items.insert(table_name.into(), keys);
        self
    }
}

/// Key-condition read, optionally across every page
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    /// Table to query
    pub table_name: String,
    /// Secondary index to query instead of the table
    pub index_name: Option<String>,
    /// Key condition
    pub key_condition_expression: String,
    /// Filter applied after the key condition
    pub filter_expression: Option<String>,
    /// Attributes to return
    pub projection_expression: Option<String>,
    /// Name placeholders
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders
    pub expression_attribute_values: Option<Item>,
    /// Items evaluated per page
    pub limit: Option<i32>,
    /// Ascending sort key order (`false` reads backwards)
    pub scan_index_forward: Option<bool>,
    /// Strongly consistent read
    pub consistent_read: Option<bool>,
    /// Attributes to return (`ALL_ATTRIBUTES`, `COUNT`, ...)
    pub select: Option<Select>,
    /// Follow continuation tokens until the result is exhausted
    pub auto_paginate: bool,
}

impl QueryRequest {
    /// Query `table_name` with `key_condition_expression`
    ///
    /// Pagination is automatic unless turned off with
    /// [`QueryRequest::auto_paginate`].
    pub fn new(table_name: impl Into<String>, key_condition_expression: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            key_condition_expression: key_condition_expression.into(),
            filter_expression: None,
            projection_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            limit: None,
            scan_index_forward: None,
            consistent_read: None,
            select: None,
            auto_paginate: true,
        }
    }

    /// Query a secondary index
    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Set the filter expression
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    /// Set the name placeholders
    pub fn names(mut self, names: ExpressionNames) -> Self {
        self.expression_attribute_names = Some(names);
        self
    }

    /// Set the value placeholders
    pub fn values(mut self, values: Item) -> Self {
        self.expression_attribute_values = Some(values);
        self
    }

    /// Items evaluated per page
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Read the sort key range backwards
    pub fn reverse(mut self) -> Self {
        self.scan_index_forward = Some(false);
        self
    }

    /// Fetch every page (`true`) or only the first one (`false`)
    pub fn auto_paginate(mut self, auto_paginate: bool) -> Self {
        self.auto_paginate = auto_paginate;
        self
    }
}

/// Full-table read, optionally across every page
#[derive(Clone, Debug, PartialEq)]
pub struct ScanRequest {
    /// Table to scan
    pub table_name: String,
    /// Secondary index to scan instead of the table
    pub index_name: Option<String>,
    /// Filter applied to every evaluated item
    pub filter_expression: Option<String>,
    /// Attributes to return
    pub projection_expression: Option<String>,
    /// Name placeholders
    pub expression_attribute_names: Option<ExpressionNames>,
    /// Value placeholders
    pub expression_attribute_values: Option<Item>,
    /// Items evaluated per page
    pub limit: Option<i32>,
    /// Strongly consistent read
    pub consistent_read: Option<bool>,
    /// Segment of a parallel scan
    pub segment: Option<i32>,
    /// Number of segments of a parallel scan
    pub total_segments: Option<i32>,
    /// Follow continuation tokens until the result is exhausted
    pub auto_paginate: bool,
}

impl ScanRequest {
    /// Scan `table_name`
    ///
    /// Pagination is automatic unless turned off with
    /// [`ScanRequest::auto_paginate`].
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            filter_expression: None,
            projection_expression: None,
            expression_attribute_names: None,
            expression_attribute_values: None,
            limit: None,
            consistent_read: None,
            segment: None,
            total_segments: None,
            auto_paginate: true,
        }
    }

    /// Scan a secondary index
    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Set the filter expression
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    /// Set the name placeholders
    pub fn names(mut self, names: ExpressionNames) -> Self {
        self.expression_attribute_names = Some(names);
        self
    }

    /// Set the value placeholders
    pub fn values(mut self, values: Item) -> Self {
        self.expression_attribute_values = Some(values);
        self
    }

    /// Items evaluated per page
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Read one segment of a parallel scan
    pub fn segment(mut self, segment: i32, total_segments: i32) -> Self {
        self.segment = Some(segment);
        self.total_segments = Some(total_segments);
        self
    }

    /// Fetch every page (`true`) or only the first one (`false`)
    pub fn auto_paginate(mut self, auto_paginate: bool) -> Self {
        self.auto_paginate = auto_paginate;
        self
    }
}

fn decode_as<T: DeserializeOwned>(item: Option<&Item>) -> Result<Option<T>, Error> {
    item.map(codec::from_item).transpose()
}

/// Result of [`Ddb::get`](crate::Ddb::get)
#[must_use = "response contains the item that was read"]
#[derive(Clone, Debug)]
pub struct GetItemResponse {
    /// Encoded request
    pub input: GetItemInput,
    /// Raw store response
    pub output: GetItemOutput,
    /// Decoded item; `None` when no item exists under the key
    pub result: Option<Item>,
}

impl GetItemResponse {
    /// Deserialize the item into `T`
    pub fn item_as<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        decode_as(self.result.as_ref())
    }
}

/// Result of [`Ddb::put`](crate::Ddb::put)
#[must_use = "response contains the stored item"]
#[derive(Clone, Debug)]
pub struct PutItemResponse {
    /// Encoded request
    pub input: PutItemInput,
    /// Raw store response
    pub output: PutItemOutput,
    /// The item as written, bookkeeping attributes included
    pub result: Item,
}

impl PutItemResponse {
    /// Deserialize the stored item into `T`
    pub fn item_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        codec::from_item(&self.result)
    }
}

/// Result of [`Ddb::update`](crate::Ddb::update)
#[must_use = "response contains the updated item"]
#[derive(Clone, Debug)]
pub struct UpdateItemResponse {
    /// Encoded request
    pub input: UpdateItemInput,
    /// Raw store response
    pub output: UpdateItemOutput,
    /// Full post-update item
    pub result: Item,
}

impl UpdateItemResponse {
    /// Deserialize the updated item into `T`
    pub fn item_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        codec::from_item(&self.result)
    }
}

/// Result of [`Ddb::delete`](crate::Ddb::delete)
#[derive(Clone, Debug)]
pub struct DeleteItemResponse {
    /// Encoded request
    pub input: DeleteItemInput,
    /// Raw store response
    pub output: DeleteItemOutput,
}

/// Result of [`Ddb::batch_get`](crate::Ddb::batch_get)
///
/// Keys the store did not process are left in
/// `output.unprocessed_keys` for the caller to re-drive.
#[must_use = "response contains the items that were read"]
#[derive(Clone, Debug)]
pub struct BatchGetResponse {
    /// Encoded request
    pub input: BatchGetItemInput,
    /// Raw store response
    pub output: BatchGetItemOutput,
    /// Decoded items, per table
    pub result: HashMap<String, Vec<Item>>,
}

impl BatchGetResponse {
    /// Deserialize the items read from `table_name` into `T`
    pub fn items_as<T: DeserializeOwned>(&self, table_name: &str) -> Result<Vec<T>, Error> {
        self.result
            .get(table_name)
            .map(|items| items.iter().map(codec::from_item).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Result of [`Ddb::batch_write`](crate::Ddb::batch_write)
///
/// Unprocessed writes are left in `output.unprocessed_items`.
#[derive(Clone, Debug)]
pub struct BatchWriteResponse {
    /// Request as sent
    pub input: BatchWriteItemInput,
    /// Raw store response
    pub output: BatchWriteItemOutput,
}

/// Result of [`Ddb::query`](crate::Ddb::query): one decoded item list per page
pub type QueryResponse = Paginated<QueryInput, QueryOutput, Vec<Item>>;

/// Result of [`Ddb::scan`](crate::Ddb::scan): one decoded item list per page
pub type ScanResponse = Paginated<ScanInput, ScanOutput, Vec<Item>>;

impl<I, O> Paginated<I, O, Vec<Item>> {
    /// Every item of every page, in page order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.results.iter().flatten()
    }

    /// Deserialize every item of every page into `T`
    pub fn items_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.items().map(codec::from_item).collect()
    }
}

/// Result of [`Ddb::scan_count`](crate::Ddb::scan_count)
#[must_use = "response contains the count"]
#[derive(Clone, Debug)]
pub struct ScanCountResponse {
    /// Encoded page requests
    pub inputs: Vec<ScanInput>,
    /// Raw page responses
    pub outputs: Vec<ScanOutput>,
    /// Count of every page
    pub results: Vec<i64>,
    /// Sum of the page counts
    pub result: i64,
}

/// Result of [`Ddb::transact_get`](crate::Ddb::transact_get)
#[must_use = "response contains the items that were read"]
#[derive(Clone, Debug)]
pub struct TransactGetResponse {
    /// Request as sent
    pub input: TransactGetItemsInput,
    /// Raw store response
    pub output: TransactGetItemsOutput,
    /// One entry per requested member, in request order; `None` where no
    /// item exists
    pub result: Vec<Option<Item>>,
}

impl TransactGetResponse {
    /// Deserialize every member into `T`, keeping the request order
    pub fn items_as<T: DeserializeOwned>(&self) -> Result<Vec<Option<T>>, Error> {
        self.result.iter().map(|item| decode_as(item.as_ref())).collect()
    }
}

/// Result of [`Ddb::transact_write`](crate::Ddb::transact_write)
#[derive(Clone, Debug)]
pub struct TransactWriteResponse {
    /// Request as sent
    pub input: TransactWriteItemsInput,
    /// Raw store response
    pub output: TransactWriteItemsOutput,
}
