//! The store seam
//!
//! [`StoreClient`] executes one fully encoded request against the store and
//! returns its native response. The facade never talks to the network
//! directly, so the same code runs against `aws_sdk_dynamodb::Client` in
//! production and an in-memory double in tests.

use aws_sdk_dynamodb::Client;
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
use std::future::Future;

use crate::error::Error;

/// Executes encoded requests against the store
///
/// Implementations must be safe for concurrent use; errors are returned
/// unchanged, with no local translation or retry.
pub trait StoreClient: Send + Sync {
    /// GetItem
    fn get_item(
        &self,
        input: GetItemInput,
    ) -> impl Future<Output = Result<GetItemOutput, Error>> + Send;

    /// PutItem
    fn put_item(
        &self,
        input: PutItemInput,
    ) -> impl Future<Output = Result<PutItemOutput, Error>> + Send;

    /// UpdateItem
    fn update_item(
        &self,
        input: UpdateItemInput,
    ) -> impl Future<Output = Result<UpdateItemOutput, Error>> + Send;

    /// DeleteItem
    fn delete_item(
        &self,
        input: DeleteItemInput,
    ) -> impl Future<Output = Result<DeleteItemOutput, Error>> + Send;

    /// Query, one page
    fn query(&self, input: QueryInput) -> impl Future<Output = Result<QueryOutput, Error>> + Send;

    /// Scan, one page
    fn scan(&self, input: ScanInput) -> impl Future<Output = Result<ScanOutput, Error>> + Send;

    /// BatchGetItem
    fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> impl Future<Output = Result<BatchGetItemOutput, Error>> + Send;

    /// BatchWriteItem
    fn batch_write_item(
        &self,
        input: BatchWriteItemInput,
    ) -> impl Future<Output = Result<BatchWriteItemOutput, Error>> + Send;

    /// TransactGetItems
    fn transact_get_items(
        &self,
        input: TransactGetItemsInput,
    ) -> impl Future<Output = Result<TransactGetItemsOutput, Error>> + Send;

    /// TransactWriteItems
    fn transact_write_items(
        &self,
        input: TransactWriteItemsInput,
    ) -> impl Future<Output = Result<TransactWriteItemsOutput, Error>> + Send;
}

impl StoreClient for Client {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, Error> {
        Ok(self
            .get_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_consistent_read(input.consistent_read)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .send()
            .await?)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, Error> {
        Ok(self
            .put_item()
            .set_table_name(input.table_name)
            .set_item(input.item)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?)
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, Error> {
        Ok(self
            .update_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?)
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput, Error> {
        Ok(self
            .delete_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_return_values(input.return_values)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values_on_condition_check_failure(
                input.return_values_on_condition_check_failure,
            )
            .send()
            .await?)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, Error> {
        Ok(self
            .query()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_select(input.select)
            .set_limit(input.limit)
            .set_consistent_read(input.consistent_read)
            .set_scan_index_forward(input.scan_index_forward)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_projection_expression(input.projection_expression)
            .set_filter_expression(input.filter_expression)
            .set_key_condition_expression(input.key_condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .send()
            .await?)
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, Error> {
        Ok(self
            .scan()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_limit(input.limit)
            .set_select(input.select)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_total_segments(input.total_segments)
            .set_segment(input.segment)
            .set_projection_expression(input.projection_expression)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_consistent_read(input.consistent_read)
            .send()
            .await?)
    }

    async fn batch_get_item(&self, input: BatchGetItemInput) -> Result<BatchGetItemOutput, Error> {
        Ok(self
            .batch_get_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await?)
    }

    async fn batch_write_item(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput, Error> {
        Ok(self
            .batch_write_item()
            .set_request_items(input.request_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .send()
            .await?)
    }

    async fn transact_get_items(
        &self,
        input: TransactGetItemsInput,
    ) -> Result<TransactGetItemsOutput, Error> {
        Ok(self
            .transact_get_items()
            .set_transact_items(input.transact_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .send()
            .await?)
    }

    async fn transact_write_items(
        &self,
        input: TransactWriteItemsInput,
    ) -> Result<TransactWriteItemsOutput, Error> {
        Ok(self
            .transact_write_items()
            .set_transact_items(input.transact_items)
            .set_return_consumed_capacity(input.return_consumed_capacity)
            .set_return_item_collection_metrics(input.return_item_collection_metrics)
            .set_client_request_token(input.client_request_token)
            .send()
            .await?)
    }
}
