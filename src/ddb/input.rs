//! Request encoding
//!
//! Turns the caller-shaped requests into the store's operation inputs,
//! applying the metadata policy on the way. The transaction member builders
//! reuse the same encodings.

use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemInput;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemInput;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::builders::QueryInputBuilder;
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::builders::ScanInputBuilder;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
use aws_sdk_dynamodb::types::{KeysAndAttributes, ReturnConsumedCapacity, ReturnValue, Select};
use std::collections::HashMap;

use super::types::{
    ExpressionNames, BatchGetRequest, DeleteItemRequest, GetItemRequest, PutItemRequest,
    QueryRequest, ScanRequest, UpdateItemRequest,
};
use crate::codec::{self, encode_values};
use crate::error::Error;
use crate::meta;

/// The store rejects an empty name map
pub(super) fn non_empty(names: Option<ExpressionNames>) -> Option<ExpressionNames> {
    if cfg!(debug_assertions) {
        names.iter().for_each(meta::assert_reserved_placeholders);
    }
    names.filter(|names| !names.is_empty())
}

impl GetItemRequest {
    pub(crate) fn into_input(self) -> Result<GetItemInput, Error> {
        Ok(GetItemInput::builder()
            .table_name(self.table_name)
            .set_key(Some(codec::encode_item(&self.key)?))
            .set_consistent_read(self.consistent_read)
            .set_projection_expression(self.projection_expression)
            .set_expression_attribute_names(non_empty(self.expression_attribute_names))
            .build()?)
    }
}

impl PutItemRequest {
    /// Stamps bookkeeping timestamps before encoding
    pub(crate) fn into_input(self) -> Result<PutItemInput, Error> {
        let item = meta::apply_on_put(self.item);

        Ok(PutItemInput::builder()
            .table_name(self.table_name)
            .set_item(Some(codec::encode_item(&item)?))
            .set_condition_expression(self.condition_expression)
            .set_expression_attribute_names(non_empty(self.expression_attribute_names))
            .set_expression_attribute_values(encode_values(
                self.expression_attribute_values.as_ref(),
            )?)
            .set_return_values(self.return_values)
            .build()?)
    }
}

impl UpdateItemRequest {
    /// Merges the update timestamp into the expression and asks for the full
    /// post-update image
    pub(crate) fn into_input(self) -> Result<UpdateItemInput, Error> {
        let parts = meta::apply_on_update(
            self.update_expression.as_deref(),
            self.expression_attribute_names,
            self.expression_attribute_values,
        )?;

        Ok(UpdateItemInput::builder()
            .table_name(self.table_name)
            .set_key(Some(codec::encode_item(&self.key)?))
            .update_expression(parts.update_expression)
            .set_condition_expression(self.condition_expression)
            .set_expression_attribute_names(non_empty(Some(parts.expression_attribute_names)))
            .set_expression_attribute_values(encode_values(Some(
                &parts.expression_attribute_values,
            ))?)
            .return_values(ReturnValue::AllNew)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .build()?)
    }
}

impl DeleteItemRequest {
    pub(crate) fn into_input(self) -> Result<DeleteItemInput, Error> {
        Ok(DeleteItemInput::builder()
            .table_name(self.table_name)
            .set_key(Some(codec::encode_item(&self.key)?))
            .set_condition_expression(self.condition_expression)
            .set_expression_attribute_names(non_empty(self.expression_attribute_names))
            .set_expression_attribute_values(encode_values(
                self.expression_attribute_values.as_ref(),
            )?)
            .set_return_values(self.return_values)
            .build()?)
    }
}

impl BatchGetRequest {
    pub(crate) fn into_input(self) -> Result<BatchGetItemInput, Error> {
        let mut request_items = HashMap::with_capacity(self.request_items.len());

        for (table_name, keys) in self.request_items {
            let encoded = keys
                .keys
                .iter()
                .map(codec::encode_item)
                .collect::<Result<Vec<_>, _>>()?;

            let keys_and_attributes = KeysAndAttributes::builder()
                .set_keys(Some(encoded))
                .set_consistent_read(keys.consistent_read)
                .set_projection_expression(keys.projection_expression)
                .set_expression_attribute_names(non_empty(keys.expression_attribute_names))
                .build()?;

            let _ = request_items.insert(table_name, keys_and_attributes);
        }

        Ok(BatchGetItemInput::builder()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(self.return_consumed_capacity)
            .build()?)
    }
}

impl QueryRequest {
    /// Page template; the continuation token is filled in per page
    pub(crate) fn into_template(self) -> Result<(QueryInputBuilder, bool), Error> {
        let template = QueryInput::builder()
            .table_name(self.table_name)
            .set_index_name(self.index_name)
            .key_condition_expression(self.key_condition_expression)
            .set_filter_expression(self.filter_expression)
            .set_projection_expression(self.projection_expression)
            .set_expression_attribute_names(non_empty(self.expression_attribute_names))
            .set_expression_attribute_values(encode_values(
                self.expression_attribute_values.as_ref(),
            )?)
            .set_limit(self.limit)
            .set_scan_index_forward(self.scan_index_forward)
            .set_consistent_read(self.consistent_read)
            .set_select(self.select);

        Ok((template, self.auto_paginate))
    }
}

impl ScanRequest {
    /// Page template; the continuation token is filled in per page
    pub(crate) fn into_template(self) -> Result<(ScanInputBuilder, bool), Error> {
        let template = ScanInput::builder()
            .table_name(self.table_name)
            .set_index_name(self.index_name)
            .set_filter_expression(self.filter_expression)
            .set_projection_expression(self.projection_expression)
            .set_expression_attribute_names(non_empty(self.expression_attribute_names))
            .set_expression_attribute_values(encode_values(
                self.expression_attribute_values.as_ref(),
            )?)
            .set_limit(self.limit)
            .set_consistent_read(self.consistent_read)
            .set_segment(self.segment)
            .set_total_segments(self.total_segments);

        Ok((template, self.auto_paginate))
    }

    /// Page template that only counts matching items
    pub(crate) fn into_count_template(self) -> Result<(ScanInputBuilder, bool), Error> {
        let (template, auto_paginate) = self.into_template()?;
        Ok((template.select(Select::Count), auto_paginate))
    }
}
