use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use aws_sdk_dynamodb::operation::transact_get_items::TransactGetItemsInput;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsInput;
use aws_sdk_dynamodb::types::{ReturnConsumedCapacity, ReturnItemCollectionMetrics};
use std::collections::HashMap;
use tracing::{debug, trace};

use super::pagination::paginate;
use super::types::{
    BatchGetRequest, BatchGetResponse, BatchWriteResponse, DeleteItemRequest,
    DeleteItemResponse, GetItemRequest, GetItemResponse, PutItemRequest, PutItemResponse,
    QueryRequest, QueryResponse, ScanCountResponse, ScanRequest, ScanResponse,
    TransactGetResponse, TransactWriteResponse, UpdateItemRequest, UpdateItemResponse,
};
use crate::codec;
use crate::error::Error;
use crate::store::StoreClient;
use crate::value::Item;

/// Item-access facade over a [`StoreClient`]
///
/// Each method encodes one caller request, runs it through the store
/// (following continuation tokens for `query`, `scan` and `scan_count`) and
/// returns the encoded input, the raw output and the decoded result
/// together. The facade keeps no state between calls and may be shared
/// freely across tasks.
///
/// # Example
///
/// ```rust,no_run
/// use ddb_access::{item, primary_key, Ddb, GetItemRequest, PutItemRequest, UpdateItemRequest};
///
/// # async fn example() -> Result<(), ddb_access::Error> {
/// let ddb = Ddb::from_env().await;
///
/// let put = ddb
///     .put(PutItemRequest::new(
///         "users",
///         item! { "_pk" => "user#1", "_sk" => "profile", "name" => "Ada" },
///     ))
///     .await?;
/// assert!(put.result.contains_key("_c"));
///
/// let updated = ddb
///     .update(
///         UpdateItemRequest::new("users", primary_key("user#1", Some("profile".into())))
///             .expression("SET #n = :n")
///             .names([("#n".to_string(), "name".to_string())].into())
///             .values(item! { ":n" => "Ada Lovelace" }),
///     )
///     .await?;
/// assert_eq!(updated.result["name"].as_str(), Some("Ada Lovelace"));
///
/// let read = ddb
///     .get(GetItemRequest::new("users", primary_key("user#1", Some("profile".into()))))
///     .await?;
/// assert!(read.result.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Ddb<C = Client> {
    client: C,
}

impl Ddb<Client> {
    /// Facade over the global client
    ///
    /// The client is created with the crate defaults on first use unless
    /// [`init`](crate::init) or [`init_with_client`](crate::init_with_client)
    /// ran before.
    pub async fn from_env() -> Self {
        Self::new(crate::dynamodb_client().await.clone())
    }
}

impl<C: StoreClient> Ddb<C> {
    /// Facade over `client`
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying store client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Read one item
    ///
    /// A missing item is not an error: `result` is `None`.
    pub async fn get(&self, request: GetItemRequest) -> Result<GetItemResponse, Error> {
        let input = request.into_input()?;
        trace!(target: "ddb::wire", operation = "get", ?input, "ddb input");

        let output = self.client.get_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "get", ?output, "ddb output");

        let result = output.item.as_ref().map(codec::decode_item);
        debug!(target: "ddb::result", operation = "get", ?result, "ddb result");

        Ok(GetItemResponse {
            input,
            output,
            result,
        })
    }

    /// Write a whole item, replacing any item under the same key
    ///
    /// Creation and update timestamps are added when the item does not
    /// carry them. The result is the item exactly as it was written.
    pub async fn put(&self, request: PutItemRequest) -> Result<PutItemResponse, Error> {
        let input = request.into_input()?;
        let result = written_item(&input)?;
        trace!(target: "ddb::wire", operation = "put", ?input, "ddb input");

        let output = self.client.put_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "put", ?output, "ddb output");
        debug!(target: "ddb::result", operation = "put", ?result, "ddb result");

        Ok(PutItemResponse {
            input,
            output,
            result,
        })
    }

    /// Modify an item in place
    ///
    /// The update timestamp is merged into the update expression and the
    /// result is the full item after the update.
    ///
    /// ```rust,no_run
    /// use ddb_access::{item, primary_key, Ddb, UpdateItemRequest};
    ///
    /// # async fn example(ddb: Ddb) -> Result<(), ddb_access::Error> {
    /// let response = ddb
    ///     .update(
    ///         UpdateItemRequest::new("counters", primary_key("page#home", None))
    ///             .expression("ADD hits :one")
    ///             .values(item! { ":one" => 1 }),
    ///     )
    ///     .await;
    ///
    /// match response {
    ///     Ok(updated) => println!("hits: {:?}", updated.result.get("hits")),
    ///     Err(e) if e.is_conditional_check_failed() => println!("condition failed"),
    ///     Err(e) => return Err(e),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(&self, request: UpdateItemRequest) -> Result<UpdateItemResponse, Error> {
        let input = request.into_input()?;
        trace!(target: "ddb::wire", operation = "update", ?input, "ddb input");

        let output = self.client.update_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "update", ?output, "ddb output");

        let result = output
            .attributes
            .as_ref()
            .map(codec::decode_item)
            .unwrap_or_default();
        debug!(target: "ddb::result", operation = "update", ?result, "ddb result");

        Ok(UpdateItemResponse {
            input,
            output,
            result,
        })
    }

    /// Remove one item
    pub async fn delete(&self, request: DeleteItemRequest) -> Result<DeleteItemResponse, Error> {
        let input = request.into_input()?;
        trace!(target: "ddb::wire", operation = "delete", ?input, "ddb input");

        let output = self.client.delete_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "delete", ?output, "ddb output");
        debug!(target: "ddb::result", operation = "delete", "ddb result");

        Ok(DeleteItemResponse { input, output })
    }

    /// Read many items across tables in one round trip
    ///
    /// Keys the store leaves unprocessed are not retried; they are in
    /// `output.unprocessed_keys`.
    pub async fn batch_get(&self, request: BatchGetRequest) -> Result<BatchGetResponse, Error> {
        let input = request.into_input()?;
        trace!(target: "ddb::wire", operation = "batch_get", ?input, "ddb input");

        let output = self.client.batch_get_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "batch_get", ?output, "ddb output");

        let result: HashMap<String, Vec<Item>> = output
            .responses
            .iter()
            .flatten()
            .map(|(table_name, items)| {
                (
                    table_name.clone(),
                    items.iter().map(codec::decode_item).collect(),
                )
            })
            .collect();
        debug!(target: "ddb::result", operation = "batch_get", ?result, "ddb result");

        Ok(BatchGetResponse {
            input,
            output,
            result,
        })
    }

    /// Send pre-shaped put and delete requests in one round trip
    ///
    /// Items are written as given, without bookkeeping timestamps.
    /// Unprocessed writes are left in `output.unprocessed_items`.
    pub async fn batch_write(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<BatchWriteResponse, Error> {
        trace!(target: "ddb::wire", operation = "batch_write", ?input, "ddb input");

        let output = self.client.batch_write_item(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "batch_write", ?output, "ddb output");
        debug!(target: "ddb::result", operation = "batch_write", "ddb result");

        Ok(BatchWriteResponse { input, output })
    }

    /// Key-condition read
    ///
    /// With `auto_paginate` (the default) every page is fetched; otherwise
    /// only the first one, and `outputs[0].last_evaluated_key` tells whether
    /// more exist.
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse, Error> {
        let (template, auto_paginate) = request.into_template()?;

        paginate(
            "query",
            auto_paginate,
            |exclusive_start_key| {
                Ok(template
                    .clone()
                    .set_exclusive_start_key(exclusive_start_key)
                    .build()?)
            },
            |input| self.client.query(input),
            |output: &QueryOutput| decode_page(output.items.as_deref()),
        )
        .await
    }

    /// Full-table read, paginated like [`Ddb::query`]
    pub async fn scan(&self, request: ScanRequest) -> Result<ScanResponse, Error> {
        let (template, auto_paginate) = request.into_template()?;

        paginate(
            "scan",
            auto_paginate,
            |exclusive_start_key| {
                Ok(template
                    .clone()
                    .set_exclusive_start_key(exclusive_start_key)
                    .build()?)
            },
            |input| self.client.scan(input),
            |output: &ScanOutput| decode_page(output.items.as_deref()),
        )
        .await
    }

    /// Count the items a scan matches without returning them
    pub async fn scan_count(&self, request: ScanRequest) -> Result<ScanCountResponse, Error> {
        let (template, auto_paginate) = request.into_count_template()?;

        let pages = paginate(
            "scan_count",
            auto_paginate,
            |exclusive_start_key| {
                Ok(template
                    .clone()
                    .set_exclusive_start_key(exclusive_start_key)
                    .build()?)
            },
            |input| self.client.scan(input),
            |output: &ScanOutput| i64::from(output.count),
        )
        .await?;

        let result: i64 = pages.results.iter().sum();
        debug!(target: "ddb::result", operation = "scan_count", result, "ddb result");

        Ok(ScanCountResponse {
            inputs: pages.inputs,
            outputs: pages.outputs,
            results: pages.results,
            result,
        })
    }

    /// Atomic snapshot read of several items
    ///
    /// `result[n]` belongs to the n-th requested member and is `None` when
    /// no item exists under its key. Consumed capacity reporting is off
    /// unless the input asks for it.
    pub async fn transact_get(
        &self,
        mut input: TransactGetItemsInput,
    ) -> Result<TransactGetResponse, Error> {
        if input.return_consumed_capacity.is_none() {
            input.return_consumed_capacity = Some(ReturnConsumedCapacity::None);
        }
        trace!(target: "ddb::wire", operation = "transact_get", ?input, "ddb input");

        let output = self.client.transact_get_items(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "transact_get", ?output, "ddb output");

        let result: Vec<Option<Item>> = output
            .responses
            .iter()
            .flatten()
            .map(|response| response.item.as_ref().map(codec::decode_item))
            .collect();
        debug!(target: "ddb::result", operation = "transact_get", ?result, "ddb result");

        Ok(TransactGetResponse {
            input,
            output,
            result,
        })
    }

    /// Apply several writes atomically
    ///
    /// Members are sent as given; build them with [`transact`](super::transact)
    /// to get bookkeeping timestamps. Consumed capacity and item collection
    /// metrics reporting are off unless the input asks for them.
    pub async fn transact_write(
        &self,
        mut input: TransactWriteItemsInput,
    ) -> Result<TransactWriteResponse, Error> {
        if input.return_consumed_capacity.is_none() {
            input.return_consumed_capacity = Some(ReturnConsumedCapacity::None);
        }
        if input.return_item_collection_metrics.is_none() {
            input.return_item_collection_metrics = Some(ReturnItemCollectionMetrics::None);
        }
        trace!(target: "ddb::wire", operation = "transact_write", ?input, "ddb input");

        let output = self.client.transact_write_items(input.clone()).await?;
        trace!(target: "ddb::wire", operation = "transact_write", ?output, "ddb output");
        debug!(target: "ddb::result", operation = "transact_write", "ddb result");

        Ok(TransactWriteResponse { input, output })
    }
}

/// The item a put writes; checked before the store is called
fn written_item(input: &PutItemInput) -> Result<Item, Error> {
    input
        .item
        .as_ref()
        .map(codec::decode_item)
        .ok_or_else(|| Error::InvariantViolation("put request carries no item".to_string()))
}

fn decode_page(items: Option<&[codec::WireItem]>) -> Vec<Item> {
    items
        .unwrap_or_default()
        .iter()
        .map(codec::decode_item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item;

    #[test]
    fn test_written_item_requires_item() {
        let input = PutItemInput::builder().table_name("t").build().unwrap();
        assert!(written_item(&input).unwrap_err().is_invariant_violation());
    }

    #[test]
    fn test_written_item_decodes_stamped_item() {
        let input = PutItemRequest::new("t", item! { "_pk" => "a" })
            .into_input()
            .unwrap();
        let item = written_item(&input).unwrap();
        assert_eq!(item["_pk"], crate::Value::from("a"));
        assert!(item.contains_key("_c"));
    }
}
