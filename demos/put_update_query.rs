/// Example: typed items with bookkeeping metadata and automatic pagination
///
/// Writes a handful of orders, bumps one of them, re-drives unprocessed
/// batch writes by hand and reads the partition back page by page.
///
/// Run against LocalStack:
///
/// ```text
/// AWS_PROFILE=localstack cargo run --example put_update_query
/// ```
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemInput;
use aws_sdk_dynamodb::types::{PutRequest, WriteRequest};
use ddb_access::{
    Ddb, Error, Meta, PutItemRequest, QueryRequest, UpdateItemRequest, codec, item, primary_key,
    setup,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const TABLE: &str = "demo_orders";

#[derive(Debug, Serialize, Deserialize)]
struct Order {
    _pk: String,
    _sk: String,
    total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

/// Batch writes are not retried by the facade; unprocessed items come back
/// in the output and are re-driven here with a growing delay.
async fn batch_write_all(ddb: &Ddb, orders: &[Order]) -> Result<(), Error> {
    let mut requests = Vec::with_capacity(orders.len());
    for order in orders {
        let item = codec::encode_item(&codec::to_item(order)?)?;
        requests.push(
            WriteRequest::builder()
                .put_request(PutRequest::builder().set_item(Some(item)).build()?)
                .build(),
        );
    }

    let mut pending = HashMap::from([(TABLE.to_string(), requests)]);
    let mut delay = Duration::from_millis(100);

    for attempt in 1..=5 {
        let input = BatchWriteItemInput::builder()
            .set_request_items(Some(pending))
            .build()?;
        let response = ddb.batch_write(input).await?;

        match response.output.unprocessed_items {
            Some(unprocessed) if !unprocessed.is_empty() => {
                println!("attempt {attempt}: re-driving unprocessed writes");
                pending = unprocessed;
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            _ => return Ok(()),
        }
    }

    Err(Error::InvariantViolation(
        "batch write still has unprocessed items".to_string(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = ddb_access::dynamodb_client().await;
    let _ = setup::table(client, TABLE).await?;
    let ddb = Ddb::from_env().await;

    // Single put: `_c` and `_u` are stamped
    let put = ddb
        .put(PutItemRequest::new(
            TABLE,
            item! { "_pk" => "customer#1", "_sk" => "order#000", "total" => 5 },
        ))
        .await?;
    println!("stored: {:?}", Meta::from_item(&put.result));

    // Batch writes go through unchanged, without timestamps
    let orders: Vec<Order> = (1..=7)
        .map(|n| Order {
            _pk: "customer#1".to_string(),
            _sk: format!("order#{n:03}"),
            total: n * 10,
            note: None,
        })
        .collect();
    batch_write_all(&ddb, &orders).await?;

    // Update: the update timestamp joins the SET clause
    let updated = ddb
        .update(
            UpdateItemRequest::new(TABLE, primary_key("customer#1", Some("order#003".into())))
                .expression("SET note = :note ADD #total :bonus")
                .names([("#total".to_string(), "total".to_string())].into())
                .values(item! { ":note" => "gift", ":bonus" => 1 }),
        )
        .await?;
    let order: Order = updated.item_as()?;
    println!("updated: {order:?}");

    // Query: three items per page, every page fetched
    let pages = ddb
        .query(
            QueryRequest::new(TABLE, "#pk = :pk")
                .names([("#pk".to_string(), "_pk".to_string())].into())
                .values(item! { ":pk" => "customer#1" })
                .limit(3),
        )
        .await?;
    println!("{} pages", pages.pages());
    for order in pages.items_as::<Order>()? {
        println!("  {} {}", order._sk, order.total);
    }

    Ok(())
}
