//! # DynamoDB Item Access
//!
//! A typed item-access layer over DynamoDB:
//! - Attribute marshalling between a native [`Value`] model and the wire format
//! - Automatic, strictly sequential pagination for query and scan
//! - Bookkeeping metadata (`_c` created, `_u` updated) stamped on every write
//! - Uniform request/response records for single-item, batch, paginated and
//!   transactional operations
//!
//! ## Features
//!
//! - **Lossless values**: numbers keep their decimal text; keys round-trip exactly
//! - **Safe update merging**: update expressions are parsed into clauses before
//!   the update timestamp is merged in
//! - **Monotonic timestamps**: `_u` strictly increases within a process
//! - **Pluggable store**: the facade runs over any [`StoreClient`]
//! - **Structured logging**: every call is traced through `tracing`
//!   (`ddb::wire` at TRACE, `ddb::result` at DEBUG)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ddb_access::{item, primary_key, Ddb, Error, GetItemRequest, PutItemRequest, QueryRequest};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     _sk: String,
//!     total: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     // Initialize the global DynamoDB client
//!     let config = aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
//!     ddb_access::init(&config).await;
//!
//!     let ddb = Ddb::from_env().await;
//!
//!     // Put an item; `_c` and `_u` are added
//!     ddb.put(PutItemRequest::new(
//!         "orders",
//!         item! { "_pk" => "user#1", "_sk" => "order#1", "total" => 42 },
//!     ))
//!     .await?;
//!
//!     // Get an item
//!     let read = ddb
//!         .get(GetItemRequest::new("orders", primary_key("user#1", Some("order#1".into()))))
//!         .await?;
//!     let order: Option<Order> = read.item_as()?;
//!
//!     // Query every page of a partition
//!     let pages = ddb
//!         .query(
//!             QueryRequest::new("orders", "#pk = :pk")
//!                 .names([("#pk".to_string(), "_pk".to_string())].into())
//!                 .values(item! { ":pk" => "user#1" }),
//!         )
//!         .await?;
//!     let orders: Vec<Order> = pages.items_as()?;
//!
//!     Ok(())
//! }
//! ```
#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unknown_lints,
    unreachable_code,
    unused_mut
)]
#![warn(
    unused,
    missing_docs,
    unreachable_pub,
    unused_qualifications,
    unused_results,
    deprecated
)]

mod error;
pub use error::Error;

/// Native value model
pub mod value;

pub mod codec;
pub mod ddb;
pub mod expression;
pub mod meta;
pub mod store;

/// Table setup utilities for tests and demos
pub mod setup;

// Re-export main types for convenience
pub use ddb::{
    BatchGetRequest, BatchGetResponse, BatchWriteResponse, ConditionCheckRequest, Ddb,
    DeleteItemRequest, DeleteItemResponse, ExpressionNames, GetItemRequest, GetItemResponse,
    KeysRequest, Paginated, PutItemRequest, PutItemResponse, QueryRequest, QueryResponse,
    ScanCountResponse, ScanRequest, ScanResponse, TransactGetResponse, TransactWriteResponse,
    UpdateItemRequest, UpdateItemResponse,
};
pub use meta::{ATTRIBUTE_NAMES, AttributeNames, Meta, Timestamp, primary_key};
pub use store::StoreClient;
pub use value::{Item, Key, Number, Value};

// Re-export aws-config types for configuration
pub use aws_config::{
    BehaviorVersion, Region, SdkConfig, defaults,
    meta::region::{ProvideRegion, RegionProviderChain},
    retry::{RetryConfig, RetryMode},
    timeout::TimeoutConfig,
};

// Re-export aws-types for advanced configuration
pub use aws_types::sdk_config::Builder as SdkConfigBuilder;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use tokio::sync::OnceCell;

/// Global DynamoDB client instance
static GLOBAL_CLIENT: OnceCell<DynamoDbClient> = OnceCell::const_new();

/// Build the default client configuration
///
/// Retries and timeouts live in the client, this crate never retries on its
/// own:
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
async fn aws_config_defaults() -> SdkConfig {
    use std::time::Duration;

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(3))
        .read_timeout(Duration::from_secs(20))
        .operation_timeout(Duration::from_secs(60))
        .build();

    let mut loader = defaults(BehaviorVersion::latest())
        .retry_config(
            RetryConfig::adaptive()
                .with_max_attempts(3)
                .with_initial_backoff(Duration::from_secs(1)),
        )
        .timeout_config(timeout_config);

    if std::env::var("AWS_PROFILE").unwrap_or_default() == "localstack" {
        tracing::debug!(endpoint = LOCALSTACK_ENDPOINT, "using localstack endpoint");
        loader = loader.endpoint_url(LOCALSTACK_ENDPOINT);
    }

    loader.load().await
}

const LOCALSTACK_ENDPOINT: &str = "http://127.0.0.1:4566";

/// Initialize the global DynamoDB client with a custom AWS config
///
/// Has no effect once the global client exists.
///
/// # Example
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() {
///     let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
///         .region(aws_config::Region::new("us-west-2"))
///         .load()
///         .await;
///     ddb_access::init(&config).await;
/// }
/// ```
pub async fn init(config: &SdkConfig) {
    let _ = GLOBAL_CLIENT
        .get_or_init(|| async { DynamoDbClient::new(config) })
        .await;
}

/// Initialize the global DynamoDB client with a custom client instance
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
///
/// #[tokio::main]
/// async fn main() {
///     let config = aws_config::load_from_env().await;
///     ddb_access::init_with_client(Client::new(&config)).await;
/// }
/// ```
pub async fn init_with_client(client: DynamoDbClient) {
    let _ = GLOBAL_CLIENT.get_or_init(|| async { client }).await;
}

/// Get a reference to the global DynamoDB client
///
/// Initializes it with the defaults described on [`init`] (adaptive retry,
/// bounded timeouts, LocalStack endpoint under `AWS_PROFILE=localstack`)
/// unless [`init`] or [`init_with_client`] ran first.
pub async fn dynamodb_client() -> &'static DynamoDbClient {
    GLOBAL_CLIENT
        .get_or_init(|| async {
            let config = aws_config_defaults().await;
            DynamoDbClient::new(&config)
        })
        .await
}
