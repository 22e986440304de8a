/// Test helpers and fixtures for the item-access tests
///
/// Provides an in-memory [`MockStore`] that plays scripted store responses
/// and records every encoded input it receives, plus LocalStack setup
/// helpers for the live suite.
pub mod fixtures;

pub use ddb_access::setup;
pub use ddb_access::{Ddb, Error, Item, StoreClient, Value, item};
pub use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
pub use fixtures::*;

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
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::OnceCell;

macro_rules! mock_operations {
    ($($op:ident: $input:ty => $output:ty),* $(,)?) => {
        /// Inputs received by the mock, per operation, in call order
        #[derive(Debug, Default)]
        #[allow(dead_code)]
        pub struct Recorded {
            $(pub $op: Vec<$input>,)*
        }

        /// Responses the mock plays back, per operation, in call order
        ///
        /// An operation with nothing scripted answers with an empty output.
        #[derive(Debug, Default)]
        #[allow(dead_code)]
        pub struct Script {
            $(pub $op: VecDeque<Result<$output, Error>>,)*
        }
    };
}

mock_operations! {
    get_item: GetItemInput => GetItemOutput,
    put_item: PutItemInput => PutItemOutput,
    update_item: UpdateItemInput => UpdateItemOutput,
    delete_item: DeleteItemInput => DeleteItemOutput,
    query: QueryInput => QueryOutput,
    scan: ScanInput => ScanOutput,
    batch_get_item: BatchGetItemInput => BatchGetItemOutput,
    batch_write_item: BatchWriteItemInput => BatchWriteItemOutput,
    transact_get_items: TransactGetItemsInput => TransactGetItemsOutput,
    transact_write_items: TransactWriteItemsInput => TransactWriteItemsOutput,
}

/// In-memory store client
#[derive(Debug, Default)]
pub struct MockStore {
    script: Mutex<Script>,
    recorded: Mutex<Recorded>,
}

#[allow(dead_code)]
impl MockStore {
    /// Mock with the given responses scripted
    pub fn scripted(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Facade over a mock with the given responses scripted
    pub fn ddb(script: Script) -> Ddb<MockStore> {
        Ddb::new(Self::scripted(script))
    }

    /// Script more responses
    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Inputs received so far
    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    fn respond<I, O>(
        &self,
        input: I,
        script: impl FnOnce(&mut Script) -> &mut VecDeque<Result<O, Error>>,
        record: impl FnOnce(&mut Recorded) -> &mut Vec<I>,
        fallback: impl FnOnce(&I) -> O,
    ) -> Result<O, Error> {
        let scripted = script(&mut self.script.lock().unwrap()).pop_front();
        let response = scripted.unwrap_or_else(|| Ok(fallback(&input)));
        record(&mut self.recorded.lock().unwrap()).push(input);
        response
    }
}

impl StoreClient for MockStore {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.get_item,
            |r| &mut r.get_item,
            |_| GetItemOutput::builder().build(),
        )
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.put_item,
            |r| &mut r.put_item,
            |_| PutItemOutput::builder().build(),
        )
    }

    /// Unscripted updates answer with the key and the bound update timestamp
    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.update_item,
            |r| &mut r.update_item,
            |input| {
                let mut attributes = input.key.clone().unwrap_or_default();
                if let Some(updated) = input
                    .expression_attribute_values
                    .as_ref()
                    .and_then(|values| values.get(":_u"))
                {
                    let _ = attributes.insert("_u".to_string(), updated.clone());
                }
                UpdateItemOutput::builder()
                    .set_attributes(Some(attributes))
                    .build()
            },
        )
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.delete_item,
            |r| &mut r.delete_item,
            |_| DeleteItemOutput::builder().build(),
        )
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, Error> {
        self.respond(
            input,
            |s| &mut s.query,
            |r| &mut r.query,
            |_| QueryOutput::builder().build(),
        )
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, Error> {
        self.respond(
            input,
            |s| &mut s.scan,
            |r| &mut r.scan,
            |_| ScanOutput::builder().build(),
        )
    }

    async fn batch_get_item(&self, input: BatchGetItemInput) -> Result<BatchGetItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.batch_get_item,
            |r| &mut r.batch_get_item,
            |_| BatchGetItemOutput::builder().build(),
        )
    }

    async fn batch_write_item(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput, Error> {
        self.respond(
            input,
            |s| &mut s.batch_write_item,
            |r| &mut r.batch_write_item,
            |_| BatchWriteItemOutput::builder().build(),
        )
    }

    async fn transact_get_items(
        &self,
        input: TransactGetItemsInput,
    ) -> Result<TransactGetItemsOutput, Error> {
        self.respond(
            input,
            |s| &mut s.transact_get_items,
            |r| &mut r.transact_get_items,
            |_| TransactGetItemsOutput::builder().build(),
        )
    }

    async fn transact_write_items(
        &self,
        input: TransactWriteItemsInput,
    ) -> Result<TransactWriteItemsOutput, Error> {
        self.respond(
            input,
            |s| &mut s.transact_write_items,
            |r| &mut r.transact_write_items,
            |_| TransactWriteItemsOutput::builder().build(),
        )
    }
}

/// Install a test log subscriber (idempotent)
///
/// Honours `RUST_LOG`, e.g. `RUST_LOG=ddb::wire=trace`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ensure DynamoDB client is initialized for the live tests
static TEST_INIT: OnceCell<()> = OnceCell::const_new();

/// Initialize the global DynamoDB client (idempotent)
#[allow(dead_code)]
pub async fn init_test_client() {
    TEST_INIT
        .get_or_init(|| async {
            // Trigger auto-initialization
            let _ = ddb_access::dynamodb_client().await;
        })
        .await;
}

/// Create the reserved-key table used by the live tests
#[allow(dead_code)]
pub async fn setup_table(name: &str) -> Result<(), Error> {
    init_test_client().await;
    let client = ddb_access::dynamodb_client().await;
    let _ = setup::table(client, name).await?;
    Ok(())
}

/// Unique partition key so live tests never see each other's items
#[allow(dead_code)]
pub fn unique_partition(name: &str) -> String {
    format!("{}#{}", name, rusty_ulid::generate_ulid_string())
}
