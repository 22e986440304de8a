use aws_sdk_dynamodb::operation::create_table::{CreateTableError, CreateTableOutput};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use crate::error::Error;
use crate::meta::ATTRIBUTE_NAMES;

/// Create a table keyed by the reserved `_pk` / `_sk` attributes
///
/// The table is billed per request. An existing table is not an error, so
/// this can run at the start of every test or demo.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), ddb_access::Error> {
/// let client = ddb_access::dynamodb_client().await;
/// ddb_access::setup::table(client, "orders").await?;
/// # Ok(())
/// # }
/// ```
pub async fn table(client: &Client, name: &str) -> Result<CreateTableOutput, Error> {
    let builder = client
        .create_table()
        .table_name(name)
        .billing_mode(BillingMode::PayPerRequest)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(ATTRIBUTE_NAMES.partition_key)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(ATTRIBUTE_NAMES.sort_key)
                .key_type(KeyType::Range)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(ATTRIBUTE_NAMES.partition_key)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(ATTRIBUTE_NAMES.sort_key)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        );

    // Ignore ResourceInUseException - table already exists
    match builder.send().await {
        Ok(output) => Ok(output),
        Err(e) => {
            if let Some(CreateTableError::ResourceInUseException(_)) = e.as_service_error() {
                debug!(table = name, "table already exists");
                return Ok(CreateTableOutput::builder().build());
            }
            Err(e.into())
        }
    }
}
