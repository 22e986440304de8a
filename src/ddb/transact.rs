//! Transaction members
//!
//! Builders for the members of [`Ddb::transact_get`](crate::Ddb::transact_get)
//! and [`Ddb::transact_write`](crate::Ddb::transact_write). `put` and
//! `update` apply the same metadata policy as the single-item operations;
//! the transaction calls themselves send members as given.
//!
//! ```rust
//! use ddb_access::ddb::transact;
//! use ddb_access::{item, PutItemRequest, UpdateItemRequest};
//! use aws_sdk_dynamodb::types::TransactWriteItem;
//!
//! # fn main() -> Result<(), ddb_access::Error> {
//! let members = vec![
//!     TransactWriteItem::builder()
//!         .put(transact::put(PutItemRequest::new(
//!             "accounts",
//!             item! { "_pk" => "account#1", "_sk" => "balance", "amount" => 10 },
//!         ))?)
//!         .build(),
//!     TransactWriteItem::builder()
//!         .update(transact::update(
//!             UpdateItemRequest::new("accounts", item! { "_pk" => "account#2", "_sk" => "balance" })
//!                 .expression("ADD amount :delta")
//!                 .values(item! { ":delta" => -10 }),
//!         )?)
//!         .build(),
//! ];
//! assert_eq!(members.len(), 2);
//! # Ok(())
//! # }
//! ```

use aws_sdk_dynamodb::types::{ConditionCheck, Delete, Get, Put, Update};

use super::input::non_empty;
use super::types::{
    ConditionCheckRequest, DeleteItemRequest, GetItemRequest, PutItemRequest, UpdateItemRequest,
};
use crate::codec::{self, encode_values};
use crate::error::Error;

/// Put member; bookkeeping timestamps are stamped like [`Ddb::put`](crate::Ddb::put)
pub fn put(request: PutItemRequest) -> Result<Put, Error> {
    let input = request.into_input()?;

    Ok(Put::builder()
        .set_table_name(input.table_name)
        .set_item(input.item)
        .set_condition_expression(input.condition_expression)
        .set_expression_attribute_names(input.expression_attribute_names)
        .set_expression_attribute_values(input.expression_attribute_values)
        .build()?)
}

/// Update member; the update timestamp is merged in like
/// [`Ddb::update`](crate::Ddb::update)
pub fn update(request: UpdateItemRequest) -> Result<Update, Error> {
    let input = request.into_input()?;

    Ok(Update::builder()
        .set_table_name(input.table_name)
        .set_key(input.key)
        .set_update_expression(input.update_expression)
        .set_condition_expression(input.condition_expression)
        .set_expression_attribute_names(input.expression_attribute_names)
        .set_expression_attribute_values(input.expression_attribute_values)
        .build()?)
}

/// Delete member
pub fn delete(request: DeleteItemRequest) -> Result<Delete, Error> {
    let input = request.into_input()?;

    Ok(Delete::builder()
        .set_table_name(input.table_name)
        .set_key(input.key)
        .set_condition_expression(input.condition_expression)
        .set_expression_attribute_names(input.expression_attribute_names)
        .set_expression_attribute_values(input.expression_attribute_values)
        .build()?)
}

/// Get member
pub fn get(request: GetItemRequest) -> Result<Get, Error> {
    let input = request.into_input()?;

    Ok(Get::builder()
        .set_table_name(input.table_name)
        .set_key(input.key)
        .set_projection_expression(input.projection_expression)
        .set_expression_attribute_names(input.expression_attribute_names)
        .build()?)
}

/// Condition-check member
pub fn condition_check(request: ConditionCheckRequest) -> Result<ConditionCheck, Error> {
    Ok(ConditionCheck::builder()
        .table_name(request.table_name)
        .set_key(Some(codec::encode_item(&request.key)?))
        .condition_expression(request.condition_expression)
        .set_expression_attribute_names(non_empty(request.expression_attribute_names))
        .set_expression_attribute_values(encode_values(
            request.expression_attribute_values.as_ref(),
        )?)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item;
    use aws_sdk_dynamodb::types::AttributeValue;

    #[test]
    fn test_put_member_is_stamped() {
        let put = put(PutItemRequest::new("t", item! { "_pk" => "a", "_c" => 5 })).unwrap();

        assert_eq!(put.table_name, "t");
        assert_eq!(put.item["_c"], AttributeValue::N("5".to_string()));
        assert!(put.item.contains_key("_u"));
    }

    #[test]
    fn test_update_member_merges_timestamp() {
        let update = update(
            UpdateItemRequest::new("t", item! { "_pk" => "a" })
                .expression("REMOVE stale")
                .condition("attribute_exists(#pk)")
                .names([("#pk".to_string(), "_pk".to_string())].into()),
        )
        .unwrap();

        assert_eq!(update.update_expression, "SET #_u = :_u REMOVE stale");
        assert_eq!(
            update.condition_expression.as_deref(),
            Some("attribute_exists(#pk)")
        );
        let names = update.expression_attribute_names.unwrap();
        assert_eq!(names.len(), 2);
        assert!(update.expression_attribute_values.unwrap().contains_key(":_u"));
    }

    #[test]
    fn test_delete_and_get_members_encode_key() {
        let key = item! { "_pk" => "a", "_sk" => "b" };

        let delete = delete(DeleteItemRequest::new("t", key.clone())).unwrap();
        assert_eq!(delete.key, codec::encode_item(&key).unwrap());

        let get = get(GetItemRequest::new("t", key.clone())).unwrap();
        assert_eq!(get.key, codec::encode_item(&key).unwrap());
        assert_eq!(get.table_name, "t");
    }

    #[test]
    fn test_condition_check_member() {
        let check = condition_check(ConditionCheckRequest {
            expression_attribute_values: Some(item! { ":v" => 3 }),
            ..ConditionCheckRequest::new("t", item! { "_pk" => "a" }, "version = :v")
        })
        .unwrap();

        assert_eq!(check.condition_expression, "version = :v");
        assert_eq!(
            check.expression_attribute_values.unwrap()[":v"],
            AttributeValue::N("3".to_string())
        );
    }
}
