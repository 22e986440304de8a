use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemError;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_get_items::TransactGetItemsError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use serde_dynamo::Error as SerdeDynamoError;
use std::error::Error as StdError;
use std::fmt;

type DynamoPutError = SdkError<PutItemError, Response>;
type DynamoUpdateError = SdkError<UpdateItemError, Response>;
type DynamoGetError = SdkError<GetItemError, Response>;
type DynamoQueryError = SdkError<QueryError, Response>;
type DynamoScanError = SdkError<ScanError, Response>;
type DynamoDeleteItemError = SdkError<DeleteItemError, Response>;
type DynamoCreateTableError = SdkError<CreateTableError, Response>;
type DynamoBatchWriteItemError = SdkError<BatchWriteItemError, Response>;
type DynamoBatchGetItemError = SdkError<BatchGetItemError, Response>;
type DynamoTransactGetError = SdkError<TransactGetItemsError, Response>;
type DynamoTransactWriteError = SdkError<TransactWriteItemsError, Response>;

/// Item-access error
///
/// Store failures are carried unchanged, one variant per operation, so the
/// caller can branch on the store's own signals (condition failures,
/// cancelled transactions, throttling).
#[derive(Debug)]
pub enum Error {
    /// A native value has no representation in the attribute grammar
    UnsupportedValue(String),
    /// An update expression could not be split into clauses
    InvalidUpdateExpression(String),
    /// Serde DynamoDB serialization/deserialization error
    SerdeDynamo(SerdeDynamoError),
    /// DynamoDB request builder error
    BuildError(BuildError),
    /// An internal expectation was broken
    InvariantViolation(String),
    /// DynamoDB PutItem operation error
    DynamoPutError(DynamoPutError),
    /// DynamoDB GetItem operation error
    DynamoGetError(DynamoGetError),
    /// DynamoDB Query operation error
    DynamoQueryError(DynamoQueryError),
    /// DynamoDB Scan operation error
    DynamoScanError(DynamoScanError),
    /// DynamoDB UpdateItem operation error
    DynamoUpdateError(DynamoUpdateError),
    /// DynamoDB DeleteItem operation error
    DynamoDeleteItemError(DynamoDeleteItemError),
    /// DynamoDB CreateTable operation error
    DynamoCreateTableError(DynamoCreateTableError),
    /// DynamoDB BatchWriteItem operation error
    DynamoBatchWriteItemError(DynamoBatchWriteItemError),
    /// DynamoDB BatchGetItem operation error
    DynamoBatchGetItemError(DynamoBatchGetItemError),
    /// DynamoDB TransactGetItems operation error
    DynamoTransactGetError(DynamoTransactGetError),
    /// DynamoDB TransactWriteItems operation error
    DynamoTransactWriteError(DynamoTransactWriteError),
}

impl Error {
    /// Check if the error is a DynamoDB ConditionalCheckFailedException
    ///
    /// Covers put, update and delete, the three writes that accept a
    /// condition expression.
    ///
    /// # Example
    /// ```no_run
    /// # use ddb_access::Error;
    /// # async fn example(error: Error) {
    /// if error.is_conditional_check_failed() {
    ///     // Handle optimistic locking failure
    ///     println!("Item was modified by another process");
    /// }
    /// # }
    /// ```
    pub fn is_conditional_check_failed(&self) -> bool {
        match self {
            Error::DynamoPutError(e) => matches!(
                e.as_service_error(),
                Some(PutItemError::ConditionalCheckFailedException(_))
            ),
            Error::DynamoUpdateError(e) => matches!(
                e.as_service_error(),
                Some(UpdateItemError::ConditionalCheckFailedException(_))
            ),
            Error::DynamoDeleteItemError(e) => matches!(
                e.as_service_error(),
                Some(DeleteItemError::ConditionalCheckFailedException(_))
            ),
            _ => false,
        }
    }

    /// Check if the store rejected a single-item write (put, update, delete)
    pub fn is_write_error(&self) -> bool {
        matches!(
            self,
            Error::DynamoPutError(_) | Error::DynamoUpdateError(_) | Error::DynamoDeleteItemError(_)
        )
    }

    /// Check if a transactional read or write failed as a whole
    pub fn is_transaction_error(&self) -> bool {
        matches!(
            self,
            Error::DynamoTransactGetError(_) | Error::DynamoTransactWriteError(_)
        )
    }

    /// Check if the store cancelled a transaction (a member condition failed,
    /// a conflict occurred, ...)
    pub fn is_transaction_canceled(&self) -> bool {
        match self {
            Error::DynamoTransactWriteError(e) => matches!(
                e.as_service_error(),
                Some(TransactWriteItemsError::TransactionCanceledException(_))
            ),
            Error::DynamoTransactGetError(e) => matches!(
                e.as_service_error(),
                Some(TransactGetItemsError::TransactionCanceledException(_))
            ),
            _ => false,
        }
    }

    /// Check if the error is a serialization/deserialization error
    ///
    /// Returns `true` for DynamoDB serialization errors.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::SerdeDynamo(_))
    }

    /// Check if the request could not be encoded
    ///
    /// These are raised before any network call and are fixed by correcting
    /// the input.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedValue(_)
                | Error::InvalidUpdateExpression(_)
                | Error::SerdeDynamo(_)
                | Error::BuildError(_)
        )
    }

    /// Check if an internal invariant was broken
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::InvariantViolation(_))
    }

    /// Check if the error is a DynamoDB-related error
    ///
    /// Returns `true` for any error surfaced by the store.
    pub fn is_dynamodb_error(&self) -> bool {
        !self.is_encoding_error() && !self.is_invariant_violation()
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
    ($name:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$name(e)
            }
        }
    };
}

impl_from_error!(SerdeDynamoError, SerdeDynamo);
impl_from_error!(BuildError);
impl_from_error!(DynamoPutError);
impl_from_error!(DynamoGetError);
impl_from_error!(DynamoUpdateError);
impl_from_error!(DynamoQueryError);
impl_from_error!(DynamoScanError);
impl_from_error!(DynamoDeleteItemError);
impl_from_error!(DynamoCreateTableError);
impl_from_error!(DynamoBatchWriteItemError);
impl_from_error!(DynamoBatchGetItemError);
impl_from_error!(DynamoTransactGetError);
impl_from_error!(DynamoTransactWriteError);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedValue(e) => write!(f, "Unsupported attribute value: {}", e),
            Error::InvalidUpdateExpression(e) => write!(f, "Invalid update expression: {}", e),
            Error::SerdeDynamo(e) => write!(f, "DynamoDB serialization error: {}", e),
            Error::BuildError(e) => write!(f, "DynamoDB request builder error: {}", e),
            Error::InvariantViolation(e) => write!(f, "Invariant violation: {}", e),
            Error::DynamoPutError(e) => {
                write!(f, "DynamoDB PutItem operation failed: {}", e)
            }
            Error::DynamoGetError(e) => {
                write!(f, "DynamoDB GetItem operation failed: {}", e)
            }
            Error::DynamoQueryError(e) => {
                write!(f, "DynamoDB Query operation failed: {}", e)
            }
            Error::DynamoScanError(e) => {
                write!(f, "DynamoDB Scan operation failed: {}", e)
            }
            Error::DynamoUpdateError(e) => {
                write!(f, "DynamoDB UpdateItem operation failed: {}", e)
            }
            Error::DynamoDeleteItemError(e) => {
                write!(f, "DynamoDB DeleteItem operation failed: {}", e)
            }
            Error::DynamoCreateTableError(e) => {
                write!(f, "DynamoDB CreateTable operation failed: {}", e)
            }
            Error::DynamoBatchWriteItemError(e) => {
                write!(f, "DynamoDB BatchWriteItem operation failed: {}", e)
            }
            Error::DynamoBatchGetItemError(e) => {
                write!(f, "DynamoDB BatchGetItem operation failed: {}", e)
            }
            Error::DynamoTransactGetError(e) => {
                write!(f, "DynamoDB TransactGetItems operation failed: {}", e)
            }
            Error::DynamoTransactWriteError(e) => {
                write!(f, "DynamoDB TransactWriteItems operation failed: {}", e)
            }
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_is_encoding_error() {
        let err = Error::BuildError(BuildError::other("test"));
        assert!(err.is_encoding_error());
        assert!(!err.is_dynamodb_error());
        assert!(!err.is_serialization_error());
    }

    #[test]
    fn test_unsupported_value_is_encoding_error() {
        let err = Error::UnsupportedValue("NaN".to_string());
        assert!(err.is_encoding_error());
        assert!(!err.is_write_error());
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_invariant_violation() {
        let err = Error::InvariantViolation("no item".to_string());
        assert!(err.is_invariant_violation());
        assert!(!err.is_dynamodb_error());
        assert!(!err.is_conditional_check_failed());
    }

    #[test]
    fn test_error_conversion() {
        let build_err = BuildError::other("test");
        let err: Error = build_err.into();
        assert!(matches!(err, Error::BuildError(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = Error::BuildError(BuildError::other("test"));
        let debug = format!("{:?}", err);
        assert!(debug.contains("BuildError"));
    }
}
