//! Sequential multi-page reads
//!
//! Query and Scan return at most one page per call together with a
//! continuation token. [`paginate`] drives the page loop: each page request
//! is built from the caller's template plus the token of the previous
//! response, so pages are fetched strictly one after the other.

use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use std::fmt;
use std::future::Future;
use tracing::{debug, trace};

use crate::codec::WireItem;
use crate::error::Error;

/// A response that may carry a continuation token
pub(crate) trait Continuation {
    /// Key to resume from; `None` once the result is exhausted
    fn last_evaluated_key(&self) -> Option<&WireItem>;
}

impl Continuation for QueryOutput {
    fn last_evaluated_key(&self) -> Option<&WireItem> {
        self.last_evaluated_key.as_ref()
    }
}

impl Continuation for ScanOutput {
    fn last_evaluated_key(&self) -> Option<&WireItem> {
        self.last_evaluated_key.as_ref()
    }
}

/// Every page of a paginated read, in fetch order
///
/// `inputs[n]`, `outputs[n]` and `results[n]` describe the same page.
#[must_use = "response contains the pages that were read"]
#[derive(Clone, Debug)]
pub struct Paginated<I, O, R> {
    /// Encoded page requests
    pub inputs: Vec<I>,
    /// Raw page responses
    pub outputs: Vec<O>,
    /// Decoded page results
    pub results: Vec<R>,
}

impl<I, O, R> Paginated<I, O, R> {
    fn new() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Number of pages fetched
    pub fn pages(&self) -> usize {
        self.outputs.len()
    }
}

/// Fetch pages until the continuation token runs out
///
/// `page_input` turns the current token (`None` for the first page) into a
/// request, `execute` sends it and `page_result` decodes the response. With
/// `auto_paginate` off exactly one page is fetched.
pub(crate) async fn paginate<I, O, R, B, E, F, D>(
    operation: &'static str,
    auto_paginate: bool,
    mut page_input: B,
    mut execute: E,
    mut page_result: D,
) -> Result<Paginated<I, O, R>, Error>
where
    I: Clone + fmt::Debug,
    O: Continuation + fmt::Debug,
    R: fmt::Debug,
    B: FnMut(Option<WireItem>) -> Result<I, Error>,
    E: FnMut(I) -> F,
    F: Future<Output = Result<O, Error>>,
    D: FnMut(&O) -> R,
{
    let mut pages = Paginated::new();
    let mut exclusive_start_key: Option<WireItem> = None;

    loop {
        let input = page_input(exclusive_start_key.take())?;
        trace!(target: "ddb::wire", operation, page = pages.pages(), ?input, "ddb input");

        let output = execute(input.clone()).await?;
        trace!(target: "ddb::wire", operation, page = pages.pages(), ?output, "ddb output");

        let result = page_result(&output);
        debug!(target: "ddb::result", operation, page = pages.pages(), ?result, "ddb result");

        exclusive_start_key = output
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .cloned();

        pages.inputs.push(input);
        pages.outputs.push(output);
        pages.results.push(result);

        if !auto_paginate || exclusive_start_key.is_none() {
            break;
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::operation::query::QueryInput;
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn token(n: usize) -> WireItem {
        WireItem::from([("_pk".to_string(), AttributeValue::S(format!("k{n}")))])
    }

    fn page(count: i32, next: Option<WireItem>) -> QueryOutput {
        QueryOutput::builder()
            .count(count)
            .set_last_evaluated_key(next)
            .build()
    }

    fn input(key: Option<WireItem>) -> Result<QueryInput, Error> {
        Ok(QueryInput::builder()
            .table_name("t")
            .set_exclusive_start_key(key)
            .build()?)
    }

    async fn run(
        outputs: Vec<QueryOutput>,
        auto_paginate: bool,
    ) -> Paginated<QueryInput, QueryOutput, i32> {
        let outputs = Mutex::new(VecDeque::from(outputs));
        paginate(
            "query",
            auto_paginate,
            input,
            |_input| {
                let next = outputs.lock().unwrap().pop_front().expect("scripted page");
                async move { Ok(next) }
            },
            |output: &QueryOutput| output.count,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_follows_tokens_in_order() {
        let pages = run(
            vec![page(2, Some(token(1))), page(2, Some(token(2))), page(1, None)],
            true,
        )
        .await;

        assert_eq!(pages.pages(), 3);
        assert_eq!(pages.results, vec![2, 2, 1]);
        assert_eq!(pages.inputs[0].exclusive_start_key, None);
        assert_eq!(pages.inputs[1].exclusive_start_key, Some(token(1)));
        assert_eq!(pages.inputs[2].exclusive_start_key, Some(token(2)));
    }

    #[tokio::test]
    async fn test_single_page_without_auto_paginate() {
        let pages = run(vec![page(2, Some(token(1))), page(1, None)], false).await;

        assert_eq!(pages.pages(), 1);
        assert_eq!(pages.results, vec![2]);
        assert_eq!(pages.outputs[0].last_evaluated_key, Some(token(1)));
    }

    #[tokio::test]
    async fn test_empty_token_ends_the_loop() {
        let pages = run(vec![page(0, Some(WireItem::new())), page(5, None)], true).await;
        assert_eq!(pages.results, vec![0]);
    }

    #[tokio::test]
    async fn test_page_error_stops_the_loop() {
        let calls = Mutex::new(0);
        let result: Result<Paginated<QueryInput, QueryOutput, i32>, Error> = paginate(
            "query",
            true,
            input,
            |_input| {
                *calls.lock().unwrap() += 1;
                async { Err(Error::InvariantViolation("boom".to_string())) }
            },
            |output: &QueryOutput| output.count,
        )
        .await;

        assert!(result.unwrap_err().is_invariant_violation());
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
