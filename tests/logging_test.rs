/// Logging tests
///
/// Every operation reports its encoded input and raw output on the
/// `ddb::wire` target and its decoded result on the `ddb::result` target.
use ddb_access::{GetItemRequest, QueryRequest, primary_key};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

mod helpers;
use helpers::*;

/// Collects formatted log lines in memory
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(max_level: Level) -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

#[tokio::test]
async fn test_get_logs_wire_and_result() {
    let (capture, _guard) = capture(Level::TRACE);
    let ddb = MockStore::ddb(Script::default());

    let _ = ddb
        .get(GetItemRequest::new(TABLE, primary_key("customer#1", None)))
        .await
        .unwrap();

    let lines = capture.lines();
    let wire: Vec<_> = lines.iter().filter(|l| l.contains("ddb::wire")).collect();
    let result: Vec<_> = lines.iter().filter(|l| l.contains("ddb::result")).collect();

    assert_eq!(wire.len(), 2, "input and output: {lines:#?}");
    assert_eq!(result.len(), 1, "{lines:#?}");
    assert!(wire.iter().all(|l| l.contains("TRACE")));
    assert!(result.iter().all(|l| l.contains("DEBUG")));
    assert!(lines.iter().all(|l| l.contains("get")));
}

#[tokio::test]
async fn test_query_logs_every_page() {
    let (capture, _guard) = capture(Level::TRACE);
    let items = orders(1, 2);
    let mut script = Script::default();
    script.query.extend([
        Ok(query_page(&items[0..1], Some(token("order#001")))),
        Ok(query_page(&items[1..2], None)),
    ]);
    let ddb = MockStore::ddb(script);

    let _ = ddb
        .query(QueryRequest::new(TABLE, "_pk = :pk").values(item! { ":pk" => "customer#1" }))
        .await
        .unwrap();

    let lines = capture.lines();
    assert_eq!(
        lines.iter().filter(|l| l.contains("ddb::wire")).count(),
        4,
        "{lines:#?}"
    );
    assert_eq!(
        lines.iter().filter(|l| l.contains("ddb::result")).count(),
        2,
        "{lines:#?}"
    );
}

#[tokio::test]
async fn test_wire_level_is_quiet_at_debug() {
    let (capture, _guard) = capture(Level::DEBUG);
    let ddb = MockStore::ddb(Script::default());

    let _ = ddb
        .get(GetItemRequest::new(TABLE, primary_key("customer#1", None)))
        .await
        .unwrap();

    let lines = capture.lines();
    assert!(!lines.iter().any(|l| l.contains("ddb::wire")), "{lines:#?}");
    assert_eq!(
        lines.iter().filter(|l| l.contains("ddb::result")).count(),
        1
    );
}
