#![allow(dead_code)]

use recoll_model::EntityFactory;
use recoll_resource::mock::MockResource;
use recoll_types::{Params, Record};
use std::io;
use std::sync::{Arc, Mutex};

/// Installs a test-friendly subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Log output captured by [`capture_logs`].
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's events into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

pub fn record(value: serde_json::Value) -> Record {
    Record::from_value(value).expect("test record must be an object")
}

pub fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().expect("test params must be an object")
}

pub fn todos() -> Vec<Record> {
    vec![
        record(serde_json::json!({"id": 1, "title": "write", "status": "open", "owner": "bob"})),
        record(serde_json::json!({"id": 2, "title": "test", "status": "open", "owner": "bob"})),
        record(serde_json::json!({"id": 3, "title": "ship", "status": "done", "owner": "amy"})),
    ]
}

/// A mock seeded with [`todos`] and a factory over it.
pub fn setup() -> (Arc<MockResource>, EntityFactory) {
    init_tracing();
    let mock = Arc::new(MockResource::new().with_records("todos", todos()));
    let factory = EntityFactory::new(mock.clone());
    (mock, factory)
}

/// Lets spawned operations run up to their next suspension point.
pub async fn settle_tasks() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}
