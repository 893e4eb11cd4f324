//! Observer and logging tests

use scoped_di::{ComponentDescriptor, Container, DiError, DiObserver, Key, LoggingObserver, ScopeId};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DiObserver for Recorder {
    fn resolving(&self, key: &Key) {
        self.events.lock().unwrap().push(format!("resolving {}", key.display_name()));
    }

    fn resolved(&self, key: &Key, _duration: Duration) {
        self.events.lock().unwrap().push(format!("resolved {}", key.display_name()));
    }

    fn construction_failed(&self, key: &Key, _error: &DiError) {
        self.events.lock().unwrap().push(format!("failed {}", key.display_name()));
    }
}

#[test]
fn test_observer_sees_nested_resolutions() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::builder().observer(recorder.clone()).build();
    container
        .register("db", ComponentDescriptor::of(|_| Ok(1u8)))
        .register("dao", ComponentDescriptor::of(|_| Ok(2u8)).depends_on("db", "db"));

    container.instance_for("dao").unwrap();

    assert_eq!(
        recorder.events(),
        vec!["resolving dao", "resolving db", "resolved db", "resolved dao"]
    );
}

#[test]
fn test_observer_sees_failures() {
    let recorder = Arc::new(Recorder::default());
    let container = Container::builder().observer(recorder.clone()).build();
    container.register("dao", ComponentDescriptor::of(|_| Ok(2u8)).depends_on("db", "db"));

    assert!(container.instance_for("dao").is_err());
    assert_eq!(
        recorder.events(),
        vec!["resolving dao", "resolving db", "failed db", "failed dao"]
    );
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_logging_observer_emits_tracing_events() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let container = Container::builder()
            .observer(Arc::new(LoggingObserver::with_prefix("app")))
            .build();
        container
            .register("ok", ComponentDescriptor::of(|_| Ok(1u8)))
            .register("odd", ComponentDescriptor::of(|_| Ok(1u8)).in_scope(ScopeId::new("request")));

        container.instance_for("ok").unwrap();
        container.instance_for("odd").unwrap();
        assert!(container.instance_for("missing").is_err());
    });

    let logs = captured.text();
    assert!(logs.contains("resolved component"));
    assert!(logs.contains("constructing component"));
    assert!(logs.contains("no manager for scope, resolving as transient"));
    assert!(logs.contains("resolution failed"));
    assert!(logs.contains("scoped_di"));
}
