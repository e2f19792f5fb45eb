#![forbid(unsafe_code)]

//! Log level checks for the observer lifecycle.
//!
//! - subscription setup and teardown log at DEBUG with a `region` field
//! - refused watches log at WARN with `region` and `error`
//! - late deliveries after stop log at TRACE
//! - batch propagation runs inside a `folio.propagate` span
//!
//! Run:
//!   cargo test -p folio-runtime --test observer_tracing

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use folio_core::{IntersectionEntry, RegionId, RegionRegistry};
use folio_runtime::{ScriptedSource, VisibilityObserver};
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct Logged {
    level: Level,
    fields: HashMap<&'static str, String>,
    within: Option<&'static str>,
}

#[derive(Debug, Clone)]
enum Record {
    Span(&'static str),
    Event(Logged),
}

impl Logged {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default, Clone)]
struct Journal(Arc<Mutex<Vec<Record>>>);

impl Journal {
    fn push(&self, record: Record) {
        self.0.lock().unwrap().push(record);
    }

    fn events(&self) -> Vec<Logged> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| match r {
                Record::Event(logged) => Some(logged.clone()),
                Record::Span(_) => None,
            })
            .collect()
    }

    fn saying(&self, message: &str) -> Vec<Logged> {
        self.events()
            .into_iter()
            .filter(|e| e.field("message") == Some(message))
            .collect()
    }

    fn opened(&self, name: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|r| matches!(r, Record::Span(n) if *n == name))
    }
}

#[derive(Default)]
struct Fields(HashMap<&'static str, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name(), value.to_string());
    }
}

impl<S> Layer<S> for Journal
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, _: &tracing::span::Id, _: Context<'_, S>) {
        self.push(Record::Span(attrs.metadata().name()));
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let within = ctx.lookup_current().map(|span| span.name());
        self.push(Record::Event(Logged {
            level: *event.metadata().level(),
            fields: fields.0,
            within,
        }));
    }
}

fn journal_of(f: impl FnOnce()) -> Journal {
    let journal = Journal::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(journal.clone());
    tracing::subscriber::with_default(subscriber, f);
    journal
}

fn registry() -> RegionRegistry {
    RegionRegistry::from_pairs([("about", "About"), ("resume", "Resume")])
        .expect("valid registry")
}

fn all(registry: &RegionRegistry) -> BTreeSet<RegionId> {
    registry.ids().cloned().collect()
}

#[test]
fn lifecycle_logs_at_debug_with_region_field() {
    let journal = journal_of(|| {
        let reg = registry();
        let mut observer = VisibilityObserver::new(ScriptedSource::new(), reg.clone());
        observer.start(&all(&reg));
        observer.stop();
    });

    let observing = journal.saying("observing region");
    assert_eq!(observing.len(), 2);
    assert!(observing.iter().all(|e| e.level == Level::DEBUG));
    assert_eq!(observing[0].field("region"), Some("about"));

    let released = journal.saying("released region watch");
    assert_eq!(released.len(), 2);

    let started = journal.saying("visibility observer started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].level, Level::INFO);
}

#[test]
fn refused_watch_logs_warning_with_error() {
    let journal = journal_of(|| {
        let reg = registry();
        let mut source = ScriptedSource::new();
        source.refuse("resume");
        let mut observer = VisibilityObserver::new(source, reg.clone());
        observer.start(&all(&reg));
    });

    let warnings: Vec<_> = journal
        .events()
        .into_iter()
        .filter(|e| e.level == Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("region"), Some("resume"));
    assert!(warnings[0].field("error").is_some());
}

#[test]
fn late_delivery_logs_at_trace() {
    let journal = journal_of(|| {
        let reg = registry();
        let mut observer = VisibilityObserver::new(ScriptedSource::new(), reg.clone());
        observer.start(&all(&reg));
        observer.stop();
        observer
            .source()
            .deliver_late(&[IntersectionEntry::entering("resume")]);
    });

    let late = journal.saying("late delivery ignored");
    assert!(!late.is_empty());
    assert!(late.iter().all(|e| e.level == Level::TRACE));
}

#[test]
fn batched_change_propagates_inside_span() {
    let journal = journal_of(|| {
        let reg = registry();
        let mut observer = VisibilityObserver::new(ScriptedSource::new(), reg.clone());
        let _sub = observer.active().subscribe(|_| {});
        observer.start(&all(&reg));
        observer.source().deliver_entering(&["resume"]);
    });

    assert!(journal.opened("folio.propagate"));
    let flushed = journal.saying("batch flushed");
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].within, Some("folio.propagate"));
}

#[test]
fn unregistered_region_is_logged_not_applied() {
    let journal = journal_of(|| {
        let reg = registry();
        let mut observer = VisibilityObserver::new(ScriptedSource::new(), reg.clone());
        observer.start(&all(&reg));
        observer.source().deliver_entering(&["contact"]);
        assert_eq!(observer.active().get(), "about");
    });

    let ignored = journal.saying("ignoring entry for unregistered region");
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].field("region"), Some("contact"));
}
