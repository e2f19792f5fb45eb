#![cfg(feature = "config")]
#![forbid(unsafe_code)]

//! Loading site configuration from disk and driving a simulated page with it.

use std::cell::RefCell;
use std::rc::Rc;

use folio::{ConfigError, LayoutSource, NavView, SiteConfig, VisibilityObserver};
use pretty_assertions::assert_eq;

const SITE_TOML: &str = r#"
[[sections]]
id = "intro"
label = "Intro"
height = 400.0

[[sections]]
id = "work"
label = "Work"
height = 1200.0

[[sections]]
id = "talks"
label = "Talks"

[layout]
header_offset = 100.0
section_height = 600.0
trailing_height = 600.0
"#;

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write config");
    path
}

#[test]
fn toml_file_round_trips_through_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "site.toml", SITE_TOML);

    let config = SiteConfig::load(&path).expect("valid config");
    let ids: Vec<&str> = config.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["intro", "work", "talks"]);
    assert_eq!(config, SiteConfig::from_toml_file(&path).unwrap());
}

#[test]
fn json_is_chosen_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json = serde_json::to_string(&SiteConfig::from_toml_str(SITE_TOML).unwrap()).unwrap();
    let path = write(&dir, "site.JSON", &json);

    let config = SiteConfig::load(&path).expect("valid config");
    assert_eq!(config, SiteConfig::from_toml_str(SITE_TOML).unwrap());
}

#[test]
fn load_reports_validation_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        &dir,
        "bad.toml",
        "[[sections]]\nid = \"a\"\nlabel = \"A\"\n\n[[sections]]\nid = \"a\"\nlabel = \"\"\n",
    );

    match SiteConfig::load(&path) {
        Err(ConfigError::Validation(errors)) => assert_eq!(
            errors,
            vec![
                "sections[1].id \"a\" duplicates sections[0]".to_string(),
                "sections[1].label must not be blank".to_string(),
            ]
        ),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = SiteConfig::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error: "));
}

#[test]
fn configured_page_scrolls_through_every_section() {
    let config = SiteConfig::from_toml_str(SITE_TOML).unwrap();
    let page = config.page_layout();
    let mut observer = VisibilityObserver::with_options(
        LayoutSource::new(page.width(), 1000.0),
        config.registry().unwrap(),
        config.observer_options().unwrap(),
    );
    let report = observer.start(&page.containers());
    assert_eq!(report.observed, 3);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let _sub = observer
        .active()
        .subscribe(move |id| seen_clone.borrow_mut().push(id.to_string()));

    let nav = NavView::new(observer.active().clone());
    let mut y = 0.0;
    while y <= page.max_scroll(1000.0) {
        observer.source_mut().scroll_to(y);
        y += 50.0;
    }

    assert_eq!(*seen.borrow(), vec!["work".to_string(), "talks".to_string()]);
    assert_eq!(nav.render_line(40), " Intro  Work [Talks]");
}
