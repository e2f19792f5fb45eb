#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and the DOM-backed visibility source.
//!
//! Only compiled on `wasm32` targets.

use folio_core::{IntersectionEntry, ObserverOptions, Rect, RegionId, RegionRegistry};
use folio_runtime::{
    ContainerResolver, EntrySink, Subscription, VisibilityObserver, VisibilitySource, WatchId,
};
use folio_widgets::{NavRequest, NavStyle, NavView};
use js_sys::Array;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DomTokenList, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::host::{ClassList, EntrySnapshot, Site, WebHostError, class_updates, item_selector};

type EntryCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

fn js_error(value: JsValue) -> WebHostError {
    WebHostError::Js(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

impl From<WebHostError> for JsValue {
    fn from(err: WebHostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn document() -> Result<Document, WebHostError> {
    web_sys::window()
        .ok_or(WebHostError::NoWindow)?
        .document()
        .ok_or(WebHostError::NoDocument)
}

fn snapshot(entry: &IntersectionObserverEntry) -> EntrySnapshot {
    let rect = entry.bounding_client_rect();
    EntrySnapshot {
        target_id: entry.target().id(),
        is_intersecting: entry.is_intersecting(),
        intersection_ratio: entry.intersection_ratio(),
        bounding: Rect::new(rect.x(), rect.y(), rect.width(), rect.height()),
        time_ms: entry.time(),
    }
}

fn entries_from_js(entries: &Array) -> Vec<IntersectionEntry> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| match snapshot(&entry).into_entry() {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "dropping intersection entry");
                None
            }
        })
        .collect()
}

struct DomWatch {
    id: WatchId,
    observer: IntersectionObserver,
    // Owned so the JS callback stays valid until disconnect.
    _callback: EntryCallback,
}

/// One `IntersectionObserver` per region, rooted at the viewport.
#[derive(Default)]
pub struct DomVisibilitySource {
    next_id: u64,
    watches: Vec<DomWatch>,
}

impl DomVisibilitySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }
}

impl VisibilitySource for DomVisibilitySource {
    type Container = Element;
    type Error = WebHostError;

    fn observe(
        &mut self,
        region: &RegionId,
        container: Element,
        options: &ObserverOptions,
        sink: EntrySink,
    ) -> Result<WatchId, Self::Error> {
        let callback: EntryCallback =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                let batch = entries_from_js(&entries);
                if !batch.is_empty() {
                    sink.deliver(&batch);
                }
            });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin().to_string());
        let thresholds: Array = options
            .thresholds()
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        init.set_threshold(&thresholds);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_error)?;
        observer.observe(&container);

        self.next_id += 1;
        let id = WatchId::new(self.next_id);
        debug!(region = %region, watch = %id, "intersection observer attached");
        self.watches.push(DomWatch {
            id,
            observer,
            _callback: callback,
        });
        Ok(id)
    }

    fn unobserve(&mut self, id: WatchId) {
        if let Some(idx) = self.watches.iter().position(|w| w.id == id) {
            let watch = self.watches.swap_remove(idx);
            watch.observer.disconnect();
        }
    }
}

/// Resolves region ids with `document.getElementById`.
pub struct DocumentResolver {
    document: Document,
}

impl DocumentResolver {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ContainerResolver<Element> for DocumentResolver {
    fn resolve(&self, id: &RegionId) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl ClassList for DomTokenList {
    fn add_class(&self, class: &str) -> Result<(), WebHostError> {
        self.add_1(class).map_err(js_error)
    }

    fn remove_class(&self, class: &str) -> Result<(), WebHostError> {
        self.remove_1(class).map_err(js_error)
    }
}

fn apply_classes(
    document: &Document,
    style: &NavStyle,
    registry: &RegionRegistry,
    active: &RegionId,
) {
    for (id, toggle) in class_updates(style, registry, active) {
        let items = match document.query_selector_all(&item_selector(&id)) {
            Ok(items) => items,
            Err(err) => {
                debug!(region = %id, error = %js_error(err), "nav items not queried");
                continue;
            }
        };
        for idx in 0..items.length() {
            let Some(item) = items.get(idx).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            toggle.apply_to(&id, &item.class_list());
        }
    }
}

/// Active-section tracking for the current page, exported to JS.
#[wasm_bindgen]
pub struct FolioNav {
    observer: VisibilityObserver<DomVisibilitySource>,
    nav: NavView,
    document: Document,
    class_sync: Option<Subscription>,
}

#[wasm_bindgen]
impl FolioNav {
    /// Create a tracker for the built-in site, or for the sections in
    /// `config_json` (a `SiteConfig` as JSON).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FolioNav, JsValue> {
        let site = Site::from_json(config_json.as_deref())?;
        let observer = VisibilityObserver::with_options(
            DomVisibilitySource::new(),
            site.registry,
            site.options,
        );
        let nav = NavView::new(observer.active().clone());
        Ok(Self {
            observer,
            nav,
            document: document()?,
            class_sync: None,
        })
    }

    /// Watch every section present in the document and keep nav item
    /// classes in sync. Returns the number of sections watched.
    pub fn mount(&mut self) -> u32 {
        let report = self
            .observer
            .start(&DocumentResolver::new(self.document.clone()));

        let document = self.document.clone();
        let style = self.nav.style().clone();
        let registry = self.nav.registry().clone();
        apply_classes(&document, &style, &registry, &self.observer.active().get());
        self.class_sync = Some(
            self.observer
                .active()
                .subscribe(move |id| apply_classes(&document, &style, &registry, id)),
        );

        u32::try_from(report.observed).unwrap_or(u32::MAX)
    }

    /// Release every observer. Late callbacks are ignored.
    pub fn unmount(&mut self) {
        self.class_sync = None;
        self.observer.stop();
    }

    /// Id of the active section.
    pub fn active(&self) -> String {
        self.observer.active().get().to_string()
    }

    /// Markup for the nav list with the current highlight.
    #[wasm_bindgen(js_name = navHtml)]
    pub fn nav_html(&self) -> String {
        self.nav.render_html()
    }

    /// Anchor to jump to for a nav click, or `undefined` for unknown ids.
    #[wasm_bindgen(js_name = jumpTarget)]
    pub fn jump_target(&self, id: &str) -> Option<String> {
        self.nav.activate(id).map(|request| match request {
            NavRequest::JumpTo { anchor } => anchor,
        })
    }
}
