#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_web::FolioNav;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Element};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("browser document")
}

fn add_section(doc: &Document, id: &str) -> Element {
    let el = doc.create_element("section").expect("create section");
    el.set_id(id);
    doc.body().expect("body").append_child(&el).expect("append");
    el
}

fn nav_item(doc: &Document, id: &str) -> Element {
    doc.query_selector(&format!("[data-section=\"{id}\"]"))
        .expect("valid selector")
        .expect("nav item present")
}

#[wasm_bindgen_test]
fn mount_watches_only_present_sections() {
    let doc = document();
    let added: Vec<Element> = ["about", "resume", "projects"]
        .iter()
        .map(|id| add_section(&doc, id))
        .collect();

    let mut nav = FolioNav::new(None).expect("default site");
    assert_eq!(nav.mount(), 3);
    assert_eq!(nav.active(), "about");
    nav.unmount();
    nav.unmount();

    for el in added {
        el.remove();
    }
}

#[wasm_bindgen_test]
fn mount_marks_first_item_active() {
    let doc = document();
    let mut nav = FolioNav::new(None).expect("default site");
    let holder = doc.create_element("nav").expect("create nav");
    holder.set_inner_html(&nav.nav_html());
    doc.body().expect("body").append_child(&holder).expect("append");

    nav.mount();
    let about = nav_item(&doc, "about");
    let resume = nav_item(&doc, "resume");
    assert!(about.class_list().contains("bg-black"));
    assert!(!resume.class_list().contains("bg-black"));
    assert!(resume.class_list().contains("text-black"));

    nav.unmount();
    holder.remove();
}

#[wasm_bindgen_test]
fn jump_targets_and_config() {
    let nav = FolioNav::new(Some(
        r#"{"sections":[{"id":"intro","label":"Intro"}]}"#.to_string(),
    ))
    .expect("valid config");
    assert_eq!(nav.jump_target("intro").as_deref(), Some("#intro"));
    assert_eq!(nav.jump_target("contact"), None);
    assert!(FolioNav::new(Some("{".to_string())).is_err());
}
