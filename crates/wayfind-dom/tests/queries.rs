//! Query tests for wayfind-dom
//!
//! Selector lookups, containment and mutation logging over a small
//! dashboard-shaped document.

use proptest::prelude::*;
use wayfind_dom::{DOMRect, Dom, DomTree, MutationKind, NodeId, Selector};

fn dashboard() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::with_viewport(1280.0, 800.0);
    let body = tree.append_element(tree.root(), "body");

    let header = tree.append_element(body, "header");
    tree.set_attr(header, "role", "banner");
    let nav = tree.append_element(body, "nav");
    tree.set_attr(nav, "id", "main-nav");

    let main = tree.append_element(body, "main");
    tree.set_attr(main, "id", "main-content");
    let list = tree.append_element(main, "ul");
    for i in 0..3 {
        let item = tree.append_element(list, "li");
        tree.set_attr(item, "class", "data-list__item");
        let edit = tree.append_element(item, "button");
        tree.set_attr(edit, "class", "action-edit");
        tree.set_layout(edit, DOMRect::from_xywh(900.0, 200.0 + 50.0 * i as f64, 32.0, 32.0));
    }
    (tree, header, main)
}

#[test]
fn test_select_by_role_and_id() {
    let (tree, header, main) = dashboard();

    assert_eq!(tree.select("[role=\"banner\"]"), Some(header));
    assert_eq!(tree.select("#main-content"), Some(main));
    assert_eq!(tree.get_element_by_id("main-content"), Some(main));
    assert_eq!(tree.select("#missing"), None);
}

#[test]
fn test_query_all_in_document_order() {
    let (tree, _, main) = dashboard();
    let sel = Selector::parse(".data-list__item .action-edit").unwrap();

    let buttons = tree.query_selector_all(main, &sel);
    assert_eq!(buttons.len(), 3);

    let ys: Vec<f64> = buttons.iter().map(|&b| tree.rect(b).unwrap().y).collect();
    assert_eq!(ys, vec![200.0, 250.0, 300.0]);
}

#[test]
fn test_closest() {
    let (tree, _, main) = dashboard();
    let button = tree.select(".action-edit").unwrap();
    let item = Selector::parse(".data-list__item").unwrap();
    let main_sel = Selector::parse("main").unwrap();

    assert_eq!(tree.closest(button, &main_sel), Some(main));
    assert_eq!(tree.closest(button, &item), tree.parent(button));
}

#[test]
fn test_unparsable_selector_resolves_to_nothing() {
    let (tree, _, _) = dashboard();
    assert_eq!(tree.select("main > ul"), None);
}

#[test]
fn test_attribute_mutations_are_logged() {
    let (mut tree, header, _) = dashboard();
    tree.take_mutations();

    tree.set_attr(header, "aria-hidden", "true");
    tree.remove_attr(header, "aria-hidden");
    tree.remove_attr(header, "aria-hidden");

    let log = tree.take_mutations();
    assert_eq!(log.len(), 2);
    assert!(matches!(
        &log[1].kind,
        MutationKind::Attribute { name, new_value: None, .. } if name == "aria-hidden"
    ));
}

proptest! {
    #[test]
    fn prop_scroll_never_negative(top in 0.0f64..5000.0, height in 1.0f64..400.0) {
        let mut tree = DomTree::with_viewport(800.0, 600.0);
        let el = tree.append_element(tree.root(), "div");
        tree.set_layout(el, DOMRect::from_xywh(0.0, top, 100.0, height));

        tree.scroll_into_view(el, wayfind_dom::ScrollBehavior::Smooth);
        prop_assert!(tree.viewport().scroll_y >= 0.0);
    }
}
