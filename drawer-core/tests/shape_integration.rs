//! Integration tests for shape construction, drawing and mirroring.
//!
//! Covers the accessible shadow tree, registry bookkeeping across redraws,
//! transient shapes, text shapes, bound elements and caller errors.

use drawer_core::document::DRAWER_ID_ATTR;
use drawer_core::{
    CanvasSession, Document, DrawerError, DrawingContext, NodeId, RasterContext, Rgb, ShapeConfig,
    TextBaseline, TextContent, TextShapeSpec,
};

const GREEN: [u8; 4] = [76, 175, 80, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn session() -> CanvasSession {
    CanvasSession::raster(200, 120, Rgb::WHITE).expect("session")
}

/// Draw a persistent green button over `(x, y, w, h)`.
fn draw_bar(session: &mut CanvasSession, id: &str, rect: (f32, f32, f32, f32)) -> NodeId {
    let mut bar = session
        .create_shape(
            id,
            ShapeConfig::button()
                .with_fill_color("#4CAF50")
                .with_aria_label(format!("Bar {id}"))
                .with_focusable(true),
        )
        .expect("create");
    bar.path_mut().expect("path").rect(rect.0, rect.1, rect.2, rect.3);
    bar.draw().expect("draw");
    bar.element().expect("mirrored")
}

fn mirrored_count(session: &CanvasSession, id: &str) -> usize {
    session
        .document()
        .children_with_attribute(session.canvas(), DRAWER_ID_ATTR, id)
        .len()
}

// ==========================================================================
// Drawing and mirroring
// ==========================================================================

#[test]
fn test_bar_fill_and_shadow_element() {
    let mut session = session();
    let element = draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));

    assert_eq!(session.pixel(30, 25), Some(GREEN));
    assert_eq!(session.pixel(0, 0), Some(WHITE));
    assert_eq!(session.pixel(61, 25), Some(WHITE));

    let document = session.document();
    let node = document.node(element).expect("node");
    assert_eq!(node.tag(), "button");
    assert_eq!(node.attribute("type"), Some("button"));
    assert_eq!(node.attribute("aria-label"), Some("Bar bar-0"));
    assert_eq!(node.attribute("alt"), Some("Bar bar-0"));
    assert_eq!(node.attribute("tabindex"), Some("0"));
    assert_eq!(node.text(), Some("Bar bar-0"));
    assert!(session.registry().find("bar-0").expect("entry").is_mirrored());
}

#[test]
fn test_redraw_does_not_duplicate_element() {
    let mut session = session();
    let first = draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));
    session.shape_mut("bar-0").expect("shape").draw().expect("redraw");
    assert_eq!(mirrored_count(&session, "bar-0"), 1);

    // A fresh object for the same id adopts the existing element.
    let second = draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));
    assert_eq!(first, second);
    assert_eq!(mirrored_count(&session, "bar-0"), 1);
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_text_content_is_copied_to_element() {
    let mut session = session();
    let config = ShapeConfig::button()
        .with_fill_color("#2196F3")
        .with_text_content(TextContent::new("Next", 20.0, 25.0));
    let mut button = session.create_shape("next", config).expect("create");
    button.path_mut().expect("path").rect(10.0, 10.0, 80.0, 30.0);
    button.draw().expect("draw");

    let element = button.element().expect("element");
    assert_eq!(session.document().node(element).expect("node").text(), Some("Next"));
    // Default white text over the blue fill.
    assert_eq!(session.pixel(21, 25), Some(WHITE));
    assert_eq!(session.pixel(85, 35), Some([33, 150, 243, 255]));
}

#[test]
fn test_transient_shape_replaces_stale_element() {
    let mut session = session();
    let config = ShapeConfig::default().with_persistent(false);

    let mut tip = session.create_shape("tip", config.clone()).expect("create");
    tip.path_mut().expect("path").rect(0.0, 0.0, 10.0, 10.0);
    tip.draw().expect("draw");
    let stale = tip.element().expect("element");

    let mut tip = session.create_shape("tip", config).expect("recreate");
    assert!(tip.element().is_none());
    tip.path_mut().expect("path").rect(0.0, 0.0, 10.0, 10.0);
    tip.draw().expect("draw");

    assert!(!session.document().contains(stale));
    assert_eq!(mirrored_count(&session, "tip"), 1);
    assert!(!session.registry().contains("tip"));
}

#[test]
fn test_text_shape_mirrors_its_content() {
    let mut session = session();
    let spec = TextShapeSpec::new("Janeiro", 40.0, 100.0).with_baseline(TextBaseline::Top);
    let mut label = session
        .create_text_shape("label-0", ShapeConfig::default(), spec)
        .expect("create");
    label.draw().expect("draw");

    let element = label.element().expect("element");
    let node = session.document().node(element).expect("node");
    assert_eq!(node.tag(), "div");
    assert_eq!(node.text(), Some("Janeiro"));
    assert_eq!(session.pixel(41, 102), Some([0, 0, 0, 255]));
}

#[test]
fn test_bound_element_suppresses_auto_mirroring() {
    let mut session = session();
    let canvas = session.canvas();
    let figure = session.document_mut().create_element("figure");
    session.document_mut().append_child(canvas, figure).expect("append");

    let mut chart = session
        .create_shape("chart", ShapeConfig::default().with_aria_label("Sales chart"))
        .expect("create");
    chart.bind_element(figure).expect("bind");
    chart.path_mut().expect("path").rect(0.0, 0.0, 100.0, 100.0);
    chart.draw().expect("draw");

    assert_eq!(chart.element(), Some(figure));
    let node = session.document().node(figure).expect("node");
    assert_eq!(node.attribute(DRAWER_ID_ATTR), Some("chart"));
    assert_eq!(node.attribute("alt"), Some("Sales chart"));
    assert_eq!(mirrored_count(&session, "chart"), 1);
}

#[test]
fn test_add_child_reparents_element() {
    let mut session = session();
    let group = draw_bar(&mut session, "group", (0.0, 0.0, 100.0, 100.0));
    let child = draw_bar(&mut session, "child", (10.0, 10.0, 20.0, 20.0));

    session.shape_mut("group").expect("group").add_child("child").expect("add");

    let node = session.document().node(child).expect("node");
    assert_eq!(node.parent(), Some(group));
    assert_eq!(session.shape("group").expect("group").children(), ["child".to_string()]);
}

#[test]
fn test_evict_and_redraw_mirrors_again() {
    let mut session = session();
    let old = draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));
    session.evict("bar-0").expect("evict");
    assert_eq!(mirrored_count(&session, "bar-0"), 0);

    let new = draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));
    assert_ne!(old, new);
    assert_eq!(mirrored_count(&session, "bar-0"), 1);
}

#[test]
fn test_snapshot_serializes_shadow_tree() {
    let mut session = session();
    draw_bar(&mut session, "bar-0", (10.0, 10.0, 50.0, 30.0));
    let json = session.document().to_json().expect("json");
    assert!(json.contains("\"drawer-id\": \"bar-0\""));
    assert!(json.contains("\"canvas\""));
}

// ==========================================================================
// Errors
// ==========================================================================

#[test]
fn test_attach_errors() {
    let mut document = Document::new();
    let div = document.create_element("div");
    let context: Box<dyn DrawingContext> = Box::new(RasterContext::new(10, 10).expect("context"));
    assert!(matches!(
        CanvasSession::attach(document, div, Some(context)),
        Err(DrawerError::InvalidSurface(_))
    ));

    let mut document = Document::new();
    let canvas = document.create_element("canvas");
    assert!(matches!(
        CanvasSession::attach(document, canvas, None),
        Err(DrawerError::MissingContext)
    ));
}

#[test]
fn test_persistent_shape_requires_identifier() {
    let mut session = session();
    let err = session.create_shape("", ShapeConfig::default()).unwrap_err();
    assert!(matches!(err, DrawerError::MissingIdentifier));
    assert!(session.registry().is_empty());

    // Transient shapes may be anonymous.
    assert!(session
        .create_shape("", ShapeConfig::default().with_persistent(false))
        .is_ok());
}

#[test]
fn test_bad_fill_color_is_rejected() {
    let mut session = session();
    let err = session
        .create_shape("bad", ShapeConfig::default().with_fill_color("#12"))
        .unwrap_err();
    assert!(matches!(err, DrawerError::InvalidColorFormat(_)));
    assert!(!session.registry().contains("bad"));
}

#[test]
fn test_draw_without_path_fails() {
    let mut session = session();
    let mut shape = session.create_shape("empty", ShapeConfig::default()).expect("create");
    assert!(matches!(shape.draw(), Err(DrawerError::EmptyPath(_))));
}

#[test]
fn test_incomplete_text_is_rejected() {
    let mut session = session();
    let mut shape = session.create_shape("box", ShapeConfig::default()).expect("create");
    shape.path_mut().expect("path").rect(0.0, 0.0, 10.0, 10.0);
    shape.draw().expect("draw");

    let no_content = TextContent::new("", 1.0, 1.0);
    assert!(matches!(
        shape.add_text_content(&no_content),
        Err(DrawerError::MissingTextContent)
    ));

    let no_position = TextContent {
        y: None,
        ..TextContent::new("label", 1.0, 1.0)
    };
    assert!(matches!(
        shape.add_text_content(&no_position),
        Err(DrawerError::MissingTextPosition)
    ));
}

#[test]
fn test_bind_outside_canvas_is_rejected() {
    let mut session = session();
    let root = session.document().root();
    let outside = session.document_mut().create_element("div");
    session.document_mut().append_child(root, outside).expect("append");

    let mut shape = session.create_shape("s", ShapeConfig::default()).expect("create");
    assert!(matches!(
        shape.bind_element(outside),
        Err(DrawerError::InvalidParent(_))
    ));
}

#[test]
fn test_add_child_to_unmirrored_parent_is_rejected() {
    let mut session = session();
    session.create_shape("parent", ShapeConfig::default()).expect("parent");
    draw_bar(&mut session, "child", (0.0, 0.0, 10.0, 10.0));

    assert!(matches!(
        session.add_child("parent", "child"),
        Err(DrawerError::InvalidParent(_))
    ));
    assert!(matches!(
        session.add_child("missing", "child"),
        Err(DrawerError::ShapeNotFound(_))
    ));
}
