//! Integration tests for hostkit-ui.
//!
//! These drive a [`UiHost`] through its public API against the headless
//! backend, the way a script binding and a native backend would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hostkit_ui::element::{Element, ElementKind};
use hostkit_ui::event::SurfaceEvent;
use hostkit_ui::render::Primitive;
use hostkit_ui::testing::{HeadlessBackend, Journal};
use hostkit_ui::{Callback, Color, HostConfig, Rect, RenderOutput, ScriptValue, Size, SurfaceState, UiHost};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn host() -> (UiHost, Journal) {
    let backend = HeadlessBackend::new();
    let journal = backend.journal();
    (UiHost::new(HostConfig::default(), backend), journal)
}

fn geometry(w: f64, h: f64) -> ScriptValue {
    ScriptValue::table([
        ("x", ScriptValue::from(0)),
        ("y", ScriptValue::from(0)),
        ("w", ScriptValue::from(w)),
        ("h", ScriptValue::from(h)),
    ])
}

fn frame(w: impl Into<ScriptValue>, h: impl Into<ScriptValue>) -> ScriptValue {
    ScriptValue::table([("w", w.into()), ("h", h.into())])
}

fn recorder() -> (Callback, Arc<Mutex<Vec<Vec<ScriptValue>>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let cb = Callback::new(move |args| {
        sink.lock().unwrap().push(args.to_vec());
        Ok(())
    });
    (cb, calls)
}

fn fill_of(output: &RenderOutput) -> Option<Color> {
    match output.primitive {
        Primitive::Rectangle { fill, .. } | Primitive::Circle { fill, .. } => Some(fill),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Construction and first render
// ---------------------------------------------------------------------------

#[test]
fn red_square_round_trip() {
    let (mut host, journal) = host();
    let id = host.window(geometry(200.0, 200.0)).rectangle().frame(frame("100%", "100%")).fill("#FF0000").show();
    assert_eq!(host.state(id), Some(SurfaceState::Shown));

    let handle = journal.handle_of(id).unwrap();
    let presented = journal.last_present(handle).unwrap();
    assert_eq!(presented.rect, Rect::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(fill_of(&presented), Some(Color::RED));
    assert_eq!(host.output(id), Some(&presented));
}

#[test]
fn nesting_example() {
    let (mut host, _) = host();
    let id = host
        .window(geometry(200.0, 200.0))
        .vstack()
        .rectangle()
        .frame(frame(50, 50))
        .hstack()
        .circle()
        .frame(frame(20, 20))
        .end()
        .end()
        .show();

    let tree = host.tree(id).unwrap();
    let vstack = tree.root().unwrap();
    let [rect, hstack] = tree.children(vstack) else { panic!("vstack should have two children") };
    let [circle] = tree.children(*hstack) else { panic!("hstack should have one child") };
    assert_eq!(tree.get(*circle).map(Element::kind), Some(ElementKind::Circle));

    let output = host.output(id).unwrap();
    assert_eq!(output.find(*rect).unwrap().size(), Size::new(50.0, 50.0));
    assert_eq!(output.find(*circle).unwrap().size(), Size::new(20.0, 20.0));
    let h = output.find(*hstack).unwrap().rect;
    let c = output.find(*circle).unwrap().rect;
    assert!(c.x >= h.x && c.right() <= h.right() && c.y >= h.y && c.bottom() <= h.bottom());
}

#[test]
fn percentage_and_fill_frames_resolve_against_window() {
    let (mut host, _) = host();
    let id = host.window(geometry(200.0, 200.0)).rectangle().frame(frame("50%", "fill")).show();
    assert_eq!(host.output(id).unwrap().size(), Size::new(100.0, 200.0));
}

#[test]
fn fill_on_text_changes_nothing() {
    let (mut host, _) = host();
    let plain = host.window(geometry(100.0, 40.0)).text("hello").show();
    let filled = host.window(geometry(100.0, 40.0)).text("hello").fill("#FF0000").show();
    assert_eq!(host.output(plain).unwrap().primitive, host.output(filled).unwrap().primitive);
}

#[test]
fn tree_shape_is_independent_of_modifiers() {
    let (mut host, _) = host();
    let bare = host.window(geometry(300.0, 300.0)).zstack().vstack().text("a").button("b", recorder().0).end().circle().end().build();
    let styled = host
        .window(geometry(300.0, 300.0))
        .zstack()
        .padding(4)
        .vstack()
        .spacing(8)
        .text("a")
        .font(20)
        .foreground_color("white")
        .button("b", recorder().0)
        .fill("blue")
        .corner_radius(3)
        .end()
        .circle()
        .opacity(0.5)
        .stroke("black")
        .end()
        .build();

    let outline = host.tree(bare).unwrap().outline();
    assert_eq!(outline, host.tree(styled).unwrap().outline());
    insta::assert_snapshot!(outline, @r"
    zstack
      vstack
        text
        button
      circle
    ");
}

// ---------------------------------------------------------------------------
// Reactive updates
// ---------------------------------------------------------------------------

#[test]
fn box_set_off_thread_rerenders_after_dispatch() {
    let (mut host, journal) = host();
    let color = host.color_box(Color::RED);
    let id = host.window(geometry(100.0, 100.0)).rectangle().fill(color.clone()).show();
    let root = host.tree(id).unwrap().root().unwrap();

    let remote = color.clone();
    std::thread::spawn(move || remote.set(Color::GREEN)).join().unwrap();

    assert_eq!(color.get(), Color::GREEN);
    assert!(journal.updates().is_empty());

    host.run_pending();
    let updates = journal.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].node, root);
    assert_eq!(fill_of(&updates[0]), Some(Color::GREEN));
    assert_eq!(fill_of(host.output(id).unwrap()), Some(Color::GREEN));
}

#[test]
fn box_changes_touch_only_bound_leaves() {
    let (mut host, journal) = host();
    let a = host.color_box(Color::RED);
    let label = host.text_box("ready");
    let id = host
        .window(geometry(200.0, 100.0))
        .hstack()
        .rectangle()
        .fill(a.clone())
        .text(label.clone())
        .circle()
        .fill("blue")
        .end()
        .show();
    let tree = host.tree(id).unwrap();
    let text = tree.children(tree.root().unwrap())[1];

    label.set("done".to_owned());
    host.run_pending();

    let updates = journal.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].node, text);
    assert!(matches!(&updates[0].primitive, Primitive::Text { content, .. } if content == "done"));
    assert_eq!(a.get(), Color::RED);
}

#[test]
fn closing_stops_updates() {
    let (mut host, journal) = host();
    let label = host.text_box("one");
    let id = host.window(geometry(100.0, 100.0)).text(label.clone()).show();
    host.close(id);
    label.set("two".to_owned());
    host.run_pending();
    assert!(journal.updates().is_empty());
    assert!(!label.has_observer());
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn dialog_button_press_calls_back_once_then_closes() {
    let (mut host, _) = host();
    let (cb, calls) = recorder();
    let id = host.dialog("Save changes?").buttons(["Save", "Cancel"]).on_button(cb).show();
    assert!(host.is_registered(id));

    let backend_side = host.dispatcher();
    backend_side.post_event(SurfaceEvent::ButtonPressed { surface: id, index: 0, text: None });
    backend_side.post_event(SurfaceEvent::ButtonPressed { surface: id, index: 1, text: None });
    host.run_pending();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0][..], [ScriptValue::Number(n)] if n == 0.0));
    assert_eq!(host.state(id), Some(SurfaceState::Closed));
    assert!(!host.is_registered(id));
}

#[test]
fn close_twice_is_harmless() {
    let (mut host, journal) = host();
    let id = host.alert("Copied").show();
    let handle = journal.handle_of(id).unwrap();
    assert_eq!(host.close(id), SurfaceState::Closed);
    assert_eq!(host.close(id), SurfaceState::Closed);
    assert_eq!(journal.release_count(handle), 1);
}

#[test]
fn display_unavailable() {
    let mut host = UiHost::new(HostConfig::default(), HeadlessBackend::without_display());
    let id = host.dialog("Hello").show();
    assert_eq!(host.state(id), Some(SurfaceState::Unshown));
    assert!(!host.is_registered(id));
}

#[test]
fn user_close_from_backend() {
    let (mut host, _) = host();
    let id = host.window(geometry(50.0, 50.0)).circle().show();
    host.dispatcher().post_event(SurfaceEvent::CloseRequested { surface: id });
    host.run_pending();
    assert_eq!(host.state(id), Some(SurfaceState::Closed));
}

#[tokio::test(start_paused = true)]
async fn alert_dismisses_itself() {
    let config = HostConfig::default().with_alert_duration(Duration::from_secs(3));
    let mut host = UiHost::new(config, HeadlessBackend::new());
    let start = tokio::time::Instant::now();
    let id = host.alert("Saved").show();
    assert_eq!(host.state(id), Some(SurfaceState::Shown));

    assert!(host.run_next().await);
    assert_eq!(host.state(id), Some(SurfaceState::Closed));
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn early_close_cancels_dismissal() {
    let mut host = UiHost::new(HostConfig::default(), HeadlessBackend::new());
    let id = host.alert("Saved").duration(Duration::from_secs(1)).show();
    host.close(id);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(host.run_pending(), 0);
    assert_eq!(host.state(id), Some(SurfaceState::Closed));
}
