#![forbid(unsafe_code)]

//! End-to-end session scenarios driven through the public board API.
//!
//! The clock is injected, so every timeline here is exact.
//!
//! Run:
//!   cargo test -p tinyboard-runtime --test session_scenarios

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tinyboard_core::{LayoutRect, Rect};
use tinyboard_layout::{LayoutFn, layout_fn};
use tinyboard_runtime::{
    BoardConfig, DashboardEvent, Instance, InstanceBuilder, InstanceEvent, LayoutItem,
};
use web_time::Instant;

type Resolutions = Rc<RefCell<Vec<Vec<LayoutRect>>>>;

fn two_blocks() -> Vec<LayoutItem<()>> {
    vec![
        LayoutItem::new("a", Rect::new(0.0, 0.0, 100.0, 50.0), ()),
        LayoutItem::new("b", Rect::new(0.0, 50.0, 100.0, 50.0), ()),
    ]
}

/// Builder whose pipeline records the interacting rects of every resolution.
fn recording(config: BoardConfig) -> (InstanceBuilder<()>, Resolutions) {
    let log: Resolutions = Rc::default();
    let sink = Rc::clone(&log);
    let builder = Instance::builder(two_blocks())
        .config(config)
        .bounds(Rect::from_size(300.0, 600.0))
        .middleware(move |next: LayoutFn| {
            let sink = Rc::clone(&sink);
            layout_fn(move |moving, all, cx| {
                sink.borrow_mut().push(moving.to_vec());
                next(moving, all, cx)
            })
        });
    (builder, log)
}

fn a_at(top: f64) -> Vec<LayoutRect> {
    vec![LayoutRect::new("a", Rect::new(0.0, top, 100.0, 50.0))]
}

fn ms(t0: Instant, millis: u64) -> Instant {
    t0 + Duration::from_millis(millis)
}

#[test]
fn throttle_runs_leading_then_latest_trailing() {
    let (builder, log) = recording(BoardConfig::default());
    let mut board = builder.build().unwrap();
    let t0 = Instant::now();

    board.activate_item("a").unwrap();
    board.re_layout(a_at(0.0), false, t0);
    board.re_layout(a_at(30.0), false, ms(t0, 30));
    board.re_layout(a_at(60.0), false, ms(t0, 60));
    assert_eq!(log.borrow().len(), 1, "only the leading call resolved");
    assert_eq!(board.next_deadline(), Some(ms(t0, 100)));

    assert!(!board.poll(ms(t0, 99)));
    assert!(board.poll(ms(t0, 100)));
    assert!(!board.poll(ms(t0, 200)));

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], a_at(0.0));
    assert_eq!(log[1], a_at(60.0));
}

#[test]
fn zero_timing_resolves_every_call() {
    let (builder, log) = recording(BoardConfig {
        throttle_timing_ms: 0,
        ..BoardConfig::default()
    });
    let mut board = builder.build().unwrap();
    let t0 = Instant::now();

    board.activate_item("a").unwrap();
    for k in 0..3 {
        board.re_layout(a_at(10.0 * k as f64), false, t0);
    }
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(board.next_deadline(), None);
}

#[test]
fn overdue_call_runs_synchronously() {
    let (builder, log) = recording(BoardConfig::default());
    let mut board = builder.build().unwrap();
    let t0 = Instant::now();

    board.activate_item("a").unwrap();
    board.re_layout(a_at(0.0), false, t0);
    board.re_layout(a_at(20.0), false, ms(t0, 150));
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(board.next_deadline(), None);
}

#[test]
fn commit_drops_the_pending_trailing_run() {
    let (builder, log) = recording(BoardConfig::default());
    let mut board = builder.build().unwrap();
    let t0 = Instant::now();

    board.activate_item("a").unwrap();
    board.re_layout(a_at(0.0), false, t0);
    board.re_layout(a_at(30.0), false, ms(t0, 30));
    assert!(board.commit(a_at(40.0), ms(t0, 50)));
    assert_eq!(board.next_deadline(), None);
    assert!(!board.poll(ms(t0, 100)));

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1], a_at(40.0));
}

#[test]
fn drag_emits_shadow_and_item_events_in_order() {
    let mut board = Instance::builder(two_blocks())
        .config(BoardConfig {
            layout: "compact".into(),
            ..BoardConfig::default()
        })
        .bounds(Rect::from_size(300.0, 600.0))
        .build()
        .unwrap();

    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&seen);
    board.subscribe_dashboard(move |e| {
        if let DashboardEvent::ItemChanged(r) = e {
            sink.borrow_mut().push(format!("item {} {}", r.id, r.rect.top));
        }
    });
    let sink = Rc::clone(&seen);
    board.subscribe(move |e| {
        sink.borrow_mut().push(match e {
            InstanceEvent::ShadowUpdated { id, rect } => format!("shadow {id} {}", rect.top),
            InstanceEvent::ShadowHidden => "shadow hidden".to_owned(),
            InstanceEvent::ResizerShown(_) => "resizer".to_owned(),
        });
    });

    let t0 = Instant::now();
    board.activate_item("a").unwrap();
    board.re_layout(a_at(80.0), false, t0);
    board.commit(a_at(80.0), ms(t0, 10));

    assert_eq!(
        *seen.borrow(),
        vec![
            "item a 80",
            "item b 0",
            "shadow a 50",
            "item a 50",
            "shadow hidden",
        ]
    );
}

#[test]
fn layout_updated_hook_fires_only_on_commit() {
    let calls: Rc<RefCell<Vec<Vec<(String, f64)>>>> = Rc::default();
    let sink = Rc::clone(&calls);
    let mut board = Instance::builder(two_blocks())
        .config(BoardConfig {
            layout: "compact".into(),
            ..BoardConfig::default()
        })
        .bounds(Rect::from_size(300.0, 600.0))
        .on_layout_updated(move |items| {
            sink.borrow_mut().push(
                items
                    .iter()
                    .map(|i| (i.id.to_string(), i.rect.top))
                    .collect(),
            );
        })
        .build()
        .unwrap();
    let t0 = Instant::now();

    board.activate_item("a").unwrap();
    board.re_layout(a_at(80.0), false, t0);
    board.cancel();
    assert!(calls.borrow().is_empty());

    board.activate_item("a").unwrap();
    board.re_layout(a_at(80.0), false, t0);
    assert!(calls.borrow().is_empty());
    board.commit(a_at(80.0), ms(t0, 10));

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![("a".to_owned(), 50.0), ("b".to_owned(), 0.0)]
    );
}

#[test]
fn activation_hook_sees_the_target() {
    let targets: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
    let sink = Rc::clone(&targets);
    let mut board = Instance::builder(two_blocks())
        .on_layout_activated(move |id| sink.borrow_mut().push(id.map(ToString::to_string)))
        .build()
        .unwrap();

    board.activate_item("b").unwrap();
    assert!(board.activate(), "re-activation keeps the session");
    board.cancel();
    board.activate();
    board.cancel();

    assert_eq!(*targets.borrow(), vec![Some("b".to_owned()), None]);
}
