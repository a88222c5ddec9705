use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use virtualizr::{
    CollectionDiffer, ConfigError, RenderHost, Update, ViewMeta, ViewportController,
    VisibleRange, WindowOptions, WindowReconciler,
};

#[derive(Debug, Default)]
struct CountingHost {
    live: usize,
    created: usize,
}

impl RenderHost<u32> for CountingHost {
    type View = usize;

    fn create_view(&mut self, index: usize) -> usize {
        self.live += 1;
        self.created += 1;
        index
    }

    fn destroy_view(&mut self, _view: usize) {
        self.live -= 1;
    }

    fn move_view(&mut self, _view: &mut usize, _position: usize) {}

    fn bind_view(&mut self, view: &mut usize, _item: &u32, meta: ViewMeta) {
        *view = meta.index;
    }
}

type TestController = Controller<Vec<u32>, u32, CountingHost, ManualFrames>;

fn controller(container_size: u32, element_size: u32) -> TestController {
    let viewport =
        ViewportController::new(WindowOptions::new(container_size, element_size)).unwrap();
    let engine =
        WindowReconciler::new(viewport, CollectionDiffer::by_value(), CountingHost::default());
    Controller::new(engine, ManualFrames::new())
}

fn run_frames(c: &mut TestController) -> usize {
    let mut passes = 0;
    for token in c.scheduler_mut().take_queued() {
        if c.on_frame(token).unwrap().is_some() {
            passes += 1;
        }
    }
    passes
}

#[test]
fn pending_frame_replaces_the_outstanding_request() {
    let mut frames = ManualFrames::new();
    let mut pending = PendingFrame::new();

    let first = pending.request(&mut frames);
    let second = pending.request(&mut frames);
    assert_ne!(first, second);
    assert_eq!(frames.queued(), &[second]);
    assert_eq!(frames.cancelled(), 1);

    assert!(!pending.fire(first));
    assert!(pending.fire(second));
    assert!(!pending.is_pending());
    assert!(!pending.cancel(&mut frames));
}

#[test]
fn events_before_a_frame_coalesce_into_one_pass() {
    let mut c = controller(400, 20);
    let ranges = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&ranges);
    c.engine_mut()
        .on_range_change(move |range| sink.lock().unwrap().push(range));

    c.on_collection_changed((0..10).collect());
    c.on_collection_changed((0..1_000).collect());
    c.on_scroll(40);
    c.on_scroll(200);

    assert!(c.is_frame_pending());
    assert_eq!(c.scheduler().queued().len(), 1);
    assert_eq!(c.scheduler().cancelled(), 3);
    assert_eq!(c.engine().query_current_range(), None);

    assert_eq!(run_frames(&mut c), 1);
    assert!(!c.is_frame_pending());
    assert_eq!(c.engine().nb_of_elements(), 1_000);
    assert_eq!(c.engine().query_current_range(), Some(VisibleRange::new(8, 31)));
    assert_eq!(c.engine().host().created, 24);
    assert_eq!(c.engine().host().live, 24);
    assert_eq!(
        *ranges.lock().unwrap(),
        alloc::vec![Some(VisibleRange::new(8, 31))]
    );
}

#[test]
fn superseded_tokens_do_not_run_a_pass() {
    let mut c = controller(400, 20);
    c.on_collection_changed((0..100).collect());
    let stale = c.scheduler().queued()[0];
    c.on_scroll(100);

    assert_eq!(c.on_frame(stale).unwrap(), None);
    assert!(c.is_frame_pending());
    assert_eq!(run_frames(&mut c), 1);
}

#[test]
fn top_index_binding_round_trips() {
    let mut c = controller(400, 20);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    c.set_on_top_index_change(Some(move |top: Option<usize>| {
        sink.lock().unwrap().push(top)
    }));

    c.on_collection_changed((0..1_000).collect());
    run_frames(&mut c);
    assert_eq!(c.top_index(), Some(0));

    let offset = c.scroll_to_index(250);
    assert_eq!(offset, 5_000);
    assert_eq!(c.top_index(), Some(0));
    run_frames(&mut c);
    assert_eq!(c.top_index(), Some(250));

    // Scrolling within the same row does not re-notify.
    c.on_scroll(5_010);
    run_frames(&mut c);
    assert_eq!(*seen.lock().unwrap(), alloc::vec![Some(0), Some(250)]);
}

#[test]
fn zero_element_size_is_rejected_without_scheduling() {
    let mut c = controller(400, 20);
    assert_eq!(
        c.on_viewport_size(400, 0),
        Err(ConfigError::NonPositiveElementSize)
    );
    assert!(!c.is_frame_pending());
    assert!(c.pending().is_empty());
}

#[test]
fn flush_runs_the_pending_pass_immediately() {
    let mut c = controller(400, 20);
    let passes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&passes);
    c.engine_mut().on_range_change(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    c.on_collection_changed((0..50).collect());
    c.on_viewport_size(200, 10).unwrap();
    let stats = c.flush().unwrap().unwrap();

    assert!(stats.full_rebuild);
    assert_eq!(c.engine().nb_of_elements_displayed(), 24);
    assert_eq!(c.engine().query_current_range(), Some(VisibleRange::new(0, 21)));
    assert!(c.scheduler().queued().is_empty());
    assert_eq!(c.flush().unwrap(), None);
    assert_eq!(passes.load(Ordering::Relaxed), 1);
}

#[test]
fn rejected_geometry_keeps_the_rest_of_the_update() {
    let mut c = controller(400, 20);
    c.submit(
        Update::geometry(400, 0)
            .with_source((0..1_000).collect())
            .with_scroll_offset(200),
    );

    let token = c.scheduler_mut().take_queued()[0];
    assert_eq!(c.on_frame(token), Err(ConfigError::NonPositiveElementSize));
    assert_eq!(c.engine().viewport().element_size(), 20);
    assert_eq!(c.pending().geometry, None);
    assert_eq!(c.pending().scroll_offset, Some(200));
    assert!(c.pending().source.is_some());
    assert!(c.is_frame_pending());

    assert_eq!(run_frames(&mut c), 1);
    assert!(c.pending().is_empty());
    assert_eq!(c.engine().nb_of_elements(), 1_000);
    assert_eq!(c.engine().query_current_range(), Some(VisibleRange::new(8, 31)));
    assert_eq!(c.engine().host().live, 24);
}
