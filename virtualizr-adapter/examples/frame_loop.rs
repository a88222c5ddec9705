use virtualizr::{
    CollectionDiffer, RenderHost, ViewMeta, ViewportController, WindowOptions, WindowReconciler,
};
use virtualizr_adapter::{Controller, ManualFrames};

struct Noop;

impl RenderHost<u32> for Noop {
    type View = ();

    fn create_view(&mut self, _index: usize) {}

    fn destroy_view(&mut self, _view: ()) {}

    fn move_view(&mut self, _view: &mut (), _position: usize) {}

    fn bind_view(&mut self, _view: &mut (), _item: &u32, _meta: ViewMeta) {}
}

fn main() {
    // Example: a burst of scroll events between two paints costs a single pass.
    //
    // A real adapter would back `FrameScheduler` with requestAnimationFrame (or a vsync/timer
    // tick) and call `on_frame` from that callback.
    let viewport = ViewportController::new(WindowOptions::new(600, 30)).expect("valid geometry");
    let engine: WindowReconciler<Vec<u32>, u32, Noop> =
        WindowReconciler::new(viewport, CollectionDiffer::by_value(), Noop);
    let mut c = Controller::new(engine, ManualFrames::new());
    c.set_on_top_index_change(Some(|top: Option<usize>| println!("top_index={top:?}")));

    c.on_collection_changed((0..10_000).collect());
    for offset in (0..3_000).step_by(150) {
        c.on_scroll(offset);
    }
    println!("cancelled requests={}", c.scheduler().cancelled());

    for token in c.scheduler_mut().take_queued() {
        if let Ok(Some(stats)) = c.on_frame(token) {
            println!(
                "pass: created={} removed={} range={:?}",
                stats.created,
                stats.removed,
                c.engine().query_current_range()
            );
        }
    }

    let target = c.scroll_to_index(9_000);
    println!("scroll_to_index target_offset={target}");
    for token in c.scheduler_mut().take_queued() {
        let _ = c.on_frame(token);
    }
}
