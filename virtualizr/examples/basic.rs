// Example: a 100k-row list rendered through a printing host.
use virtualizr::{
    CollectionDiffer, LayoutExtent, RenderHost, ViewMeta, ViewportController, WindowOptions,
    WindowReconciler,
};

#[derive(Default)]
struct Rows {
    next_id: u32,
}

impl RenderHost<String> for Rows {
    type View = u32;

    fn create_view(&mut self, _index: usize) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn destroy_view(&mut self, _view: u32) {}

    fn move_view(&mut self, _view: &mut u32, _position: usize) {}

    fn bind_view(&mut self, _view: &mut u32, _item: &String, _meta: ViewMeta) {}

    fn resize_spacer(&mut self, extent: LayoutExtent) {
        println!("spacer={} wrapper={}", extent.total_size, extent.window_size);
    }

    fn set_translation(&mut self, offset: u64) {
        println!("translate={offset}");
    }
}

fn main() {
    let viewport = ViewportController::new(WindowOptions::new(400, 20)).expect("valid geometry");
    let mut list = WindowReconciler::new(viewport, CollectionDiffer::by_value(), Rows::default());
    list.on_range_change(|range| println!("range={range:?}"));

    let rows: Vec<String> = (0..100_000).map(|i| format!("row {i}")).collect();
    let stats = list.notify_collection_changed(rows);
    println!(
        "displayed={} created={}",
        list.nb_of_elements_displayed(),
        stats.created
    );

    let stats = list.notify_scroll(200);
    println!("scroll 200: created={} removed={}", stats.created, stats.removed);

    let stats = list.scroll_to_index(50_000);
    println!(
        "jump: full_rebuild={} top={:?}",
        stats.full_rebuild,
        list.top_index()
    );
    for view in list.views().take(3) {
        println!("  #{} {:?}", view.index(), view.item());
    }
}
