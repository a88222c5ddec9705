use crate::{LayoutExtent, ViewMeta};

/// The rendering capabilities the engine needs from its host.
///
/// The host is supplied when the [`crate::WindowReconciler`] is constructed; every structural
/// change to the view pool goes through these calls, and only the engine makes them.
pub trait RenderHost<T> {
    /// The host's reusable rendering unit (a widget, a DOM node handle, ...).
    type View;

    /// Instantiates an unbound view for `index`.
    fn create_view(&mut self, index: usize) -> Self::View;

    fn destroy_view(&mut self, view: Self::View);

    /// Informs the host that `view` now sits at `position` in the pool.
    fn move_view(&mut self, view: &mut Self::View, position: usize);

    /// Binds `item` to `view`.
    fn bind_view(&mut self, view: &mut Self::View, item: &T, meta: ViewMeta);

    /// Pushes the per-view metadata recomputed at the end of a pass.
    fn update_view_meta(&mut self, view: &mut Self::View, meta: ViewMeta) {
        let _ = (view, meta);
    }

    /// The scroll extent changed: resize the spacer and the window wrapper.
    fn resize_spacer(&mut self, extent: LayoutExtent) {
        let _ = extent;
    }

    /// The window's first index changed: translate the wrapper by `offset`.
    fn set_translation(&mut self, offset: u64) {
        let _ = offset;
    }
}
