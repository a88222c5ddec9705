use alloc::vec::Vec;

/// Identifies one frame request made through a [`FrameScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameToken(pub u64);

/// The host's "run before next paint" primitive (e.g. `requestAnimationFrame`, a vsync callback, a
/// TUI tick).
///
/// When a requested frame fires, the host hands the token back to
/// [`crate::Controller::on_frame`].
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;

    fn cancel_frame(&mut self, token: FrameToken);
}

/// At most one outstanding frame request. Requesting again cancels the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingFrame {
    token: Option<FrameToken>,
}

impl PendingFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<FrameToken> {
        self.token
    }

    pub fn request<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> FrameToken {
        if let Some(stale) = self.token.take() {
            scheduler.cancel_frame(stale);
        }
        let token = scheduler.request_frame();
        self.token = Some(token);
        token
    }

    /// Cancels the outstanding request, if any.
    pub fn cancel<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> bool {
        match self.token.take() {
            Some(token) => {
                scheduler.cancel_frame(token);
                true
            }
            None => false,
        }
    }

    /// Consumes `token` if it is the outstanding one. Superseded tokens return `false`.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        if self.token != Some(token) {
            return false;
        }
        self.token = None;
        true
    }
}

/// A scheduler whose frames fire only when the host says so.
///
/// Useful for headless hosts and tests: drain [`Self::take_queued`] and feed each token to the
/// controller.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    next: u64,
    queued: Vec<FrameToken>,
    cancelled: usize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued(&self) -> &[FrameToken] {
        &self.queued
    }

    pub fn take_queued(&mut self) -> Vec<FrameToken> {
        core::mem::take(&mut self.queued)
    }

    /// Number of requests cancelled so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        self.next = self.next.wrapping_add(1);
        let token = FrameToken(self.next);
        self.queued.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.queued.retain(|t| *t != token);
        self.cancelled += 1;
    }
}
