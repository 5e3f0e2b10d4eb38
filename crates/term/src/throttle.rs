//! Skip redundant redraws while nothing moves.

/// Decides whether a frame is worth drawing.
///
/// Moving frames are always drawn. Static frames (paused or game over) are
/// drawn when the snapshot fingerprint changes, when a redraw was requested,
/// or once every `min_static_interval_ms` as a keep-alive.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_static_interval_ms: u64,
    last: Option<(u64, u64)>,
}

impl RenderThrottle {
    pub fn new(min_static_interval_ms: u64) -> Self {
        Self {
            min_static_interval_ms,
            last: None,
        }
    }

    /// Forget the last frame so the next call draws.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn should_render(&mut self, now_ms: u64, fingerprint: u64, is_static: bool) -> bool {
        let draw = match self.last {
            None => true,
            Some(_) if !is_static => true,
            Some((_, fp)) if fp != fingerprint => true,
            Some((at, _)) => now_ms.saturating_sub(at) >= self.min_static_interval_ms,
        };
        if draw {
            self.last = Some((now_ms, fingerprint));
        }
        draw
    }
}
