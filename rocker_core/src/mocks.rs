//! Listener helpers for tests and demos.

use std::sync::{Arc, Mutex};

use rocker_traits::{SlideListener, Tick};

/// Listener that records every dispatched tick.
///
/// Clones share the same buffer, so a clone can be handed to the rocker while
/// the original stays behind to inspect what arrived.
#[derive(Debug, Default, Clone)]
pub struct CollectingListener {
    ticks: Arc<Mutex<Vec<Tick>>>,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all ticks received so far.
    pub fn ticks(&self) -> Vec<Tick> {
        self.ticks.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.ticks.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlideListener for CollectingListener {
    fn on_slide_update(&mut self, tick: Tick) {
        if let Ok(mut ticks) = self.ticks.lock() {
            ticks.push(tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let listener = CollectingListener::new();
        let mut handle = listener.clone();
        handle.on_slide_update(Tick { tier: 2, at_ms: 40 });
        handle.on_slide_update(Tick { tier: -1, at_ms: 90 });
        assert_eq!(listener.len(), 2);
        assert_eq!(listener.ticks()[0].tier, 2);
    }
}
