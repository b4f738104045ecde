use crate::item::{ContentItem, OpenTarget};

/// Host callbacks for engine outcomes.
///
/// Every method has a no-op default so hosts only implement what they need.
/// Callbacks run after the engine has released its internal lock, so they may
/// call back into the engine (e.g. reset from `on_kept`).
pub trait DeckObserver: Send + Sync {
    fn on_kept(&self, _item: &ContentItem) {}

    fn on_discarded(&self, _item: &ContentItem) {}

    /// The user wants to view the item instead of deciding on it.
    fn on_open(&self, _item: &ContentItem, _target: &OpenTarget) {}

    /// The deck was reset back to the first item.
    fn on_reset(&self) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl DeckObserver for NoopObserver {}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every callback as a short string, in call order.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub calls: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DeckObserver for RecordingObserver {
        fn on_kept(&self, item: &ContentItem) {
            self.calls.lock().unwrap().push(format!("kept:{}", item.id));
        }

        fn on_discarded(&self, item: &ContentItem) {
            self.calls.lock().unwrap().push(format!("discarded:{}", item.id));
        }

        fn on_open(&self, item: &ContentItem, target: &OpenTarget) {
            let kind = match target {
                OpenTarget::Inline => "inline",
                OpenTarget::External { .. } => "external",
            };
            self.calls.lock().unwrap().push(format!("open:{}:{kind}", item.id));
        }

        fn on_reset(&self) {
            self.calls.lock().unwrap().push("reset".into());
        }
    }
}
