// Unsaved-work guard: asks for confirmation before leaving the page while the
// AI is mid-edit or the document differs from the starter template.

use playground_core::{Dom, EventKind, ListenerId, ListenerTarget, UnloadEvent};

use crate::consts::{DEFAULT_HTML, UNLOAD_MESSAGE};

#[derive(Debug, Default)]
pub struct UnloadGuard {
    listener: Option<ListenerId>,
}

impl UnloadGuard {
    pub fn register(&mut self, dom: &mut dyn Dom) {
        if self.listener.is_none() {
            self.listener = Some(dom.add_listener(ListenerTarget::Window, EventKind::BeforeUnload));
        }
    }

    pub fn unregister(&mut self, dom: &mut dyn Dom) {
        if let Some(id) = self.listener.take() {
            dom.remove_listener(id);
        }
    }

    pub fn is_armed(&self, dom: &dyn Dom) -> bool {
        self.listener.is_some_and(|id| dom.is_listening(id))
    }

    /// Run the handler. Returns whether the unload was prevented.
    pub fn handle(&self, event: &mut UnloadEvent, ai_busy: bool, content: &str) -> bool {
        if !has_unsaved_work(ai_busy, content) {
            return false;
        }
        log::debug!("unload guarded (ai_busy={})", ai_busy);
        event.prevent(UNLOAD_MESSAGE);
        true
    }
}

pub fn has_unsaved_work(ai_busy: bool, content: &str) -> bool {
    ai_busy || content != DEFAULT_HTML
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_ai_prevents_unload() {
        let guard = UnloadGuard::default();
        let mut event = UnloadEvent::new();
        assert!(guard.handle(&mut event, true, DEFAULT_HTML));
        assert!(event.prevented);
        assert_eq!(event.return_value.as_deref(), Some(UNLOAD_MESSAGE));
    }

    #[test]
    fn pristine_template_lets_unload_through() {
        let guard = UnloadGuard::default();
        let mut event = UnloadEvent::new();
        assert!(!guard.handle(&mut event, false, DEFAULT_HTML));
        assert_eq!(event, UnloadEvent::new());
    }

    #[test]
    fn edited_content_prevents_unload() {
        let guard = UnloadGuard::default();
        let mut event = UnloadEvent::new();
        assert!(guard.handle(&mut event, false, "<p>mine</p>"));
        assert!(event.prevented);
    }
}
