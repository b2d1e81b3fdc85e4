// Scoped ownership of the document-level drag listeners.

use playground_core::{Dom, EventKind, ListenerId, ListenerTarget};

/// The pointer-move/pointer-up pair registered on the document for the
/// duration of one drag. Released exactly once; further releases are no-ops.
#[derive(Debug)]
pub struct DragListeners {
    pointer_move: Option<ListenerId>,
    pointer_up: Option<ListenerId>,
}

impl DragListeners {
    pub fn attach(dom: &mut dyn Dom) -> Self {
        let pointer_move = dom.add_listener(ListenerTarget::Document, EventKind::PointerMove);
        let pointer_up = dom.add_listener(ListenerTarget::Document, EventKind::PointerUp);
        Self {
            pointer_move: Some(pointer_move),
            pointer_up: Some(pointer_up),
        }
    }

    /// True while the move listener is still registered with the document.
    pub fn is_attached(&self, dom: &dyn Dom) -> bool {
        self.pointer_move.is_some_and(|id| dom.is_listening(id))
    }

    /// Detach both listeners. Returns how many were actually removed.
    pub fn release(&mut self, dom: &mut dyn Dom) -> usize {
        [self.pointer_move.take(), self.pointer_up.take()]
            .into_iter()
            .flatten()
            .filter(|&id| dom.remove_listener(id))
            .count()
    }

    pub fn is_released(&self) -> bool {
        self.pointer_move.is_none() && self.pointer_up.is_none()
    }
}

impl Drop for DragListeners {
    fn drop(&mut self) {
        if !self.is_released() {
            log::warn!("drag listeners dropped while still attached");
        }
    }
}
