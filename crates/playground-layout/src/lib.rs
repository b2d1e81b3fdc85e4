// Split-pane layout engine for the playground shell.
// Owns the editor/preview width split and the pointer-drag resizer state machine.

mod breakpoint;
mod listeners;

pub use breakpoint::{Breakpoint, BreakpointDetector, LG_MIN_WIDTH, MD_MIN_WIDTH};
pub use listeners::DragListeners;

use playground_core::{Dom, ElementId, EventKind, ListenerId, ListenerTarget};
use serde::{Deserialize, Serialize};

/// Width of the divider between the editor and preview panes, in pixels.
pub const GUTTER_WIDTH: f32 = 4.0;

// ──────────────────────────────────────────────
// PaneWidths
// ──────────────────────────────────────────────

/// Explicit pixel widths applied to the editor (left) and preview (right) panes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaneWidths {
    pub left: f32,
    pub right: f32,
}

impl PaneWidths {
    /// Split with the divider at pointer `x`. Not clamped: an `x` outside
    /// `[0, viewport_width]` yields a negative or over-wide pane.
    pub fn split_at(x: f32, viewport_width: f32) -> Self {
        Self {
            left: x,
            right: viewport_width - x - GUTTER_WIDTH,
        }
    }

    /// The initial 50/50 split.
    pub fn even(viewport_width: f32) -> Self {
        Self::split_at((viewport_width / 2.0).floor(), viewport_width)
    }

    pub fn total(&self) -> f32 {
        self.left + self.right + GUTTER_WIDTH
    }
}

// ──────────────────────────────────────────────
// Settings
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResizeSettings {
    /// Clamp the divider to the viewport while dragging.
    #[serde(default)]
    pub clamp_to_viewport: bool,
}

// ──────────────────────────────────────────────
// SplitResizer
// ──────────────────────────────────────────────

enum ResizeState {
    Idle,
    Dragging(DragListeners),
}

pub struct SplitResizer {
    state: ResizeState,
    /// Pointer-down listener on the resize handle, registered at mount.
    handle_listener: Option<ListenerId>,
    widths: Option<PaneWidths>,
    /// Last breakpoint seen at mount or relayout. Dragging is only live at `lg`.
    breakpoint: Breakpoint,
    settings: ResizeSettings,
}

impl SplitResizer {
    pub fn new(settings: ResizeSettings) -> Self {
        Self {
            state: ResizeState::Idle,
            handle_listener: None,
            widths: None,
            breakpoint: Breakpoint::Base,
            settings,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    /// Widths currently applied to the panes, if any.
    pub fn widths(&self) -> Option<PaneWidths> {
        self.widths
    }

    /// Establish the initial layout and attach the handle's pointer-down listener.
    /// Does nothing when the panes are not mounted.
    pub fn mount(&mut self, dom: &mut dyn Dom, breakpoint: Breakpoint) -> Option<PaneWidths> {
        self.breakpoint = breakpoint;
        if !dom.has_element(ElementId::EditorPane) || !dom.has_element(ElementId::PreviewPane) {
            log::debug!("panes not mounted; resizer inert");
            return None;
        }

        let applied = if breakpoint.is_side_by_side() {
            let widths = PaneWidths::even(dom.viewport().width);
            self.apply(dom, widths);
            Some(widths)
        } else {
            None
        };

        if dom.has_element(ElementId::ResizeHandle) && self.handle_listener.is_none() {
            self.handle_listener = Some(dom.add_listener(
                ListenerTarget::Element(ElementId::ResizeHandle),
                EventKind::PointerDown,
            ));
        }

        applied
    }

    /// Whether a pointer-down on `target` should start a drag. The handle is
    /// hidden in the stacked layout, so nothing is accepted below `lg`.
    pub fn accepts_pointer_down(&self, dom: &dyn Dom, target: ElementId) -> bool {
        self.breakpoint.is_side_by_side()
            && target == ElementId::ResizeHandle
            && self.handle_listener.is_some_and(|id| dom.is_listening(id))
    }

    /// Idle → Dragging. Returns false if a drag is already in progress or the
    /// panes are stacked.
    pub fn begin_drag(&mut self, dom: &mut dyn Dom) -> bool {
        if self.is_resizing() || !self.breakpoint.is_side_by_side() {
            return false;
        }
        self.state = ResizeState::Dragging(DragListeners::attach(dom));
        log::debug!("resize drag started");
        true
    }

    /// Recompute both widths from the pointer position while dragging.
    pub fn drag_to(&mut self, dom: &mut dyn Dom, x: f32) -> Option<PaneWidths> {
        match &self.state {
            ResizeState::Dragging(listeners) if listeners.is_attached(dom) => {}
            _ => return None,
        }
        if !self.breakpoint.is_side_by_side() || !dom.has_element(ElementId::ResizeHandle) {
            return None;
        }

        let viewport_width = dom.viewport().width;
        let x = if self.settings.clamp_to_viewport {
            x.clamp(0.0, (viewport_width - GUTTER_WIDTH).max(0.0))
        } else {
            x
        };
        let widths = PaneWidths::split_at(x, viewport_width);
        if self.apply(dom, widths) {
            Some(widths)
        } else {
            None
        }
    }

    /// Dragging → Idle. Returns false if no drag was in progress.
    pub fn end_drag(&mut self, dom: &mut dyn Dom) -> bool {
        match std::mem::replace(&mut self.state, ResizeState::Idle) {
            ResizeState::Dragging(mut listeners) => {
                listeners.release(dom);
                log::debug!("resize drag ended at {:?}", self.widths);
                true
            }
            ResizeState::Idle => false,
        }
    }

    /// React to a breakpoint change after mount. Entering `lg` without explicit
    /// widths applies the even split; leaving it returns the panes to the stacked
    /// layout and abandons any drag.
    pub fn relayout(&mut self, dom: &mut dyn Dom, breakpoint: Breakpoint) -> Option<PaneWidths> {
        self.breakpoint = breakpoint;
        if breakpoint.is_side_by_side() {
            if self.widths.is_none()
                && dom.has_element(ElementId::EditorPane)
                && dom.has_element(ElementId::PreviewPane)
            {
                let widths = PaneWidths::even(dom.viewport().width);
                self.apply(dom, widths);
            }
            return self.widths;
        }

        self.end_drag(dom);
        if self.widths.take().is_some() {
            dom.set_width(ElementId::EditorPane, None);
            dom.set_width(ElementId::PreviewPane, None);
            log::debug!("stacked layout at {}; explicit widths cleared", breakpoint.name());
        }
        None
    }

    /// Detach every listener the resizer may have registered. Safe to call
    /// whether or not a drag ever happened. Returns the number of document
    /// listeners removed.
    pub fn unmount(&mut self, dom: &mut dyn Dom) -> usize {
        let removed = match std::mem::replace(&mut self.state, ResizeState::Idle) {
            ResizeState::Dragging(mut listeners) => listeners.release(dom),
            ResizeState::Idle => 0,
        };
        if let Some(id) = self.handle_listener.take() {
            dom.remove_listener(id);
        }
        removed
    }

    fn apply(&mut self, dom: &mut dyn Dom, widths: PaneWidths) -> bool {
        if !dom.has_element(ElementId::EditorPane) || !dom.has_element(ElementId::PreviewPane) {
            return false;
        }
        dom.set_width(ElementId::EditorPane, Some(widths.left));
        dom.set_width(ElementId::PreviewPane, Some(widths.right));
        self.widths = Some(widths);
        true
    }
}

impl Default for SplitResizer {
    fn default() -> Self {
        Self::new(ResizeSettings::default())
    }
}
