// Root shell: owns the document, validation, resize, auth, and AI-busy state
// and threads them to the header, editor pane, resizer, and preview.

use std::sync::Arc;
use std::time::Duration;

use playground_core::{
    CodeEditor, Dom, ElementId, EventKind, HostEvent, IdentityClient, ListenerId, ListenerTarget,
    LocalStorage, Marker, Notifier, Severity, UnloadEvent,
};
use playground_layout::{Breakpoint, BreakpointDetector, PaneWidths, ResizeSettings, SplitResizer};

use crate::consts::{AI_BUSY_MESSAGE, DEFAULT_HTML, EDITOR_LANGUAGE, EDITOR_TABS, EDITOR_THEME};
use crate::migration::migrate_legacy_content;
use crate::session_probe::{AuthInfo, AuthState, SessionProbe};
use crate::unload_guard::UnloadGuard;
use crate::view::{
    AiAssistProps, DeployProps, EditorPaneView, EditorProps, HeaderView, LayoutView, Orientation,
    PreviewProps, ResizeHandleView, ShellView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    ShutDown,
}

/// What the shell did with a host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Ignored,
    DragStarted,
    Resized(PaneWidths),
    DragEnded,
    /// The interaction was swallowed because the AI is working.
    Suppressed,
    BreakpointChanged(Breakpoint),
}

pub struct Shell<D: Dom, N: Notifier> {
    dom: D,
    notifier: N,
    identity: Option<Arc<dyn IdentityClient>>,

    content: String,
    has_error: bool,
    auth: AuthState,
    ai_busy: bool,

    breakpoint: BreakpointDetector,
    resizer: SplitResizer,
    unload_guard: UnloadGuard,
    window_resize_listener: Option<ListenerId>,
    editor_click_listener: Option<ListenerId>,
    probe: Option<SessionProbe>,
    editor: Option<Box<dyn CodeEditor>>,

    lifecycle: Lifecycle,
}

impl<D: Dom, N: Notifier> Shell<D, N> {
    pub fn new(
        dom: D,
        notifier: N,
        identity: Option<Arc<dyn IdentityClient>>,
        resize: ResizeSettings,
    ) -> Self {
        let breakpoint = BreakpointDetector::new(dom.viewport().width);
        Self {
            dom,
            notifier,
            identity,
            content: DEFAULT_HTML.to_string(),
            has_error: false,
            auth: None,
            ai_busy: false,
            breakpoint,
            resizer: SplitResizer::new(resize),
            unload_guard: UnloadGuard::default(),
            window_resize_listener: None,
            editor_click_listener: None,
            probe: None,
            editor: None,
            lifecycle: Lifecycle::Created,
        }
    }

    // ── Lifecycle ──

    /// Mount: start the identity probe, adopt legacy content, lay out the
    /// panes, and register listeners. Runs once; later calls are ignored.
    pub fn initialize(&mut self, storage: &mut dyn LocalStorage) {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("initialize called in {:?}; ignored", self.lifecycle);
            return;
        }
        self.lifecycle = Lifecycle::Running;

        if let Some(client) = self.identity.clone() {
            self.probe = Some(SessionProbe::spawn(client));
        }

        if let Some(restored) = migrate_legacy_content(storage, &mut self.notifier) {
            self.set_content(restored);
        }

        let breakpoint = self.breakpoint.current();
        if let Some(widths) = self.resizer.mount(&mut self.dom, breakpoint) {
            log::debug!("initial split {:?} at {}", widths, breakpoint.name());
        }

        self.window_resize_listener =
            Some(self.dom.add_listener(ListenerTarget::Window, EventKind::Resize));
        if self.dom.has_element(ElementId::EditorPane) {
            self.editor_click_listener = Some(self.dom.add_listener(
                ListenerTarget::Element(ElementId::EditorPane),
                EventKind::Click,
            ));
        }
        self.unload_guard.register(&mut self.dom);

        log::info!("shell initialized at {} ({}px)", breakpoint.name(), self.dom.viewport().width);
    }

    /// Unmount: undo everything `initialize` may have done. Safe to call at any point.
    pub fn shutdown(&mut self) {
        if self.lifecycle == Lifecycle::ShutDown {
            return;
        }
        self.lifecycle = Lifecycle::ShutDown;

        if let Some(probe) = self.probe.take() {
            probe.cancel();
        }
        let removed = self.resizer.unmount(&mut self.dom);
        if let Some(id) = self.window_resize_listener.take() {
            self.dom.remove_listener(id);
        }
        if let Some(id) = self.editor_click_listener.take() {
            self.dom.remove_listener(id);
        }
        self.unload_guard.unregister(&mut self.dom);

        log::info!("shell shut down ({} drag listeners released)", removed);
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Event-loop tick: apply the identity probe outcome if it has arrived.
    pub fn update(&mut self) {
        if let Some(outcome) = self.probe.as_mut().and_then(SessionProbe::poll) {
            self.apply_auth(outcome);
        }
    }

    /// Block up to `timeout` for a pending identity probe.
    pub fn wait_for_probe(&mut self, timeout: Duration) {
        if let Some(outcome) = self.probe.as_mut().and_then(|p| p.wait(timeout)) {
            self.apply_auth(outcome);
        }
    }

    pub fn is_probe_pending(&self) -> bool {
        self.probe.as_ref().is_some_and(|p| !p.is_settled())
    }

    fn apply_auth(&mut self, auth: AuthState) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        self.auth = auth;
        self.probe = None;
    }

    // ── Host events ──

    pub fn handle_event(&mut self, event: HostEvent) -> EventOutcome {
        if self.lifecycle != Lifecycle::Running {
            return EventOutcome::Ignored;
        }

        match event {
            HostEvent::PointerDown { target, .. } => {
                if self.resizer.accepts_pointer_down(&self.dom, target)
                    && self.resizer.begin_drag(&mut self.dom)
                {
                    EventOutcome::DragStarted
                } else {
                    EventOutcome::Ignored
                }
            }
            HostEvent::PointerMove { position } => {
                match self.resizer.drag_to(&mut self.dom, position.x) {
                    Some(widths) => EventOutcome::Resized(widths),
                    None => EventOutcome::Ignored,
                }
            }
            HostEvent::PointerUp { .. } => {
                if self.resizer.end_drag(&mut self.dom) {
                    EventOutcome::DragEnded
                } else {
                    EventOutcome::Ignored
                }
            }
            HostEvent::Click { target, .. } => self.handle_click(target),
            HostEvent::Resize { size } => {
                if !self.listening(self.window_resize_listener) {
                    return EventOutcome::Ignored;
                }
                match self.breakpoint.observe(size.width) {
                    Some(next) => {
                        self.resizer.relayout(&mut self.dom, next);
                        EventOutcome::BreakpointChanged(next)
                    }
                    None => EventOutcome::Ignored,
                }
            }
        }
    }

    fn handle_click(&mut self, target: ElementId) -> EventOutcome {
        if target != ElementId::EditorPane || !self.listening(self.editor_click_listener) {
            return EventOutcome::Ignored;
        }
        if self.ai_busy {
            self.notifier.notify(AI_BUSY_MESSAGE, Severity::Warning);
            return EventOutcome::Suppressed;
        }
        EventOutcome::Ignored
    }

    /// Page-unload attempt. Returns whether navigation was prevented.
    pub fn before_unload(&self, event: &mut UnloadEvent) -> bool {
        if !self.unload_guard.is_armed(&self.dom) {
            return false;
        }
        self.unload_guard.handle(event, self.ai_busy, &self.content)
    }

    fn listening(&self, listener: Option<ListenerId>) -> bool {
        listener.is_some_and(|id| self.dom.is_listening(id))
    }

    // ── Editor wiring ──

    pub fn on_editor_mount(&mut self, mut editor: Box<dyn CodeEditor>) {
        editor.set_value(&self.content);
        self.editor = Some(editor);
    }

    /// Content edited in the editor. Any edit clears the validation error.
    pub fn on_editor_change(&mut self, value: Option<String>) {
        self.content = value.unwrap_or_default();
        self.has_error = false;
    }

    /// Validation pass finished. Markers set the error; an empty list leaves it as is.
    pub fn on_editor_validate(&mut self, markers: &[Marker]) {
        if !markers.is_empty() {
            log::debug!("{} validation markers; first: {}", markers.len(), markers[0].message);
            self.has_error = true;
        }
    }

    // ── AI assist wiring ──

    /// Replace the document from outside the editor.
    pub fn set_content(&mut self, content: String) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(&content);
        }
        self.content = content;
    }

    pub fn set_ai_busy(&mut self, busy: bool) {
        if self.ai_busy != busy {
            log::debug!("ai busy: {}", busy);
        }
        self.ai_busy = busy;
    }

    /// Reveal the editor's last line. Returns the line revealed, if an editor is mounted.
    pub fn scroll_editor_to_bottom(&mut self) -> Option<usize> {
        let editor = self.editor.as_mut()?;
        let last = editor.line_count();
        editor.reveal_line(last);
        Some(last)
    }

    // ── Accessors ──

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn auth(&self) -> Option<&AuthInfo> {
        self.auth.as_ref()
    }

    pub fn is_ai_busy(&self) -> bool {
        self.ai_busy
    }

    pub fn is_resizing(&self) -> bool {
        self.resizer.is_resizing()
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint.current()
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Composition ──

    pub fn view(&self) -> ShellView {
        let breakpoint = self.breakpoint.current();
        let side_by_side = breakpoint.is_side_by_side();
        ShellView {
            header: HeaderView {
                deploy: DeployProps {
                    html: self.content.clone(),
                    error: self.has_error,
                    auth: self.auth.clone(),
                },
            },
            layout: LayoutView {
                breakpoint,
                orientation: if side_by_side {
                    Orientation::SideBySide
                } else {
                    Orientation::Stacked
                },
                widths: self.resizer.widths(),
            },
            editor_pane: EditorPaneView {
                tabs: EDITOR_TABS.to_vec(),
                editor: EditorProps {
                    language: EDITOR_LANGUAGE,
                    theme: EDITOR_THEME,
                    value: self.content.clone(),
                    pointer_events: !self.ai_busy,
                },
                ai_assist: AiAssistProps {
                    html: self.content.clone(),
                    is_ai_working: self.ai_busy,
                    can_scroll: self.editor.is_some(),
                },
            },
            resize_handle: ResizeHandleView {
                visible: side_by_side,
                active: self.resizer.is_resizing(),
            },
            preview: PreviewProps {
                html: self.content.clone(),
                is_resizing: self.resizer.is_resizing(),
                is_ai_working: self.ai_busy,
            },
        }
    }
}

impl<D: Dom, N: Notifier> Drop for Shell<D, N> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
