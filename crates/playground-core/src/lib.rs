// Shared vocabulary for the playground shell: geometry, host events, and the
// traits that stand in for the browser (DOM, storage, notifications, editor, network).

use thiserror::Error;

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ──────────────────────────────────────────────
// Elements & listeners
// ──────────────────────────────────────────────

/// The shell's mounted elements that other code addresses by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    EditorPane,
    ResizeHandle,
    PreviewPane,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Document,
    Window,
    Element(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    Resize,
    BeforeUnload,
}

pub type ListenerId = u64;

// ──────────────────────────────────────────────
// Host events
// ──────────────────────────────────────────────

/// A discrete event delivered by the host to the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerDown { target: ElementId, position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp { position: Vec2 },
    Click { target: ElementId, position: Vec2 },
    Resize { size: Size },
}

/// The page-unload attempt. Handlers mark it prevented to ask the host for a
/// confirmation prompt; the message is advisory and hosts may ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnloadEvent {
    pub prevented: bool,
    pub return_value: Option<String>,
}

impl UnloadEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent(&mut self, message: impl Into<String>) {
        self.prevented = true;
        self.return_value = Some(message.into());
    }
}

// ──────────────────────────────────────────────
// Notifications
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Transient user-facing notices.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

// ──────────────────────────────────────────────
// Trait: Dom
// ──────────────────────────────────────────────

/// The slice of the document the shell touches: a listener registry, explicit
/// element widths, and the viewport size.
pub trait Dom {
    fn viewport(&self) -> Size;
    fn has_element(&self, element: ElementId) -> bool;
    /// Apply an explicit pixel width, or clear it with `None`.
    fn set_width(&mut self, element: ElementId, width: Option<f32>);
    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId;
    /// Returns false when the id is not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
    fn is_listening(&self, id: ListenerId) -> bool;
}

// ──────────────────────────────────────────────
// Trait: LocalStorage
// ──────────────────────────────────────────────

/// Key/value persistence holding JSON values, shaped like browser local storage.
pub trait LocalStorage {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn remove(&mut self, key: &str);
}

// ──────────────────────────────────────────────
// Trait: CodeEditor
// ──────────────────────────────────────────────

/// Imperative handle to the mounted code editor.
pub trait CodeEditor {
    /// Replace the buffer when content changes from outside the editor.
    fn set_value(&mut self, value: &str);
    fn line_count(&self) -> usize;
    fn reveal_line(&mut self, line: usize);
}

/// A diagnostic reported by the editor's validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub line: usize,
    pub message: String,
}

// ──────────────────────────────────────────────
// Trait: IdentityClient
// ──────────────────────────────────────────────

/// Raw answer from the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResponse {
    pub status: u16,
    pub body: String,
}

impl IdentityResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("identity request failed: {0}")]
    Network(String),
    #[error("identity response unreadable: {0}")]
    Body(String),
}

/// Issues the one identity request made at startup. Runs off the UI thread.
pub trait IdentityClient: Send + Sync {
    fn fetch_identity(&self) -> Result<IdentityResponse, ProbeError>;
}
