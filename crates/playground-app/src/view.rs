// Composed view: the props each child widget receives from the shell.

use playground_layout::{Breakpoint, PaneWidths};
use serde::Serialize;

use crate::session_probe::AuthInfo;

#[derive(Debug, Clone, Serialize)]
pub struct ShellView {
    pub header: HeaderView,
    pub layout: LayoutView,
    pub editor_pane: EditorPaneView,
    pub resize_handle: ResizeHandleView,
    pub preview: PreviewProps,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
    pub deploy: DeployProps,
}

/// Publishing needs the document, whether it validates, and who is signed in.
#[derive(Debug, Clone, Serialize)]
pub struct DeployProps {
    pub html: String,
    pub error: bool,
    pub auth: Option<AuthInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Stacked,
    SideBySide,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutView {
    pub breakpoint: Breakpoint,
    pub orientation: Orientation,
    pub widths: Option<PaneWidths>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorPaneView {
    pub tabs: Vec<&'static str>,
    pub editor: EditorProps,
    pub ai_assist: AiAssistProps,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorProps {
    pub language: &'static str,
    pub theme: &'static str,
    pub value: String,
    /// False while the AI is working; the editor ignores pointer input.
    pub pointer_events: bool,
}

/// The AI panel writes back through `Shell::set_content` and
/// `Shell::set_ai_busy`, then calls `Shell::scroll_editor_to_bottom`.
#[derive(Debug, Clone, Serialize)]
pub struct AiAssistProps {
    pub html: String,
    pub is_ai_working: bool,
    /// An editor is mounted, so scroll-to-bottom has a target.
    pub can_scroll: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResizeHandleView {
    pub visible: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewProps {
    pub html: String,
    pub is_resizing: bool,
    pub is_ai_working: bool,
}
