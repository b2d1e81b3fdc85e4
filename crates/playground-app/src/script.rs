// Scripted host input: a JSON array of events replayed against a headless shell.

use std::path::Path;

use playground_core::{ElementId, HostEvent, Marker, Size, Vec2};
use serde::Deserialize;
use thiserror::Error;

use crate::host::{HeadlessDom, LogNotifier};
use crate::shell::{EventOutcome, Shell};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptElement {
    Editor,
    Handle,
    Preview,
}

impl From<ScriptElement> for ElementId {
    fn from(element: ScriptElement) -> Self {
        match element {
            ScriptElement::Editor => ElementId::EditorPane,
            ScriptElement::Handle => ElementId::ResizeHandle,
            ScriptElement::Preview => ElementId::PreviewPane,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptMarker {
    #[serde(default)]
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        target: ScriptElement,
        x: f32,
        #[serde(default)]
        y: f32,
    },
    PointerMove {
        x: f32,
        #[serde(default)]
        y: f32,
    },
    PointerUp {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Click {
        target: ScriptElement,
    },
    Resize {
        width: f32,
        height: f32,
    },
    EditorChange {
        value: Option<String>,
    },
    EditorValidate {
        markers: Vec<ScriptMarker>,
    },
    AiBusy {
        busy: bool,
    },
    AiContent {
        value: String,
    },
    ScrollToBottom,
    Tick,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, ScriptError> {
    let data = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(&data)
}

/// Feed every event to the shell in order, ticking the event loop after each.
pub fn replay(shell: &mut Shell<HeadlessDom, LogNotifier>, events: &[ScriptEvent]) -> Vec<EventOutcome> {
    let mut outcomes = Vec::new();
    for event in events {
        if let Some(host_event) = to_host_event(shell, event) {
            let outcome = shell.handle_event(host_event);
            log::debug!("{:?} -> {:?}", host_event, outcome);
            outcomes.push(outcome);
        }
        shell.update();
    }
    outcomes
}

/// Apply shell-level script steps directly; return the ones that are host events.
fn to_host_event(shell: &mut Shell<HeadlessDom, LogNotifier>, event: &ScriptEvent) -> Option<HostEvent> {
    match event {
        ScriptEvent::PointerDown { target, x, y } => Some(HostEvent::PointerDown {
            target: (*target).into(),
            position: Vec2::new(*x, *y),
        }),
        ScriptEvent::PointerMove { x, y } => Some(HostEvent::PointerMove {
            position: Vec2::new(*x, *y),
        }),
        ScriptEvent::PointerUp { x, y } => Some(HostEvent::PointerUp {
            position: Vec2::new(*x, *y),
        }),
        ScriptEvent::Click { target } => Some(HostEvent::Click {
            target: (*target).into(),
            position: Vec2::new(0.0, 0.0),
        }),
        ScriptEvent::Resize { width, height } => {
            let size = Size::new(*width, *height);
            shell.dom_mut().set_viewport(size);
            Some(HostEvent::Resize { size })
        }
        ScriptEvent::EditorChange { value } => {
            shell.on_editor_change(value.clone());
            None
        }
        ScriptEvent::EditorValidate { markers } => {
            let markers: Vec<Marker> = markers
                .iter()
                .map(|m| Marker {
                    line: m.line,
                    message: m.message.clone(),
                })
                .collect();
            shell.on_editor_validate(&markers);
            None
        }
        ScriptEvent::AiBusy { busy } => {
            shell.set_ai_busy(*busy);
            None
        }
        ScriptEvent::AiContent { value } => {
            shell.set_content(value.clone());
            None
        }
        ScriptEvent::ScrollToBottom => {
            shell.scroll_editor_to_bottom();
            None
        }
        ScriptEvent::Tick => None,
    }
}
