// Headless host: in-process stand-ins for the document, notifications,
// local storage, and the code editor.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use playground_core::{
    CodeEditor, Dom, ElementId, EventKind, ListenerId, ListenerTarget, LocalStorage, Notifier,
    Severity, Size,
};
use serde_json::{Map, Value};

// ──────────────────────────────────────────────
// HeadlessDom
// ──────────────────────────────────────────────

pub struct HeadlessDom {
    viewport: Size,
    elements: HashSet<ElementId>,
    widths: HashMap<ElementId, f32>,
    listeners: HashMap<ListenerId, (ListenerTarget, EventKind)>,
    next_listener: ListenerId,
}

impl HeadlessDom {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: HashSet::new(),
            widths: HashMap::new(),
            listeners: HashMap::new(),
            next_listener: 1,
        }
    }

    /// A document with the editor pane, resize handle, and preview pane mounted.
    pub fn mounted(viewport: Size) -> Self {
        let mut dom = Self::new(viewport);
        dom.mount(ElementId::EditorPane);
        dom.mount(ElementId::ResizeHandle);
        dom.mount(ElementId::PreviewPane);
        dom
    }

    pub fn mount(&mut self, element: ElementId) {
        self.elements.insert(element);
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn width_of(&self, element: ElementId) -> Option<f32> {
        self.widths.get(&element).copied()
    }

    pub fn listener_count(&self, target: ListenerTarget) -> usize {
        self.listeners.values().filter(|(t, _)| *t == target).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }
}

impl Dom for HeadlessDom {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn has_element(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    fn set_width(&mut self, element: ElementId, width: Option<f32>) {
        match width {
            Some(w) => {
                self.widths.insert(element, w);
            }
            None => {
                self.widths.remove(&element);
            }
        }
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.insert(id, (target, kind));
        log::trace!("listener {} added: {:?} {:?}", id, target, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            log::trace!("listener {} removed", id);
        }
        removed
    }

    fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }
}

// ──────────────────────────────────────────────
// LogNotifier
// ──────────────────────────────────────────────

/// Routes notices to the log and keeps them for later inspection.
#[derive(Debug, Default)]
pub struct LogNotifier {
    history: Vec<(String, Severity)>,
}

impl LogNotifier {
    pub fn history(&self) -> &[(String, Severity)] {
        &self.history
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("notice: {}", message),
            Severity::Warning => log::warn!("notice: {}", message),
            Severity::Error => log::error!("notice: {}", message),
        }
        self.history.push((message.to_string(), severity));
    }
}

// ──────────────────────────────────────────────
// FileStorage
// ──────────────────────────────────────────────

/// Local storage persisted as a single JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStorage {
    pub fn default_path() -> Option<PathBuf> {
        Some(crate::settings::config_dir()?.join("local_storage.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create storage dir {}: {}", parent.display(), e);
                return;
            }
        }

        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::error!("Failed to write {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::error!("Failed to serialize storage: {}", e),
        }
    }
}

fn read_entries(path: &Path) -> Map<String, Value> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Map::new(),
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("{} is not a JSON object; ignoring", path.display());
            Map::new()
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            Map::new()
        }
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

// ──────────────────────────────────────────────
// BufferEditor
// ──────────────────────────────────────────────

/// Minimal editor handle that tracks its buffer and the last revealed line.
#[derive(Debug, Default)]
pub struct BufferEditor {
    text: String,
    revealed: Option<usize>,
}

impl BufferEditor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            revealed: None,
        }
    }

    pub fn revealed(&self) -> Option<usize> {
        self.revealed
    }
}

impl CodeEditor for BufferEditor {
    fn set_value(&mut self, value: &str) {
        self.text = value.to_string();
    }

    fn line_count(&self) -> usize {
        // An empty model still has one line.
        self.text.split('\n').count()
    }

    fn reveal_line(&mut self, line: usize) {
        log::debug!("editor reveal line {}", line);
        self.revealed = Some(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_reads_and_removes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, r#"{ "html_content": "<p>hi</p>", "other": 1 }"#).unwrap();

        let mut storage = FileStorage::open(&path);
        assert_eq!(storage.get("html_content"), Some(Value::String("<p>hi</p>".into())));

        storage.remove("html_content");
        assert!(storage.get("html_content").is_none());

        let reopened = FileStorage::open(&path);
        assert!(reopened.get("html_content").is_none());
        assert_eq!(reopened.get("other"), Some(Value::from(1)));
    }

    #[test]
    fn file_storage_tolerates_missing_and_garbage_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStorage::open(dir.path().join("nope.json"));
        assert!(missing.get("html_content").is_none());

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "[1, 2").unwrap();
        assert!(FileStorage::open(&garbage).get("html_content").is_none());
    }

    #[test]
    fn removing_absent_key_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        let mut storage = FileStorage::open(&path);
        storage.remove("html_content");
        assert!(!path.exists());
    }

    #[test]
    fn headless_dom_tracks_listeners_by_target() {
        let mut dom = HeadlessDom::mounted(Size::new(1024.0, 768.0));
        let a = dom.add_listener(ListenerTarget::Document, EventKind::PointerMove);
        let _b = dom.add_listener(ListenerTarget::Window, EventKind::Resize);
        assert_eq!(dom.listener_count(ListenerTarget::Document), 1);
        assert!(dom.remove_listener(a));
        assert!(!dom.remove_listener(a));
        assert_eq!(dom.total_listeners(), 1);
    }

    #[test]
    fn buffer_editor_counts_lines() {
        let mut editor = BufferEditor::new("");
        assert_eq!(editor.line_count(), 1);
        editor.set_value("a\nb\nc");
        assert_eq!(editor.line_count(), 3);
        editor.reveal_line(3);
        assert_eq!(editor.revealed(), Some(3));
    }
}
