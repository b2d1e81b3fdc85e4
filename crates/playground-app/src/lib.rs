// HTML playground shell: split editor/preview layout, drag resizing, identity
// probe, unsaved-work guard, and the headless host they run against.

pub mod consts;
pub mod host;
pub mod migration;
pub mod script;
pub mod session_probe;
pub mod settings;
pub mod shell;
pub mod unload_guard;
pub mod view;
