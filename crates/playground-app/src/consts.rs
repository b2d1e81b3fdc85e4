// Fixed strings and editor configuration shared across the shell.

/// Document content shown when nothing has been written yet. Leaving the page
/// with anything else in the editor asks for confirmation.
pub const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>My app</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <meta charset="utf-8">
    <style>
      body {
        display: flex;
        justify-content: center;
        align-items: center;
        overflow: hidden;
        height: 100dvh;
        font-family: "Arial", sans-serif;
        text-align: center;
      }
    </style>
  </head>
  <body>
    <h1>Hello, world!</h1>
    <p>Describe what you want to build and let the assistant write it.</p>
  </body>
</html>
"#;

// Editor
pub const EDITOR_LANGUAGE: &str = "html";
pub const EDITOR_THEME: &str = "vs-dark";
pub const EDITOR_TABS: &[&str] = &["index.html"];

// Notifications
pub const AI_BUSY_MESSAGE: &str = "Please wait for the AI to finish working.";
pub const RESTORED_MESSAGE: &str = "Previous HTML content restored from local storage.";
/// Browsers show their own wording; this only marks the unload as guarded.
pub const UNLOAD_MESSAGE: &str = "";

// Storage
pub const LEGACY_CONTENT_KEY: &str = "html_content";

// Identity
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "http://localhost:3000/api/@me";
