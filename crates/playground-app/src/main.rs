// HTML playground shell, headless host.
// Boots the shell against an in-process document, replays an optional event
// script, and prints the composed view once the identity probe settles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use playground_core::{IdentityClient, Size, UnloadEvent};

use playground_app::host::{BufferEditor, FileStorage, HeadlessDom, LogNotifier};
use playground_app::session_probe::HttpIdentityClient;
use playground_app::shell::Shell;
use playground_app::{script, settings};

#[derive(Debug, Parser)]
#[command(name = "playground", version, about = "Headless HTML playground shell")]
struct Cli {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Identity endpoint, overriding settings.json.
    #[arg(long)]
    endpoint: Option<String>,

    /// JSON event script to replay after mount.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Local storage file (defaults to the config dir).
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Skip the identity probe.
    #[arg(long)]
    no_probe: bool,

    /// How long to wait for the identity probe before printing.
    #[arg(long, default_value_t = 2000)]
    probe_wait_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = settings::load_settings();
    if let Some(endpoint) = cli.endpoint {
        settings.identity_endpoint = endpoint;
    }

    let identity: Option<Arc<dyn IdentityClient>> = if cli.no_probe {
        None
    } else {
        let client = HttpIdentityClient::new(&settings.identity_endpoint, settings.probe.timeout())
            .context("building identity client")?;
        log::debug!("identity endpoint {}", client.endpoint());
        let client: Arc<dyn IdentityClient> = Arc::new(client);
        Some(client)
    };

    let storage_path = cli
        .storage
        .or_else(FileStorage::default_path)
        .context("no config directory for local storage; pass --storage")?;
    let mut storage = FileStorage::open(storage_path);
    log::debug!("local storage at {}", storage.path().display());

    let dom = HeadlessDom::mounted(Size::new(cli.width, cli.height));
    let mut shell = Shell::new(dom, LogNotifier::default(), identity, settings.resize.clone());
    shell.initialize(&mut storage);
    shell.on_editor_mount(Box::new(BufferEditor::new(shell.content())));

    if let Some(path) = cli.script {
        let events = script::load_script(&path)?;
        let outcomes = script::replay(&mut shell, &events);
        log::info!("replayed {} events ({} host events)", events.len(), outcomes.len());
    }

    if shell.is_probe_pending() {
        shell.wait_for_probe(Duration::from_millis(cli.probe_wait_ms));
    }

    let view = shell.view();
    println!("{}", serde_json::to_string_pretty(&view)?);

    let mut unload = UnloadEvent::new();
    if shell.before_unload(&mut unload) {
        eprintln!("leaving now would prompt: unsaved work in the editor");
    }
    for (message, severity) in shell.notifier().history() {
        log::debug!("{:?}: {}", severity, message);
    }

    shell.shutdown();
    Ok(())
}
