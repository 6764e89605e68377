use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use songsync_core::{update, AppState, CollectionId, Msg, SessionState};
use songsync_engine::{
    scan_song_folders, AuthChange, AuthSession, CatalogClient, ImportPipeline, RateLimited,
    UserProfile, YouTubeCatalog,
};
use songsync_logging::{sync_debug, sync_info};
use tokio::sync::mpsc;

use super::config::{Cli, Command};
use super::effects::EffectRunner;
use super::render::{self, Renderer};

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    songsync_logging::initialize(cli.log.into(), cli.log_level());

    let auth = Arc::new(AuthSession::new());
    auth.subscribe(log_auth_change);
    if let Some(token) = cli.access_token() {
        auth.sign_in(token, UserProfile::default());
    }

    let youtube = YouTubeCatalog::new(cli.catalog_settings(), auth.clone())
        .context("building the YouTube client")?;
    let catalog: Arc<dyn CatalogClient> =
        Arc::new(RateLimited::new(youtube, cli.rate_limit_settings()));

    match cli.command {
        Command::Scan { ref dir } => {
            let names = scan(dir)?;
            println!("{}", render::scan_table(&names));
        }
        Command::Playlists => {
            require_sign_in(catalog.as_ref())?;
            let collections = catalog.list_collections().await?;
            println!("{}", render::collections_table(&collections));
        }
        Command::CreatePlaylist { ref title } => {
            require_sign_in(catalog.as_ref())?;
            let created = catalog.create_collection(title).await?;
            println!("Created playlist {} ({})", created.title, created.id);
        }
        Command::Import {
            ref dir,
            ref playlist,
            ref new_playlist,
            retry_failed,
        } => {
            require_sign_in(catalog.as_ref())?;
            let names = scan(dir)?;
            let target = match (playlist, new_playlist) {
                (Some(id), _) => id.clone(),
                (None, Some(title)) => {
                    let created = catalog.create_collection(title).await?;
                    println!("Created playlist {} ({})", created.title, created.id);
                    created.id
                }
                (None, None) => bail!("pass --playlist or --new-playlist"),
            };
            let pipeline = ImportPipeline::new(catalog, cli.pipeline_settings());
            run_import(pipeline, target, names, retry_failed).await?;
        }
    }
    Ok(())
}

fn log_auth_change(change: &AuthChange) {
    let name = change
        .user
        .as_ref()
        .and_then(|user| user.name.as_deref())
        .unwrap_or("unknown user");
    if change.signed_in {
        sync_info!("Signed in to YouTube as {}", name);
    } else {
        sync_debug!("Not signed in to YouTube");
    }
}

fn require_sign_in(catalog: &dyn CatalogClient) -> anyhow::Result<()> {
    if !catalog.is_authenticated() {
        bail!("not signed in: pass --access-token or set SONGSYNC_ACCESS_TOKEN");
    }
    Ok(())
}

fn scan(dir: &Path) -> anyhow::Result<Vec<String>> {
    scan_song_folders(dir).with_context(|| format!("scanning {}", dir.display()))
}

/// Drives one import session through the core update loop until the engine
/// reports the final pass. Ctrl-C requests cancellation.
async fn run_import(
    pipeline: ImportPipeline,
    target: CollectionId,
    names: Vec<String>,
    retry_failed: bool,
) -> anyhow::Result<()> {
    let mut session = Session::new(EffectRunner::new(pipeline));
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();

    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if msg_tx.send(Msg::CancelRequested).is_err() {
                break;
            }
        }
    });

    session.dispatch(Msg::FoldersScanned(names));
    session.dispatch(Msg::CollectionSelected(target));
    session.dispatch(Msg::ImportRequested);
    let mut retry_pending = retry_failed;

    while session.state.session() != SessionState::Idle {
        let msg = tokio::select! {
            Some(msg) = msg_rx.recv() => msg,
            Some(msg) = session.runner.next_msg() => msg,
            else => break,
        };
        session.dispatch(msg);

        if session.state.session() == SessionState::Idle && retry_pending {
            retry_pending = false;
            let view = session.state.view();
            let cancelled = view.last_summary.is_some_and(|summary| summary.cancelled);
            if view.counts.failed > 0 && !cancelled {
                sync_info!("Retrying {} failed songs", view.counts.failed);
                session.dispatch(Msg::RetryFailedRequested);
            }
        }
    }

    let view = session.state.view();
    println!("{}", render::summary_table(&view));
    if let Some(err) = view.last_error {
        bail!(err);
    }
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: Renderer::default(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            for line in self.renderer.render(&state.view()) {
                println!("{line}");
            }
        }
        self.state = state;
    }
}

