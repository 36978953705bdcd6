//! Watch loop for `quire serve`.
//!
//! ```text
//! notify ──► bridge thread ──► Debouncer (300 ms, per path) ──► Plan ──► rebuild ──► reload
//! ```
//!
//! Only the roots picked by [`roots`] are watched. Rebuilds run one at a
//! time on the loop task. Events arriving while a rebuild runs are
//! buffered and form the next batch.

mod classify;
mod debouncer;
mod roots;

use classify::Plan;
use debouncer::Debouncer;
use roots::WatchRoots;

use anyhow::{Result, bail};
use notify::RecommendedWatcher;
use tokio::sync::{mpsc, oneshot};

use crate::config::{SiteConfig, cfg, reload_config};
use crate::core::{self, BuildEnv, Phase};
use crate::logger::{status_detach, status_error, status_success};
use crate::reload::{HotReloadMessage, LiveReload};
use crate::{generator, pipeline};

/// Raw watcher events.
pub type EventRx = std::sync::mpsc::Receiver<notify::Result<notify::Event>>;

/// Attached watcher and the events it has produced so far.
pub struct Session {
    watcher: RecommendedWatcher,
    roots: WatchRoots,
    events: EventRx,
}

/// Start watching the project described by `config`. Events buffer until
/// [`run`] consumes them.
pub fn start(config: &SiteConfig) -> notify::Result<Session> {
    let (tx, events) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    let mut roots = WatchRoots::default();
    roots.attach(&mut watcher, config)?;
    for (path, mode) in roots.paths() {
        crate::debug!("watch"; "{} ({:?})", config.root_relative(path).display(), mode);
    }
    Ok(Session {
        watcher,
        roots,
        events,
    })
}

/// Consume watcher events until `shutdown` fires.
pub async fn run(
    session: Session,
    env: BuildEnv,
    reload: LiveReload,
    mut shutdown: oneshot::Receiver<()>,
) {
    let Session {
        mut watcher,
        mut roots,
        events: notify_rx,
    } = session;
    let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(256);

    // notify only offers a blocking receiver
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if async_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        }
    });

    let mut debouncer = Debouncer::new();
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            Some(event) = async_rx.recv() => debouncer.add_event(&event),
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                let Some(batch) = debouncer.take_if_ready() else {
                    continue;
                };
                // pick up created or removed top-level directories
                roots.maintain(&mut watcher, &cfg());
                let Some(plan) = Plan::from_batch(&batch, &cfg()) else {
                    continue;
                };
                let reload = reload.clone();
                match tokio::task::spawn_blocking(move || apply(&plan, env, &reload)).await {
                    Ok(()) => {}
                    Err(e) => crate::log!("error"; "rebuild task panicked: {}", e),
                }
            }
        }
    }
    crate::debug!("watch"; "stopped");
}

/// Execute one plan, then notify the browser.
fn apply(plan: &Plan, env: BuildEnv, reload: &LiveReload) {
    core::enter(Phase::Rebuilding);
    crate::log!("watch"; "changed: {}", plan.reason);

    match rebuild(plan, env) {
        Ok(()) => {
            reload.send(&HotReloadMessage::reload(&plan.reason));
            status_success(&format!("rebuilt: {}", plan.reason));
        }
        Err(e) => {
            let detail = format!("{e:#}");
            reload.send(&HotReloadMessage::error(&detail));
            status_error("rebuild failed", &detail);
        }
    }
    // pipeline logs were printed above the status block
    status_detach();
    core::enter(Phase::Serving);
}

fn rebuild(plan: &Plan, env: BuildEnv) -> Result<()> {
    if plan.reload_config {
        match reload_config()? {
            true => crate::log!("watch"; "configuration reloaded"),
            false => crate::debug!("watch"; "configuration unchanged"),
        }
    }

    let config = cfg();
    let failures = pipeline::run_each(&plan.pipelines, &config, env);
    if failures > 0 {
        bail!("{failures} pipeline(s) failed, see the log above");
    }
    generator::run(&config, env)
}
