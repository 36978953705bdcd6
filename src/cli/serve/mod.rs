//! Development server with live reload.
//!
//! ```text
//! Initializing ─► Building ─► Serving ◄─► Rebuilding
//!                  pipelines    tiny_http over the generator output
//!                  generator    WebSocket reload channel + watcher
//! ```

mod inject;
mod lifecycle;
mod path;
mod response;

use crate::{
    config::cfg,
    core::{self, BuildEnv, Phase},
    debug, generator, log, pipeline,
    reload::LiveReload,
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::{path::Path, sync::Arc};
use tiny_http::{Method, Request, Server};

/// Request handler threads.
const REQUEST_THREADS: usize = 4;

/// Build in development mode, then serve until Ctrl+C.
///
/// A failing pipeline is logged and serving goes on; a failing generator
/// aborts before the server starts.
pub fn serve_site() -> Result<()> {
    let config = cfg();
    let env = BuildEnv::Development;

    core::enter(Phase::Building);
    let failures = pipeline::run_all(&config, env);
    if failures > 0 {
        log!("build"; "{failures} pipeline(s) reported errors, serving anyway");
    }
    generator::run(&config, env)?;

    let reload = LiveReload::start(config.serve.reload_port)?;
    debug!("reload"; "ws://localhost:{}", reload.port());

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    core::register_server(Arc::clone(&server), shutdown_tx);

    let watcher = if config.serve.watch {
        Some(lifecycle::spawn_watcher(
            &config,
            env,
            reload.clone(),
            shutdown_rx,
        )?)
    } else {
        None
    };

    core::enter(Phase::Serving);
    log!("serve"; "http://{}", addr);

    run_request_loop(&server, reload.port())?;
    lifecycle::wait_for_shutdown(watcher);
    Ok(())
}

fn run_request_loop(server: &Server, ws_port: u16) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        pool.spawn(move || {
            // re-read per request so a config reload moves the output dir
            let config = cfg();
            if let Err(e) = handle_request(request, &config.generator.output, ws_port) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, serve_root: &Path, ws_port: u16) -> Result<()> {
    if core::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }
    if request.url() == inject::HOTRELOAD_PATH {
        return response::respond_hotreload_js(request, ws_port);
    }

    match path::resolve_path(request.url(), serve_root) {
        Some(path) => response::respond_file(request, &path),
        None => response::respond_not_found(request, serve_root),
    }
}
