use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info};
use uuid::Uuid;

fn runtime(worker_threads: Option<usize>) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = worker_threads {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env before logging so RUST_LOG and LOG_FORMAT apply
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "crud_scaffold", event = "config_invalid", error = %e, "cannot start without a valid configuration");
            return ExitCode::FAILURE;
        }
    };

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "crud_scaffold", event = "panic", %service_id, pid, message = %info, "unhandled panic");
    }));

    let threads = cfg.server.worker_threads;
    let rt = match runtime(threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "crud_scaffold", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "crud_scaffold",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = ?threads,
        "starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "crud_scaffold", event = "stop", %service_id, pid, "stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "crud_scaffold", event = "run_failed", %service_id, error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
