use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::{error, info};
use uuid::Uuid;

use configs::AppConfig;
use service::AppContext;

async fn bootstrap(cfg: AppConfig, service_id: Uuid) -> anyhow::Result<()> {
    let ctx = AppContext::connect(&cfg).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&ctx.db, None).await?;
        info!(service = "lifeboard", event = "migrations_applied", "schema is up to date");
    }
    info!(
        service = "lifeboard",
        event = "ready",
        %service_id,
        jwt_issuer = %cfg.auth.jwt_issuer,
        "domain services initialised"
    );
    Ok(())
}

fn main() -> std::process::ExitCode {
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            // logging is configured from the same file, so report on stderr
            eprintln!("invalid configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::init_logging(cfg.logging.format);

    let service_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "lifeboard", event = "panic", %service_id, message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "lifeboard", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "lifeboard", event = "start", %service_id, pid = std::process::id(), version = env!("CARGO_PKG_VERSION"));
    match rt.block_on(bootstrap(cfg, service_id)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "lifeboard", event = "bootstrap_failed", error = %format!("{e:#}"), "startup failed");
            std::process::ExitCode::FAILURE
        }
    }
}
