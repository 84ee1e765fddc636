//! Server entry point.
//!
//! # Responsibility
//! - Parse configuration from flags and environment.
//! - Initialize logging, build the selected store and serve the API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use blogpost_api::{router, serve, SharedController};
use blogpost_core::{
    core_version, default_log_level, init_logging, BlogPostController, BlogPostService,
    ControllerOptions, DatabaseBlogPostService, InMemoryBlogPostService,
};
use clap::{Parser, ValueEnum};
use log::info;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// Plain in-process collection.
    Memory,
    /// SQLite database, file-backed or in-memory.
    Database,
}

#[derive(Parser, Debug)]
#[command(name = "blogpost-server")]
#[command(version)]
#[command(about = "Blog post CRUD API server", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BLOG_API_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// Storage backend
    #[arg(long, env = "BLOG_API_STORE", value_enum, default_value_t = StoreKind::Memory)]
    store: StoreKind,

    /// SQLite file for the database store (in-memory when omitted)
    #[arg(long, env = "BLOG_API_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Preload the memory store with the sample posts
    #[arg(long, env = "BLOG_API_SEED")]
    seed: bool,

    /// Answer 400 for posts with a blank title, author or content
    #[arg(long, env = "BLOG_API_STRICT_VALIDATION")]
    strict_validation: bool,

    /// trace|debug|info|warn|error
    #[arg(long, env = "BLOG_API_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, env = "BLOG_API_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("blogpost-api").join("logs"))
    }

    fn build_service(&self) -> Result<Arc<dyn BlogPostService>> {
        if self.seed && self.store != StoreKind::Memory {
            bail!("--seed only applies to the memory store");
        }

        let service: Arc<dyn BlogPostService> = match (self.store, &self.db_path) {
            (StoreKind::Memory, _) if self.seed => Arc::new(InMemoryBlogPostService::seeded()),
            (StoreKind::Memory, _) => Arc::new(InMemoryBlogPostService::new()),
            (StoreKind::Database, Some(path)) => Arc::new(
                DatabaseBlogPostService::open(path)
                    .with_context(|| format!("failed to open database `{}`", path.display()))?,
            ),
            (StoreKind::Database, None) => Arc::new(
                DatabaseBlogPostService::open_in_memory()
                    .context("failed to open in-memory database")?,
            ),
        };
        Ok(service)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = args.log_dir();
    let log_dir_str = log_dir
        .to_str()
        .ok_or_else(|| anyhow!("log directory is not valid UTF-8: {}", log_dir.display()))?;
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, log_dir_str).map_err(|err| anyhow!(err))?;

    let options = ControllerOptions {
        validate_required_fields: args.strict_validation,
    };
    let controller: SharedController = Arc::new(BlogPostController::with_options(
        args.build_service()?,
        options,
    ));

    let listener = TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(
        "event=server_start module=cli status=ok addr={} store={:?} strict_validation={} version={}",
        args.addr,
        args.store,
        args.strict_validation,
        core_version()
    );
    println!("blogpost-server listening on {}", args.addr);

    serve(listener, router(controller))
        .await
        .context("server stopped with an error")
}
