/// Needledrop Server - serves one track from a remote playlist per request
use clap::{Parser, Subcommand};
use needledrop_cache::PlaylistCache;
use needledrop_core::{KeyValueStore, PlaylistOrigin};
use needledrop_origin::OriginClient;
use needledrop_server::{
    api,
    config::ServerConfig,
    maintenance::{spawn_purge_task, PurgeTarget},
    state::AppState,
    StorageBackend,
};
use needledrop_storage::{MemoryStore, SqliteStore};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "needledrop-server")]
#[command(about = "Serves one track from a remote playlist per request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "NEEDLEDROP_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Validate the configuration and print it as TOML
    CheckConfig {
        /// Configuration file path
        #[arg(short, long, env = "NEEDLEDROP_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "needledrop_server=info,needledrop_cache=info,needledrop_playback=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::CheckConfig { config } => {
            check_config(config)?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Needledrop Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Selection mode: {:?}", config.selection.mode);

    // Initialize key-value store
    let purge_every = Duration::from_secs(config.cache.ttl_secs);
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            let memory = Arc::new(MemoryStore::new());
            spawn_purge_task(PurgeTarget::Memory(Arc::clone(&memory)), purge_every);
            memory
        }
        StorageBackend::Sqlite => {
            let pool = needledrop_storage::create_pool(&config.storage.database_url).await?;
            needledrop_storage::run_migrations(&pool).await?;
            tracing::info!("Database connected");

            let sqlite = SqliteStore::new(pool);
            spawn_purge_task(PurgeTarget::Sqlite(sqlite.clone()), purge_every);
            Arc::new(sqlite)
        }
    };

    // Initialize origin client and playlist cache
    let origin: Arc<dyn PlaylistOrigin> = Arc::new(OriginClient::new(config.origin_settings())?);
    let playlist_cache = Arc::new(PlaylistCache::new(
        Arc::clone(&store),
        origin,
        config.cache_settings(),
    ));
    tracing::info!("Playlist cache initialized");

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    // Build application state and router
    let app_state = AppState::new(playlist_cache, store, Arc::new(config));
    let app = api::create_router(app_state)?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn check_config(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
