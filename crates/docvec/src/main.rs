use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use docvec_common::{logger, AppConfig};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "docvec")]
#[command(about = "Docvec - exact vector similarity index over text embeddings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    port: Option<u16>,

    /// Snapshot directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// CLI arguments win over environment and .env values
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server_host = host;
        }
        if let Some(port) = self.port {
            config.server_port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    let args = match cli.command {
        Some(Commands::Serve(args)) => args,
        None => ServeArgs::default(),
    };

    let mut config = AppConfig::from_env()?;
    args.apply(&mut config);
    config.validate()?;
    config.ensure_directories()?;

    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Docvec starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Data: {}", config.data_dir.display());
    tracing::info!("  Model: {} (dim={})", config.embedding_model, config.embedding_dim);

    println!("Server listening on http://{}", config.server_bind_address());

    docvec_server::start_server(config).await?;

    Ok(())
}
