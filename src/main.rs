use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use yatube::admin::AdminService;
use yatube::template::TemplateLoader;
use yatube::{Config, Database, WebServer};

/// Yatube - a small blogging site
#[derive(Parser)]
#[command(name = "yatube", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default if no command given)
    Serve,

    /// Create a user account
    CreateUser {
        username: String,
        password: String,
    },

    /// Delete a user account and its posts
    DeleteUser { username: String },

    /// Create a group
    CreateGroup {
        slug: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a group; its posts are kept without a group
    DeleteGroup { slug: String },
}

fn load_config(path: &Path) -> Config {
    let mut config = match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();
    config
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    if let Err(e) = yatube::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        yatube::logging::init_console_only(&config.logging.level);
    }

    match run(cli.command.unwrap_or(Commands::Serve), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(&config.database.path).await?;

    match command {
        Commands::Serve => {
            config.validate()?;
            let templates = TemplateLoader::new(&config.templates.path).load()?;
            info!("Yatube - {}", config.site.name);
            info!(
                "Server configured on {}:{}",
                config.server.host, config.server.port
            );
            WebServer::new(&config, db, templates)?.run().await?;
        }
        Commands::CreateUser { username, password } => {
            let user = AdminService::new(&db).create_user(&username, &password).await?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        Commands::DeleteUser { username } => {
            AdminService::new(&db).delete_user(&username).await?;
            println!("Deleted user {username}");
        }
        Commands::CreateGroup {
            slug,
            title,
            description,
        } => {
            let group = AdminService::new(&db)
                .create_group(&slug, &title, &description)
                .await?;
            println!("Created group {} ({})", group.title, group.slug);
        }
        Commands::DeleteGroup { slug } => {
            AdminService::new(&db).delete_group(&slug).await?;
            println!("Deleted group {slug}");
        }
    }

    Ok(())
}
