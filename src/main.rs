//! CLI entry point for academy-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_site::Site;

#[derive(Parser)]
#[command(name = "academy-site")]
#[command(version)]
#[command(about = "Blog, feeds and lead capture for the academy website", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// Category (defaults to `default_category` from the config)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the blog, feeds and API
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Remove the public folder
    Clean,

    /// List posts or taxonomy values
    List {
        /// Type of content to list (post, tag, category, author, series)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "academy_site=debug,tower_http=debug,info"
    } else {
        "academy_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New {
            title,
            category,
            draft,
        } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            site.new_post(&title, category.as_deref(), draft)?;
        }

        Commands::Generate { watch } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                academy_site::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            academy_site::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir)?;
            academy_site::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("academy-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
