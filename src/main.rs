//! Blog Comments CLI
//!
//! Command-line front end for the local comment store:
//! - Post a comment
//! - List a post's comments
//! - Show the comment count badge
//! - Generate a config file

use anyhow::Context;
use blog_comments::config::{generate_default_config, Config, LoggingConfig};
use blog_comments::{CommentError, CountProjector};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-comments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local comment threads for a static blog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Post a comment
    Post {
        /// Post identifier
        post_id: String,
        /// Your name
        #[arg(short, long)]
        name: String,
        /// Your email
        #[arg(short, long)]
        email: String,
        /// Comment text
        #[arg(short, long)]
        message: String,
    },

    /// List comments, newest first
    List {
        /// Post identifier
        post_id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the comment count
    Count {
        /// Post identifier
        post_id: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Post {
            post_id,
            name,
            email,
            message,
        } => {
            let store = config.storage.open_store().context("Failed to open comment store")?;

            match store.append(&post_id, &name, &email, &message) {
                Ok(comments) => {
                    if !store.is_persistent() {
                        eprintln!("Warning: storage backend is disabled, comment was not saved");
                    }
                    println!("Comment posted ({})", blog_comments::count_label(comments.len()));
                }
                Err(CommentError::Validation(_)) => {
                    eprintln!("Please fill in all fields");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::List { post_id, format } => {
            let store = config.storage.open_store().context("Failed to open comment store")?;
            let comments = store.load(&post_id);

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&comments)?);
                }
                OutputFormat::Table => {
                    println!("Comments ({})", comments.len());
                    if comments.is_empty() {
                        println!("No comments yet. Be the first to share your thoughts!");
                    }
                    for comment in &comments {
                        println!();
                        println!(
                            "[{}] {} <{}> - {}",
                            comment.initial().unwrap_or('?'),
                            comment.name,
                            comment.email,
                            comment.display_date()
                        );
                        println!("{}", comment.message);
                    }
                }
            }
        }

        Commands::Count { post_id } => {
            let store = config.storage.open_store().context("Failed to open comment store")?;
            let badge = CountProjector::mounted(&store, post_id);
            println!("{}", badge.label());
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Install the tracing subscriber; logs go to stderr so stdout stays clean
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("blog_comments={}", logging.level)),
    );

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
