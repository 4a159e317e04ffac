use anyhow::Result;
use clap::{Parser, Subcommand};
use docchat_core::error::ChatError;
use docchat_core::retrieval::DEFAULT_TOP_K;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::context::AppContext;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "docchat CLI - chat sessions and documents on a docchat server", long_about = None)]
struct Cli {
    /// Server URL, overrides config.toml and DOCCHAT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the credential
    Login {
        username: String,
        /// Password; read from stdin when omitted
        #[arg(long, env = "DOCCHAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored credential
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Create an account (needs admin approval before login)
    Register {
        username: String,
        email: String,
        #[arg(long, env = "DOCCHAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Send a message to a session
    Send {
        text: String,
        /// Target session; defaults to the first listed session
        #[arg(long)]
        session: Option<String>,
    },
    /// Manage uploaded documents
    Documents {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Approve or disapprove accounts (admin only)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List sessions
    List,
    /// Create a session
    Create { name: Option<String> },
    /// Rename a session
    Rename { id: String, name: String },
    /// Delete a session
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the messages of a session
    Show { id: String },
}

#[derive(Subcommand)]
enum DocumentAction {
    /// List documents
    List,
    /// Upload a PDF
    Upload { path: std::path::PathBuf },
    /// Delete a document
    Delete { id: String },
    /// Search the uploaded documents
    Query {
        query: String,
        /// Number of passages to return
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Show the state of the search index
    IndexStatus,
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List,
    /// Approve an account
    Approve { id: String },
    /// Revoke approval of an account
    Disapprove { id: String },
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::load(cli.api_url.as_deref())?;
    init_tracing(&ctx.config.logging.level);
    tracing::debug!("[Bootstrap] Using server {}", ctx.config.api.base_url);

    if let Err(err) = run(&ctx, cli.command).await {
        if err
            .downcast_ref::<ChatError>()
            .is_some_and(ChatError::is_unauthorized)
        {
            eprintln!("🔒 Not logged in or login expired. Run `docchat login <username>`.");
        }
        return Err(err);
    }
    Ok(())
}

async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            commands::auth::login(ctx, &username, password).await?
        }
        Commands::Logout => commands::auth::logout(ctx)?,
        Commands::Whoami => commands::auth::whoami(ctx).await?,
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(ctx, &username, &email, password).await?,
        Commands::Sessions { action } => match action {
            SessionAction::List => commands::sessions::list(ctx).await?,
            SessionAction::Create { name } => {
                commands::sessions::create(ctx, name.as_deref()).await?
            }
            SessionAction::Rename { id, name } => {
                commands::sessions::rename(ctx, &id, &name).await?
            }
            SessionAction::Delete { id, yes } => commands::sessions::delete(ctx, &id, yes).await?,
            SessionAction::Show { id } => commands::sessions::show(ctx, &id).await?,
        },
        Commands::Send { text, session } => {
            commands::sessions::send(ctx, session.as_deref(), &text).await?
        }
        Commands::Documents { action } => match action {
            DocumentAction::List => commands::documents::list(ctx).await?,
            DocumentAction::Upload { path } => commands::documents::upload(ctx, &path).await?,
            DocumentAction::Delete { id } => commands::documents::delete(ctx, &id).await?,
            DocumentAction::Query { query, top_k } => {
                commands::documents::query(ctx, &query, top_k).await?
            }
            DocumentAction::IndexStatus => commands::documents::index_status(ctx).await?,
        },
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(ctx).await?,
            UserAction::Approve { id } => commands::users::approve(ctx, &id).await?,
            UserAction::Disapprove { id } => commands::users::disapprove(ctx, &id).await?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::config::ClientConfig;

    #[test]
    fn test_env_filter_from_configured_level() {
        let config = ClientConfig::default();
        let filter = env_filter(&config.logging.level);
        assert!(!filter.to_string().is_empty());
    }

    #[test]
    fn test_document_query_defaults_top_k() {
        let cli = Cli::try_parse_from(["docchat", "documents", "query", "total due"]).unwrap();
        let Commands::Documents {
            action: DocumentAction::Query { query, top_k },
        } = cli.command
        else {
            panic!("expected documents query");
        };
        assert_eq!(query, "total due");
        assert_eq!(top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_api_url_flag_is_global() {
        let cli = Cli::try_parse_from(["docchat", "sessions", "list", "--api-url", "http://h:1"])
            .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://h:1"));
        assert!(matches!(
            cli.command,
            Commands::Sessions {
                action: SessionAction::List
            }
        ));
    }
}
