use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use amina_agent::ChatbotFactory;
use amina_core::config::AminaConfig;
use amina_core::KnowledgeStore;

mod app;
mod http;
mod repl;
mod sessions;

/// How often idle sessions are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "amina-gateway")]
#[command(about = "Amina - SarayaTech's website assistant")]
#[command(version)]
struct Cli {
    /// Path to amina.toml (defaults to $AMINA_CONFIG, then ~/.amina/amina.toml)
    #[arg(long, short, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP chat gateway (default)
    Serve {
        #[arg(long, help = "Override gateway.port")]
        port: Option<u16>,
        #[arg(long, help = "Override gateway.bind")]
        bind: Option<String>,
    },
    /// Answer a single message and exit
    Ask {
        #[arg(required = true)]
        message: Vec<String>,
        #[arg(long, help = "Skip the hosted model")]
        intent_only: bool,
    },
    /// Chat interactively in the terminal
    Repl {
        #[arg(long, help = "Skip the hosted model")]
        intent_only: bool,
    },
    /// Print the encoded knowledge context and its token estimate
    Encode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "amina_gateway=info,amina_agent=info,tower_http=debug".into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // explicit path > AMINA_CONFIG > ~/.amina/amina.toml
    let config = AminaConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        AminaConfig::default()
    });

    // invalid knowledge data is fatal
    let store = Arc::new(KnowledgeStore::load(&config.knowledge)?);
    let factory = ChatbotFactory::from_config(&config, store)?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        bind: None,
    }) {
        Commands::Serve { port, bind } => serve(config, factory, port, bind).await,
        Commands::Ask {
            message,
            intent_only,
        } => {
            let mut bot = factory.build();
            if intent_only {
                bot.toggle_mode(false);
            }
            println!("{}", bot.get_response(&message.join(" ")).await);
            Ok(())
        }
        Commands::Repl { intent_only } => {
            let mut bot = factory.build();
            if intent_only {
                bot.toggle_mode(false);
            }
            repl::run(bot).await
        }
        Commands::Encode => {
            let context = factory.context();
            println!("{}", context.text);
            eprintln!(
                "~{} tokens ({} chars)",
                context.token_estimate,
                context.text.chars().count()
            );
            Ok(())
        }
    }
}

async fn serve(
    mut config: AminaConfig,
    factory: ChatbotFactory,
    port: Option<u16>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.gateway.port = port;
    }
    if let Some(bind) = bind {
        config.gateway.bind = bind;
    }
    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;

    let state = Arc::new(app::AppState::new(config, factory));
    let router = app::build_router(state.clone());

    // sweep idle sessions in the background
    let sweeper = Arc::clone(&state);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            tick.tick().await;
            sweeper.sessions.prune_idle();
        }
    });

    info!(
        hosted = state.factory.hosted_available(),
        ttl_secs = state.config.gateway.session_ttl_secs,
        "Amina gateway listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
