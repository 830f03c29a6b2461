//! zola - streaming chat relay and terminal chat client

mod commands;
mod config;
mod line;
mod ui;
mod utils;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zola_ai::{models, providers::google::GoogleProvider};
use zola_client::{ChatSession, Error, ExtractionService, HttpRelayTransport};
use zola_relay::{RelayConfig, RelayState};

/// zola - chat with Gemini through a streaming relay
#[derive(Parser, Debug)]
#[command(name = "zola")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the relay endpoint
    Serve(ServeArgs),
    /// Chat through a running relay (default)
    Chat(ChatArgs),
    /// Write an example config file
    InitConfig,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to bind (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (default: 3000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of static assets served next to the endpoint
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Upstream model (default: gemini-2.0-flash)
    #[arg(short, long)]
    model: Option<String>,

    /// Upstream API base URL
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args, Debug, Default)]
struct ChatArgs {
    /// Relay endpoint URL
    #[arg(long)]
    relay_url: Option<String>,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// PDF files to attach before the first message
    #[arg(short, long, num_args = 1..)]
    attach: Vec<PathBuf>,

    /// Verbose output (logs to stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::Config::load();

    match cli.command.unwrap_or(Command::Chat(ChatArgs::default())) {
        Command::InitConfig => {
            match config::Config::init() {
                Ok(path) => {
                    println!("Config file created at: {}", path.display());
                    println!("\nExample config:\n{}", config::example_config());
                }
                Err(e) => {
                    eprintln!("Error creating config: {}", e);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Command::Serve(args) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("info,zola=debug")),
                )
                .init();
            run_serve(args, &cfg).await
        }
        Command::Chat(args) => {
            if args.verbose {
                tracing_subscriber::fmt()
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("zola=debug")),
                    )
                    .with_writer(std::io::stderr)
                    .init();
            }
            run_chat(args, &cfg).await
        }
    }
}

async fn run_serve(args: ServeArgs, cfg: &config::Config) -> anyhow::Result<()> {
    let provider = GoogleProvider::from_config(cfg.api_key.as_deref());
    if !provider.has_api_key() {
        tracing::warn!(
            "no Gemini API key found (config api_key, GEMINI_API_KEY or GOOGLE_API_KEY); \
             relay requests will fail"
        );
    }

    let mut model = match args.model.or_else(|| cfg.relay.model.clone()) {
        Some(id) => models::model_with_id(&id),
        None => models::default_model(),
    };
    if let Some(base_url) = args.base_url.or_else(|| cfg.relay.base_url.clone()) {
        model = model.with_base_url(base_url);
    }

    let defaults = RelayConfig::default();
    let relay_config = RelayConfig {
        host: args
            .host
            .or_else(|| cfg.relay.host.clone())
            .unwrap_or(defaults.host),
        port: args.port.or(cfg.relay.port).unwrap_or(defaults.port),
        static_dir: args.static_dir.or_else(|| cfg.relay.static_dir.clone()),
    };

    tracing::info!(model = %model.id, "starting relay");

    let state = RelayState::new(Arc::new(provider), model);
    zola_relay::serve(&relay_config, state).await?;
    Ok(())
}

async fn run_chat(args: ChatArgs, cfg: &config::Config) -> anyhow::Result<()> {
    let relay_url = args.relay_url.unwrap_or_else(|| cfg.relay_url());
    let transport = Arc::new(HttpRelayTransport::new(relay_url.clone()));
    let mut session = ChatSession::new(cfg.session_config(), transport);
    let extraction = ExtractionService::default();

    if !args.no_tui {
        return ui::run_tui(
            &mut session,
            extraction,
            &relay_url,
            cfg.notification_window(),
            args.attach,
        )
        .await;
    }

    run_interactive(&mut session, &extraction, &relay_url, args.attach).await
}

/// Line mode: read prompts from stdin, stream replies to stdout
async fn run_interactive(
    session: &mut ChatSession,
    extraction: &ExtractionService,
    relay_url: &str,
    attach: Vec<PathBuf>,
) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let handle = session.handle();
    let mut receiver = session.subscribe();
    let mut printer = line::LinePrinter::new(io::stdout());

    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("zola ({})", relay_url);
        eprintln!("{}", zola_client::GREETING);
        eprintln!();
    }

    if !attach.is_empty() {
        printer
            .pump(extraction.upload(&attach, &handle), &mut receiver)
            .await?;
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(result) = commands::execute_command(input, &handle.file_names()) {
            match result {
                commands::CommandResult::Attach(paths) => {
                    printer
                        .pump(extraction.upload(&paths, &handle), &mut receiver)
                        .await?;
                }
                commands::CommandResult::Remove(name) => {
                    if handle.remove_file(&name) == 0 {
                        println!("No attached file named {}", name);
                    }
                }
                commands::CommandResult::Clear => session.clear()?,
                commands::CommandResult::Retry => {
                    match printer.pump(session.retry(), &mut receiver).await? {
                        Ok(false) => println!("Nothing to retry."),
                        Ok(true) | Err(_) => {}
                    }
                }
                commands::CommandResult::Message(msg) => println!("{}", msg),
                commands::CommandResult::Exit => break,
                commands::CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            printer.drain(&mut receiver)?;
            continue;
        }

        println!();

        match printer.pump(session.send(input), &mut receiver).await? {
            Ok(()) => {}
            Err(Error::Busy) => eprintln!("Still waiting for the previous reply."),
            // Already reported through SendFailed
            Err(e) => tracing::debug!("send failed: {}", e),
        }

        println!();
    }

    Ok(())
}
