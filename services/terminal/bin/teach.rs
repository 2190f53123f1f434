//! Main Entrypoint for the Teachback terminal client
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and command line.
//! 2. Initializing logging on stderr, leaving stdout to the session view.
//! 3. Constructing the HTTP backend, terminal view and session controller.
//! 4. Reading lines from stdin and feeding them to the controller until exit.

use anyhow::Context;
use clap::Parser;
use teachback_core::{
    EventMap, HttpBackend, Notification, NotificationKind, SessionView, SessionViewController,
};
use teachback_terminal::{
    config::{Config, validate_api_url},
    input::{HELP, LineCommand, parse_line},
    terminal::TerminalView,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about = "Learn a topic by teaching it to a simulated student")]
struct Args {
    /// Base URL of the teaching service (overrides TEACHBACK_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Start a session on this topic immediately.
    #[arg(long)]
    topic: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // --- 1. Load Configuration ---
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = args.api_url {
        config.api_url = validate_api_url(&api_url)
            .map_err(anyhow::Error::msg)
            .context("Invalid --api-url")?;
    }

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
    info!(api_url = %config.api_url, "Configuration loaded");

    // --- 3. Build the Controller ---
    let backend = HttpBackend::new(config.api_url.as_str(), config.endpoints.clone())
        .context("Failed to build HTTP client")?;
    let view = TerminalView::new(std::io::stdout());
    let mut controller = SessionViewController::new(view, backend, EventMap::standard())
        .with_notification_ttl(config.notification_ttl);

    controller.refresh();
    controller.view_mut().notify(Notification::new(
        NotificationKind::Info,
        format!("Teaching service: {} (type /help for commands)", config.api_url),
        config.notification_ttl,
    ));

    // One handler for the whole run, so Ctrl-C also interrupts an in-flight request.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if let Some(topic) = args.topic {
        tokio::select! {
            // Failures are already shown in the view.
            _ = controller.select_quick_topic(&topic) => {}
            _ = &mut ctrl_c => {
                info!("Interrupted while starting the session.");
                return Ok(());
            }
        }
    }

    // --- 4. Run the Input Loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let state = controller.view_state();
        controller.view_mut().prompt(state);

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = &mut ctrl_c => None,
        };
        let Some(line) = line else { break };

        match parse_line(&line, controller.view_state()) {
            LineCommand::Events(events) => {
                let dispatch = async {
                    for event in events {
                        if let Err(e) = controller.handle(event).await {
                            debug!(error = %e, "Action failed");
                        }
                    }
                };
                tokio::select! {
                    _ = dispatch => {}
                    _ = &mut ctrl_c => {
                        info!("Interrupted during a request.");
                        break;
                    }
                }
            }
            LineCommand::Help => controller.view_mut().print(HELP),
            LineCommand::Quit => break,
            LineCommand::Unknown(reason) => {
                let ttl = config.notification_ttl;
                controller
                    .view_mut()
                    .notify(Notification::new(NotificationKind::Error, reason, ttl));
            }
        }
    }

    info!("Exiting teaching client.");
    Ok(())
}
