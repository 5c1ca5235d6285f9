use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use dao_onboarding::cli::{self, TerminalHost};
use dao_onboarding::config::OnboardingConfig;
use dao_onboarding::error::Result;
use dao_onboarding::onboarding::{OnboardingController, StaticNameRegistry};
use dao_onboarding::templates::TemplateRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env()?;
    let templates = Arc::new(TemplateRegistry::with_builtins());
    let names = StaticNameRegistry::from_env();

    eprintln!("🏛  DAO onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Templates: {}", templates.list().join(", "));
    eprintln!("   Taken names: {}", names.len());
    eprintln!("   Domain suffix: .{}", config.domain_suffix);
    eprintln!("   Type `help` for commands.\n");

    let mut ctrl = OnboardingController::new(
        config,
        templates,
        Arc::new(names),
        Arc::new(TerminalHost),
    );
    tracing::info!(session_id = %ctrl.session_id(), "Onboarding session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{}", cli::summary(&ctrl));
    eprint!("> ");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    eprint!("> ");
                    continue;
                }

                let keep_going = cli::parse_command(&line)
                    .and_then(|command| cli::apply_command(&mut ctrl, command));
                match keep_going {
                    Ok(false) => break,
                    Ok(true) => eprintln!("{}", cli::summary(&ctrl)),
                    Err(e) => eprintln!("⚠️  {e:#}"),
                }
                eprint!("> ");
            }
            Some(_) = ctrl.process_next() => {
                eprintln!("\n{}", cli::summary(&ctrl));
                eprint!("> ");
            }
        }
    }

    Ok(())
}
