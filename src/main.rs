use intake_chat::catalog::{Catalog, builtin_catalog};
use intake_chat::cli::{CliExit, CliFrontend, stdin_lines};
use intake_chat::config::AppConfig;
use intake_chat::handoff::sink_for;
use intake_chat::session::ConversationController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Logs go to stderr so they never mix with the chat or the JSON handoff.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.output.default_log_filter())
            }),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).await?,
        None => builtin_catalog()?,
    };

    eprintln!("保育士転職相談 v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   あなたに合った保育園をご紹介させていただきます");
    eprintln!(
        "   Catalog: {} ({} questions)",
        config
            .catalog_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        catalog.len()
    );
    eprintln!("   Type an answer and press Enter. /skip to skip, /quit to exit.\n");

    let controller = ConversationController::new(catalog.shared(), config.session.clone());
    let session_id = controller.session_id();

    let mut cli = CliFrontend::new(controller, stdin_lines(), std::io::stdout());
    match cli.run().await? {
        CliExit::Completed(answers) => {
            let sink = sink_for(config.output);
            sink.deliver(session_id, &answers).await?;
        }
        CliExit::Quit => tracing::info!(session_id = %session_id, "Session abandoned"),
        CliExit::Eof => tracing::info!(session_id = %session_id, "Input closed before completion"),
    }

    Ok(())
}
