use std::process::ExitCode;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut console = bb_issues::output::Console::new(&mut stdout, &mut stderr);

    let outcome = bb_issues::run::run(|name| std::env::var(name).ok(), None, &mut console).await?;
    Ok(ExitCode::from(outcome.exit_code()))
}
