use anyhow::Context;
use clap::Parser;
use easyapply::actions::Timing;
use easyapply::browser::{ChromeSession, LaunchOptions};
use easyapply::config::Config;
use easyapply::controller::RunController;
use easyapply::driver::PageDriver;
use easyapply::i18n::Messages;
use easyapply::login::{self, Credentials};
use easyapply::report::ReportWriter;
use easyapply::search;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Path to the outcome report
    #[arg(short, long, default_value = "report.csv")]
    report: PathBuf,

    /// Run the browser headless regardless of the config
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .await
        .with_context(|| format!("loading {}", args.config.display()))?;
    let messages = easyapply::i18n::load(&config.locale).context("loading locale table")?;

    println!("\n==========================================\n");
    println!("\t{}", messages.app_title);
    println!("\n==========================================\n");

    let user_data_dir = config.user_data_dir.clone().or_else(|| {
        // Persistent by default so the signed-in session survives runs.
        dirs::data_local_dir().map(|dir| dir.join("easyapply").join("profile"))
    });

    // Setup failures are the only fatal ones; everything past launch degrades
    // per job or per page instead of aborting.
    let session = ChromeSession::launch(LaunchOptions {
        headless: config.headless || args.headless,
        chrome_path: config.browser_path.clone(),
        user_data_dir,
        window_arg: config.resolution.clone(),
        no_sandbox: false,
    })
    .await
    .context("launching Chrome")?;

    let report = ReportWriter::create(&args.report).context("opening report")?;

    let outcome = run(&session, &config, &messages, &report).await;

    // Release the session and flush the report on every exit path.
    if let Err(e) = session.close().await {
        log::warn!("browser close failed: {e}");
    }
    match report.close().await {
        Ok(written) => log::info!("report flushed, {written} records"),
        Err(e) => log::error!("report flush failed: {e}"),
    }

    outcome
}

async fn run(
    session: &ChromeSession,
    config: &Config,
    messages: &Messages,
    report: &ReportWriter,
) -> anyhow::Result<()> {
    let timing = Timing::default();
    let driver: &dyn PageDriver = session;

    driver
        .navigate(&config.base_url)
        .await
        .context("initial navigation")?;

    match Credentials::from_env() {
        Some(credentials) => login::sign_in(driver, &credentials, &timing)
            .await
            .context("signing in")?,
        None => log::info!("no credentials in environment, relying on stored session"),
    }

    if let Err(e) = search::filter_and_search(driver, config, &timing).await {
        log::warn!("search filtering incomplete ({e}), continuing with shown results");
    }

    let mut controller = RunController::new(driver, config, messages, report, timing)?;
    let summary = controller.run().await?;

    log::info!(
        "run finished via {:?}: {} processed, {} applied, {} skipped, {} already applied, {} pages",
        summary.termination,
        summary.processed,
        summary.applied,
        summary.skipped,
        summary.already_applied,
        summary.pages_visited,
    );
    Ok(())
}
