use crate::browser::session::BrowserSession;
use crate::browser::twitter::TwitterClient;
use crate::cli::config::{build_client_timing, AppConfig};
use crate::diff::engine::RelationSets;
use crate::harvest::harvester::harvest;
use crate::report::console::format_console_report;
use crate::report::report_model::AuditReport;
use crate::trace::logger::TraceLogger;

// ============================================================================
// audit subcommand
// ============================================================================

/// Sign in, harvest following and followers, report the difference, log out.
///
/// The two harvests run strictly sequentially against the one shared browser
/// view: each timeline is opened, drained, and only then is the next one
/// navigated to.
pub fn cmd_audit(config: &AppConfig, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let (username, password) = config.account.credentials()?;

    let tracer = match config.trace.file.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let session = BrowserSession::launch(&config.browser.server_script)?;
    let mut client = TwitterClient::new(
        session,
        build_client_timing(&config.timing),
        username.clone(),
    );

    if verbose > 0 {
        eprintln!("Signing in as {}...", username);
    }
    client.login(&username, &password)?;

    let start = std::time::Instant::now();

    if verbose > 0 {
        eprintln!("Harvesting following...");
    }
    client.open_following()?;
    let following = harvest(&mut client.following_source(), &tracer)?;

    if verbose > 0 {
        eprintln!("Harvested {} following; harvesting followers...", following.len());
    }
    client.open_followers()?;
    let followers = harvest(&mut client.followers_source(), &tracer)?;

    if verbose > 0 {
        eprintln!("Harvested {} followers", followers.len());
    }

    let sets = RelationSets {
        following,
        followers,
    };
    let report = AuditReport::from_sets(&sets).with_duration(start.elapsed().as_millis());

    print!("{}", format_console_report(&report));

    client.logout()?;
    client.quit()?;

    Ok(())
}
