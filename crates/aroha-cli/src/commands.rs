use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use aroha_core::models::assessment::RecordOrigin;
use aroha_core::models::consent::ConsentRecord;
use aroha_core::models::locale::Locale;
use aroha_core::resources::{Resources, format_phone_number};
use aroha_export::report_file_name;
use aroha_instruments::Instrument;
use aroha_instruments::error::InstrumentError;
use aroha_instruments::instruments::phq9::{self, Phq9, ScoredAssessment};
use aroha_instruments::trend::{self, Trend};
use aroha_storage::consent::ConsentState;
use aroha_sync::{MigrationFlow, MigrationResolution, MigrationState, RemoteOutcome};

use crate::cli::{
    ClearCommand, Command, ConfigCommand, ConsentCommand, Credentials, ExportCommand,
    HistoryArgs, ReportFormat, SyncCommand, TakeArgs,
};
use crate::config::{self, RemoteSettings};
use crate::state::AppContext;

pub async fn run(ctx: &mut AppContext, command: Command) -> eyre::Result<()> {
    match command {
        Command::Take(args) => take(ctx, args).await,
        Command::History(args) => history(ctx, args).await,
        Command::Export(cmd) => export(ctx, cmd).await,
        Command::Consent(cmd) => consent(ctx, cmd),
        Command::Lang { code } => lang(ctx, code),
        Command::Sync(cmd) => sync(ctx, cmd).await,
        Command::Login(creds) => login(ctx, creds).await,
        Command::Signup(creds) => signup(ctx, creds).await,
        Command::Logout => logout(ctx).await,
        Command::Migrate { yes, decline } => migrate(ctx, yes, decline).await,
        Command::Clear(cmd) => clear(ctx, cmd).await,
        Command::Doctor => doctor(ctx).await,
        Command::Config(cmd) => configure(ctx, cmd),
    }
}

async fn take(ctx: &AppContext, args: TakeArgs) -> eyre::Result<()> {
    let consented = match ctx.store().consent_state() {
        ConsentState::Structured(record) => record.has_consented,
        ConsentState::Legacy => true,
        ConsentState::Absent => false,
    };
    if !consented {
        eyre::bail!("consent is required before taking the assessment; run `aroha consent give`");
    }

    let answers: Vec<Option<u8>> = match args.answers {
        Some(values) => values.into_iter().map(Some).collect(),
        None => prompt_answers()?,
    };

    let (record, scored) = match phq9::new_record(&answers, ctx.locale.get()) {
        Ok(created) => created,
        Err(InstrumentError::Incomplete { missing, .. }) => {
            let list: Vec<String> = missing.iter().map(usize::to_string).collect();
            eyre::bail!(
                "please answer every question before submitting (unanswered: {})",
                list.join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    ctx.sync.save_record(record).await?;
    print_result(&scored, &ctx.resources);
    Ok(())
}

fn prompt_answers() -> eyre::Result<Vec<Option<u8>>> {
    let instrument = Phq9;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Over the last 2 weeks, how often have you been bothered by the following?");
    for option in instrument.response_options() {
        println!("  {} = {}", option.value, option.label);
    }

    let mut answers = Vec::with_capacity(phq9::ITEM_COUNT);
    for item in instrument.items() {
        print!("\n{}. {}\n> ", item.number, item.prompt);
        stdout.flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let answer = line.trim().parse::<u8>().ok();
        if answer.is_none() {
            println!("(left unanswered)");
        }
        answers.push(answer);
    }
    Ok(answers)
}

fn print_result(scored: &ScoredAssessment, resources: &Resources) {
    println!();
    println!("Total score: {}/{}", scored.total, phq9::MAX_TOTAL);
    println!("Severity: {}", scored.severity);

    if scored.nudge {
        println!();
        println!(
            "Your answers suggest it could help to talk things over with your GP \
             or another health professional."
        );
    }
    if scored.escalate {
        println!();
        println!("If you are finding things hard right now, support is available:");
        for contact in resources.emergency() {
            let mut line = format!("  {}", contact.name);
            if let Some(phone) = &contact.phone {
                line.push_str(&format!(": call {}", format_phone_number(phone)));
            }
            if let Some(text) = &contact.text {
                line.push_str(&format!(", text {text}"));
            }
            println!("{line} ({})", contact.available);
        }
        for online in resources.online.values() {
            println!("  {}: {}", online.name, online.website);
        }
    }
}

async fn history(ctx: &AppContext, args: HistoryArgs) -> eyre::Result<()> {
    let mut records = if args.local {
        ctx.store().records()
    } else {
        ctx.sync.get_merged_records().await
    };
    if let Some(days) = args.days {
        records = trend::filter_recent(&records, days, jiff::Timestamp::now());
    }
    if records.is_empty() {
        println!("No saved results yet.");
        return Ok(());
    }
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    for record in &records {
        let origin = match record.origin {
            Some(RecordOrigin::Cloud) => "cloud",
            _ => "local",
        };
        println!(
            "{}  {:>2}/27  {:<18} {}",
            record.created_at.strftime("%Y-%m-%d %H:%M"),
            record.total,
            record.severity.label(),
            origin
        );
    }

    let summary = trend::summarize(&records);
    println!();
    println!("Results: {}  Average: {:.1}", records.len(), summary.average);
    match summary.trend {
        Trend::InsufficientData => {}
        Trend::Stable => println!("Trend: stable"),
        Trend::Improving => println!("Trend: improving ({}%)", summary.trend_percentage),
        Trend::Worsening => println!("Trend: worsening ({}%)", summary.trend_percentage),
    }

    if args.monthly {
        println!();
        for month in trend::monthly_averages(&records) {
            println!("{}  {:>4.1}  ({} results)", month.month, month.average, month.count);
        }
    }
    Ok(())
}

async fn export(ctx: &AppContext, cmd: ExportCommand) -> eyre::Result<()> {
    match cmd {
        ExportCommand::Json { output } => {
            let json = ctx.store().export_all_data()?;
            match output {
                Some(path) => {
                    write_file(&path, json.as_bytes())?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        ExportCommand::Report { format, output } => {
            let records = ctx.sync.get_merged_records().await;
            let now = jiff::Timestamp::now();
            let locale = ctx.locale.get();
            let (bytes, extension) = match format {
                ReportFormat::Docx => (aroha_export::report_docx(&records, locale, now)?, "docx"),
                ReportFormat::Markdown => (
                    aroha_export::report_markdown(&records, locale, now)?.into_bytes(),
                    "md",
                ),
            };
            let path = output.unwrap_or_else(|| report_file_name(now, extension).into());
            write_file(&path, &bytes)?;
            println!("Report written to {}", path.display());
        }
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> eyre::Result<()> {
    std::fs::write(path, bytes)
        .map_err(|e| eyre::eyre!("failed to write {}: {e}", path.display()))
}

fn consent(ctx: &AppContext, cmd: ConsentCommand) -> eyre::Result<()> {
    match cmd {
        ConsentCommand::Give => {
            ctx.store().set_consent(&ConsentRecord::given_now())?;
            println!("Consent recorded.");
        }
        ConsentCommand::Revoke => {
            ctx.store().set_consent(&ConsentRecord::revoked_now())?;
            println!("Consent withdrawn.");
        }
        ConsentCommand::Show => match ctx.store().consent_state() {
            ConsentState::Structured(record) => match (record.has_consented, record.consent_date) {
                (true, Some(date)) => println!("Consented on {date}"),
                (true, None) => println!("Consented (date not recorded)"),
                (false, Some(date)) => println!("Consent withdrawn on {date}"),
                (false, None) => println!("Consent withdrawn"),
            },
            ConsentState::Legacy => println!("Consented (date not recorded)"),
            ConsentState::Absent => println!("No consent recorded"),
        },
    }
    Ok(())
}

fn lang(ctx: &mut AppContext, code: Option<String>) -> eyre::Result<()> {
    let Some(code) = code else {
        println!("{}", ctx.locale.get());
        return Ok(());
    };
    let locale = Locale::from_code(&code).ok_or_else(|| {
        let known: Vec<&str> = Locale::ALL.iter().map(|l| l.code()).collect();
        eyre::eyre!("unknown language `{code}` (expected one of {})", known.join(", "))
    })?;
    ctx.locale.set(ctx.sync.local(), locale)?;
    println!("Language set to {locale}");
    Ok(())
}

async fn sync(ctx: &AppContext, cmd: SyncCommand) -> eyre::Result<()> {
    match cmd {
        SyncCommand::On => {
            ctx.sync.set_cloud_sync_enabled(true)?;
            if ctx.sync.is_remote_configured() {
                println!("Cloud sync on.");
            } else {
                println!("Cloud sync on, but no remote backend is configured; results stay local.");
            }
        }
        SyncCommand::Off => {
            ctx.sync.set_cloud_sync_enabled(false)?;
            println!("Cloud sync off.");
        }
        SyncCommand::Status => {
            println!("remote configured: {}", ctx.sync.is_remote_configured());
            println!("cloud sync enabled: {}", ctx.sync.is_cloud_sync_enabled());
            match ctx.sync.current_session().await {
                Some(session) => {
                    let who = session.user.email.as_deref().unwrap_or(session.user_id());
                    println!("signed in: {who}");
                }
                None => println!("signed in: no"),
            }
            println!("local results: {}", ctx.store().records().len());
            if let RemoteOutcome::Success(count) = ctx.sync.remote_record_count().await {
                println!("cloud results: {count}");
            }
        }
    }
    Ok(())
}

async fn login(ctx: &AppContext, creds: Credentials) -> eyre::Result<()> {
    let auth = ctx.require_auth()?;
    let session = auth
        .sign_in_with_password(&creds.email, &creds.password)
        .await?;
    println!("Signed in as {}", session.user.email.as_deref().unwrap_or(&creds.email));
    offer_migration(ctx, false, false).await?;
    Ok(())
}

async fn signup(ctx: &AppContext, creds: Credentials) -> eyre::Result<()> {
    let auth = ctx.require_auth()?;
    match auth.sign_up(&creds.email, &creds.password).await? {
        Some(_) => {
            println!("Account created and signed in.");
            offer_migration(ctx, false, false).await?;
            Ok(())
        }
        None => {
            println!("Account created. Check your email to confirm it, then run `aroha login`.");
            Ok(())
        }
    }
}

async fn logout(ctx: &AppContext) -> eyre::Result<()> {
    ctx.sync.sign_out().await?;
    println!("Signed out. Your local results are kept on this device.");
    Ok(())
}

async fn migrate(ctx: &AppContext, yes: bool, decline: bool) -> eyre::Result<()> {
    if ctx.sync.current_session().await.is_none() {
        eyre::bail!("sign in first with `aroha login`");
    }
    if offer_migration(ctx, yes, decline).await? {
        return Ok(());
    }
    if ctx.store().records().is_empty() {
        println!("No local results to migrate.");
        return Ok(());
    }
    if !yes {
        println!("Migration was already offered for this account. Use `aroha migrate --yes` to copy again.");
        return Ok(());
    }

    // Explicit re-run after the one-time offer; records already in the
    // account are skipped.
    match ctx.sync.migrate_local_records(None).await {
        RemoteOutcome::Success(report) => println!(
            "Copied {}, already present {}, failed {}.",
            report.migrated, report.skipped, report.errors
        ),
        RemoteOutcome::Unavailable(reason) => println!("Migration skipped: {reason}."),
        RemoteOutcome::Error(e) => println!("Migration failed: {e}"),
    }
    Ok(())
}

/// Run the one-time migration offer for the signed-in user. Returns
/// whether an offer was made.
async fn offer_migration(ctx: &AppContext, yes: bool, decline: bool) -> eyre::Result<bool> {
    let mut flow = MigrationFlow::new();
    let pending = match flow.on_auth_changed(&ctx.sync).await {
        MigrationState::Offered { pending, .. } => *pending,
        _ => return Ok(false),
    };

    let accept = if yes {
        true
    } else if decline {
        false
    } else if std::io::stdin().is_terminal() {
        print!("You have {pending} result(s) saved on this device. Copy them to your account? [y/N] ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        matches!(line.trim(), "y" | "Y" | "yes")
    } else {
        println!("You have {pending} local result(s). Run `aroha migrate --yes` to copy them to your account.");
        return Ok(true);
    };

    if !accept {
        flow.decline(&ctx.sync)?;
        println!("Keeping your results on this device only.");
        return Ok(true);
    }

    if let MigrationState::Done { resolution, .. } = flow.confirm(&ctx.sync).await? {
        match resolution {
            MigrationResolution::Migrated(report) => println!(
                "Copied {}, already present {}, failed {}.",
                report.migrated, report.skipped, report.errors
            ),
            MigrationResolution::Unavailable(reason) => println!("Migration skipped: {reason}."),
            MigrationResolution::Failed(message) => println!("Migration failed: {message}"),
            MigrationResolution::Declined => {}
        }
    }
    Ok(true)
}

async fn clear(ctx: &AppContext, cmd: ClearCommand) -> eyre::Result<()> {
    let include_cloud = match cmd {
        ClearCommand::Records { include_cloud } => {
            ctx.store().clear_records()?;
            println!("Local results deleted.");
            include_cloud
        }
        ClearCommand::All { include_cloud } => {
            ctx.store().clear_all_data()?;
            println!("Local results, language and consent deleted.");
            include_cloud
        }
    };

    if include_cloud {
        match ctx.sync.delete_remote_records().await {
            RemoteOutcome::Success(count) => println!("Deleted {count} cloud result(s)."),
            RemoteOutcome::Unavailable(reason) => {
                eyre::bail!("cloud results not deleted: {reason}")
            }
            RemoteOutcome::Error(e) => eyre::bail!("cloud results not deleted: {e}"),
        }
    }
    Ok(())
}

async fn doctor(ctx: &AppContext) -> eyre::Result<()> {
    let report = ctx.sync.diagnose().await;
    println!("configured:    {}", report.configured);
    println!("authenticated: {}", report.authenticated);
    println!("can read:      {}", report.can_read);
    if let Some(count) = report.remote_count {
        println!("cloud results: {count}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
    if report.is_healthy() {
        println!("Remote backend OK.");
    }
    Ok(())
}

fn configure(ctx: &mut AppContext, cmd: ConfigCommand) -> eyre::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let info = config::config_info(&ctx.config_path, &ctx.config, &ctx.store_path, |k| {
                std::env::var(k).ok()
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        ConfigCommand::SetRemote { url, anon_key } => {
            ctx.config.supabase = Some(RemoteSettings { url, anon_key });
            config::save_config_to(&ctx.config_path, &ctx.config)?;
            println!("Remote backend saved to {}", ctx.config_path.display());
        }
        ConfigCommand::ClearRemote => {
            ctx.config.supabase = None;
            config::save_config_to(&ctx.config_path, &ctx.config)?;
            println!("Remote backend removed.");
        }
    }
    Ok(())
}
