use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "aroha", version, about = "PHQ-9 self-check with optional cloud backup")]
pub struct Cli {
    /// Local store file (defaults to the user data directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to the user config directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer the nine PHQ-9 questions and save the result.
    Take(TakeArgs),
    /// Show saved results with a summary and trend.
    History(HistoryArgs),
    /// Export data.
    #[command(subcommand)]
    Export(ExportCommand),
    /// Record, withdraw or show consent.
    #[command(subcommand)]
    Consent(ConsentCommand),
    /// Show or change the display language.
    Lang {
        /// `en`, `mi` or `zh`.
        code: Option<String>,
    },
    /// Cloud backup preference.
    #[command(subcommand)]
    Sync(SyncCommand),
    /// Sign in to the cloud account.
    Login(Credentials),
    /// Create a cloud account.
    Signup(Credentials),
    /// Sign out of the cloud account.
    Logout,
    /// Offer to copy local results into the signed-in account.
    Migrate {
        /// Migrate without asking.
        #[arg(long, conflicts_with = "decline")]
        yes: bool,
        /// Keep results local and stop asking.
        #[arg(long)]
        decline: bool,
    },
    /// Delete data.
    #[command(subcommand)]
    Clear(ClearCommand),
    /// Check the remote backend setup.
    Doctor,
    /// Show or change configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct TakeArgs {
    /// Nine comma-separated answers (0-3) instead of prompting.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub answers: Option<Vec<u8>>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only show results from the last N days.
    #[arg(long)]
    pub days: Option<i64>,
    /// Include monthly averages.
    #[arg(long)]
    pub monthly: bool,
    /// Local results only, even when cloud sync is on.
    #[arg(long)]
    pub local: bool,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Everything stored locally, as JSON.
    Json {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// History report.
    Report {
        #[arg(long, value_enum, default_value_t = ReportFormat::Docx)]
        format: ReportFormat,
        /// Output file; defaults to `phq9-summary-<date>.<ext>`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Docx,
    Markdown,
}

#[derive(Subcommand, Debug)]
pub enum ConsentCommand {
    Give,
    Revoke,
    Show,
}

#[derive(Subcommand, Debug)]
pub enum SyncCommand {
    On,
    Off,
    Status,
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    /// Read from AROHA_PASSWORD when omitted.
    #[arg(long, env = "AROHA_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum ClearCommand {
    /// Delete saved results, keeping language and consent.
    Records {
        /// Also delete the signed-in account's remote results.
        #[arg(long)]
        include_cloud: bool,
    },
    /// Delete results, language and consent.
    All {
        #[arg(long)]
        include_cloud: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    /// Store the remote backend URL and anon key.
    SetRemote {
        #[arg(long)]
        url: String,
        #[arg(long)]
        anon_key: String,
    },
    ClearRemote,
}
