//! Clap derive structures for the `bololo` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bololo -- control Bololo smart appliances from the command line
#[derive(Debug, Parser)]
#[command(
    name = "bololo",
    version,
    about = "Control Bololo smart appliances from the command line",
    long_about = "Log in with an SMS code, discover the appliances on your Bololo\n\
        account, read their status, and switch their functions.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "BOLOLO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Vendor application key (overrides profile)
    #[arg(long, env = "BOLOLO_APP_KEY", global = true, hide_env_values = true)]
    pub app_key: Option<String>,

    /// Mobile number of the account (overrides profile)
    #[arg(long, short = 'm', env = "BOLOLO_MOBILE", global = true)]
    pub mobile: Option<String>,

    /// User token (overrides profile and keyring)
    #[arg(long, env = "BOLOLO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Cloud base URL (overrides profile)
    #[arg(long, env = "BOLOLO_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOLOLO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "BOLOLO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 10]
    #[arg(long, env = "BOLOLO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with an SMS verification code and save the token
    Login(LoginArgs),

    /// List and inspect discovered appliances
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List homes and rooms
    Homes(HomesArgs),

    /// Show the raw status of an appliance
    Status(StatusArgs),

    /// List entities (one per appliance function) and their state
    #[command(alias = "ent", alias = "e")]
    Entities(EntitiesArgs),

    /// Turn an appliance function on or off
    Switch(SwitchArgs),

    /// Choose an option for a timer function
    Select(SelectArgs),

    /// Poll all entities and print state changes until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Verification code already received (skips requesting a new one)
    #[arg(long)]
    pub code: Option<String>,

    /// Save the token in the config file instead of the system keyring
    #[arg(long)]
    pub plaintext: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List supported appliances on the account
    #[command(alias = "ls")]
    List,

    /// Show one appliance
    Get {
        /// Appliance MAC address
        device: String,
    },
}

// ── Homes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HomesArgs {
    #[command(subcommand)]
    pub command: HomesCommand,
}

#[derive(Debug, Subcommand)]
pub enum HomesCommand {
    /// List homes with their rooms
    #[command(alias = "ls")]
    List,
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Appliance MAC address
    pub device: String,

    /// Only show these status fields
    #[arg(long, short = 'f')]
    pub field: Vec<String>,
}

// ── Entities ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EntitiesArgs {
    #[command(subcommand)]
    pub command: EntitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EntitiesCommand {
    /// List entities with their current state
    #[command(alias = "ls")]
    List {
        /// Only entities of this appliance
        device: Option<String>,
    },
}

// ── Switch / Select ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Appliance MAC address
    pub device: String,

    /// Function key (e.g. power, anion, night_mode) or server field
    pub function: String,

    /// Desired state
    pub state: SwitchState,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Appliance MAC address
    pub device: String,

    /// Function key (disinfection_time, auto_time)
    pub function: String,

    /// Option to select (e.g. off, 10, 15, 20)
    pub option: String,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (defaults to the configured poll_interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Only watch this appliance
    #[arg(long, short = 'd')]
    pub device: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (secrets masked)
    Show,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// List configured profiles
    Profiles,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
