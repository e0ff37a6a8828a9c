//! CLI surface: argument structs and subcommand definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

use spiderweb_core::{AlertSeverity, LinkKind, LinkStatus};

/// Command-line console for the Spiderweb network-operations backend.
#[derive(Debug, Parser)]
#[command(name = "spiderweb", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Global options ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use.
    #[arg(short = 'p', long, global = true, env = "SPIDERWEB_PROFILE")]
    pub profile: Option<String>,

    /// Backend API root, overriding the profile (e.g. http://noc:8000/api).
    #[arg(short = 'u', long, global = true, env = "SPIDERWEB_URL")]
    pub url: Option<String>,

    /// Session token, overriding the cached one.
    #[arg(long, global = true, env = "SPIDERWEB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format.
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// When to use colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Accept invalid TLS certificates (self-signed lab backends).
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Subcommands ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and cache a session token for the profile.
    Login(LoginArgs),
    /// Discard the cached session token.
    Logout,
    /// List networks.
    Networks(NetworksArgs),
    /// Core-site listings and admin.
    Sites(SitesArgs),
    /// Core-device listings and admin.
    Devices(DevicesArgs),
    /// Link listings.
    Links(LinksArgs),
    /// End-site listings.
    Endsites(EndsitesArgs),
    /// Alert listings and favorites.
    Alerts(AlertsArgs),
    /// Render one network's topology as text.
    Topology(TopologyArgs),
    /// Configuration helpers.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted).
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List all networks.
    List,
}

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List core sites, optionally for one network.
    List {
        /// Network id or name.
        #[arg(short = 'n', long)]
        network: Option<String>,
    },
    /// Create a core site under a network.
    Add {
        /// Display name for the site.
        name: String,
        /// Parent network id or name.
        #[arg(short = 'n', long)]
        network: String,
    },
    /// Delete a core site.
    Delete {
        /// Site id.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List core devices, optionally for one site.
    List {
        /// Core-site id or name.
        #[arg(short = 's', long)]
        site: Option<String>,
    },
    /// Create a core device at a site.
    Add {
        /// Device hostname.
        name: String,
        /// Parent core-site id or name.
        #[arg(short = 's', long)]
        site: String,
        /// Management IP address.
        #[arg(long)]
        ip: Option<std::net::IpAddr>,
    },
    /// Delete a core device.
    Delete {
        /// Device id.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List links, with optional filters.
    List {
        /// Only links belonging to this network (id or name).
        #[arg(short = 'n', long)]
        network: Option<String>,
        /// Only links touching this device id.
        #[arg(short = 'd', long)]
        device: Option<String>,
        /// Only links with this status (up/down/issue).
        #[arg(long)]
        status: Option<LinkStatus>,
        /// Only links of this kind (core-to-core/core-to-site).
        #[arg(long)]
        kind: Option<LinkKind>,
    },
}

#[derive(Debug, Args)]
pub struct EndsitesArgs {
    #[command(subcommand)]
    pub command: EndsitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EndsitesCommand {
    /// List end-sites grouped by site name.
    List {
        /// Only end-sites uplinked to this device id.
        #[arg(short = 'd', long)]
        device: Option<String>,
    },
    /// Show one end-site.
    Get {
        /// End-site id.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts, newest first.
    List {
        /// Only alerts of this severity (error/warning/info).
        #[arg(short = 's', long)]
        severity: Option<AlertSeverity>,
        /// Only favorited alerts.
        #[arg(short = 'f', long)]
        favorites: bool,
    },
    /// Toggle the favorite flag on one alert.
    Favorite {
        /// Alert id.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Network id or name (defaults to the first network).
    #[arg(short = 'n', long)]
    pub network: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the resolved configuration.
    Show,
    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}
