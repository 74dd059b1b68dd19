use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress indicators
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Use this branch instead of the configured one
    #[arg(short, long, global = true)]
    pub branch: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set request headers
    #[arg(required = false, long, short = 'H', global = true)]
    pub header: Option<Vec<String>>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// List packages and pick one to download (default)
    Browse {
        /// Replace an existing file without asking
        #[arg(short, long)]
        yes: bool,

        /// Directory to save the download in
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the packages of the selected branch
    #[clap(name = "list", visible_alias = "ls")]
    List,

    /// Download a package by name
    #[command(arg_required_else_help = true)]
    #[clap(name = "download", visible_alias = "dl")]
    Download {
        /// Exact, case-sensitive package name
        #[arg(required = true)]
        package: String,

        /// Replace an existing file without asking
        #[arg(short, long)]
        yes: bool,

        /// Directory to save the download in
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the effective configuration
    Config,

    /// Generate the default configuration file
    #[clap(name = "defconfig")]
    DefConfig,
}
