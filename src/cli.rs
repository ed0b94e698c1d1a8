use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tablestat")]
#[command(about = "Per-table row activity rates for a MySQL schema, in monitoring plugin format")]
#[command(version)]
pub struct Cli {
    /// The host address of the MySQL server
    #[arg(short = 'H', long)]
    pub hostname: String,

    /// MySQL port (defaults to 3306 or the config file value)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// MySQL user
    #[arg(short = 'u', long)]
    pub username: String,

    /// MySQL password
    #[arg(short = 'p', long, env = "TABLESTAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// MySQL schema
    #[arg(short = 's', long)]
    pub schema: String,

    /// Directory holding the snapshot cache (defaults to the system temp dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Config file (defaults to <config dir>/tablestat/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output as JSON instead of plugin text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only errors on stderr
    #[arg(short = 'q', long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,
}
