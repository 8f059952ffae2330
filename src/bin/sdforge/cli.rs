use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "sdforge",
    about = "Convert MOL2 molecules into an MDL SD file",
    version,
    author
)]
pub struct Cli {
    /// Input MOL2 file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output SD file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Writer settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Export only these properties, in this order
    #[arg(long, value_name = "NAME", value_delimiter = ',', num_args = 1..)]
    pub props: Option<Vec<String>>,

    /// Keep aromatic bonds instead of writing a Kekulé structure
    #[arg(long)]
    pub no_kekulize: bool,

    /// Always write V3000 connection tables
    #[arg(long)]
    pub v3000: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and log output (for scripting)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
