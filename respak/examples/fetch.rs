//! Fetches a single file from a RES archive by name and writes it to
//! stdout or a file, without loading the other payloads.
use clap::Parser;
use respak::fetch_file;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fetch")]
struct Cli {
    /// Archive to read from.
    pub archive: PathBuf,

    /// Entry name to fetch (case-sensitive).
    pub name: String,

    /// Write the payload here instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let data = fetch_file(&args.archive, &args.name)?;

    match args.output {
        Some(path) => std::fs::write(path, &data)?,
        None => std::io::stdout().write_all(&data)?,
    }

    Ok(())
}
