//! Lists the FAT of a RES archive.
use clap::Parser;
use respak::Archive;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "list")]
struct Cli {
    /// Archive to inspect.
    pub archive: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let archive = Archive::load(&args.archive)?;
    println!(
        "{}: {} entries, {} bytes",
        args.archive.display(),
        archive.len(),
        archive.total_size(),
    );

    for (i, entry) in archive.entries().iter().enumerate() {
        let note = if entry.length == 0 { "  (placeholder)" } else { "" };
        println!(
            "{i:4}  {:<15}  {:>10} bytes at {:#010x}{note}",
            entry.name(),
            entry.length,
            entry.offset,
        );
    }

    Ok(())
}
