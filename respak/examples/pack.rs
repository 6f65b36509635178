//! Packs the files listed in a manifest into a RES archive.
use clap::Parser;
use respak::build;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pack")]
struct Cli {
    /// Manifest listing one filename per line.
    #[clap(long)]
    pub manifest: PathBuf,

    /// Directory the manifest's filenames are resolved against.
    #[clap(long, default_value = ".")]
    pub base: PathBuf,

    /// Archive file to write.
    #[clap(long)]
    pub output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    let (archive, errors) = build(&args.manifest, &args.base)?;
    if errors > 0 {
        eprintln!("{errors} file(s) could not be read and were kept as empty slots");
    }

    let written = archive.save(&args.output)?;
    println!(
        "{}: {} entries, {written} bytes",
        args.output.display(),
        archive.len(),
    );

    Ok(())
}
