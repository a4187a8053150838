use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use svprops::{output, vcf_parser::SvReader};

#[derive(Parser)]
#[command(name = "svprops")]
#[command(version)]
#[command(about = "Per-site statistics for structural-variant VCF/BCF files", long_about = None)]
struct Args {
    /// Input VCF/BCF file (can be gzipped)
    input: PathBuf,

    /// Report progress and a run summary on stderr
    #[arg(short, long)]
    verbose: bool,
}

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner} [{elapsed_precise}] {pos} {msg}") {
        pb.set_style(style);
    }
    pb
}

fn main() -> Result<()> {
    // Usage errors exit with status 1; --help and --version still exit cleanly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            err.print().ok();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };
    let quiet = !args.verbose;

    let mut reader = SvReader::from_path(&args.input)?;
    let header = reader.header().clone();

    progress!(quiet, "Input: {}", args.input.display());
    progress!(quiet, "Samples: {}", header.sample_count());

    let pb = make_spinner(quiet);
    pb.set_message("records processed");

    let stdout = io::stdout();
    let sink = BufWriter::new(stdout.lock());
    let summary = output::write_site_table(&header, reader.records(), sink, Some(&pb))?;
    pb.finish_and_clear();

    progress!(quiet, "Records: {}", summary.records);
    progress!(quiet, "Singleton sites: {}", summary.singletons);

    Ok(())
}
