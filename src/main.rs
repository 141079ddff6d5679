use anyhow::{bail, Context, Result};
use clap::Parser;

use sudoku_scan::cli::{AssembleArgs, Cli, Commands, ScanArgs};
use sudoku_scan::config::ScanConfig;
use sudoku_scan::ocr::TesseractOptions;
use sudoku_scan::scan::{ConsoleProgress, FileSink, GridSink, ScanPipeline, ScanReport, StdoutSink};
use sudoku_scan::ObservationSet;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Assemble(args) => run_assemble(args),
    }
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let config = ScanConfig::load_default().context("loading config")?;
    let options = TesseractOptions {
        binary: args.tesseract.unwrap_or(config.tesseract),
        psm: args.psm.unwrap_or(config.psm),
    };
    let pipeline = ScanPipeline::new(&options)?;

    if args.images.len() == 1 {
        let image = &args.images[0];
        let (grid, set) = pipeline
            .scan(image)
            .with_context(|| format!("scanning {}", image.display()))?;

        if let Some(path) = &args.dump_observations {
            set.save(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        if let Some(path) = &args.report {
            ScanReport::single(image, &grid, &set)
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        deliver(&grid.render(), args.output.as_deref())?;

        if args.verbose > 0 {
            eprintln!(
                "{}: {} observations, {} cells filled",
                image.display(),
                set.observations.len(),
                grid.filled_count()
            );
        }
        return Ok(());
    }

    if args.output.is_some() || args.dump_observations.is_some() {
        bail!("--output and --dump-observations apply to a single image; use --report for batches");
    }

    let progress = ConsoleProgress::new(args.images.len(), args.verbose > 0);
    let report = pipeline.scan_batch(&args.images, &progress);
    progress.finish();

    for entry in &report.entries {
        match (&entry.grid, &entry.error) {
            (Some(grid), _) => println!("# {}\n{}\n", entry.image.display(), grid),
            (None, Some(error)) => eprintln!("# {}: {}", entry.image.display(), error),
            (None, None) => {}
        }
    }

    if let Some(path) = &args.report {
        report
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if report.success_count() == 0 {
        bail!("no image produced a grid");
    }
    Ok(())
}

fn run_assemble(args: AssembleArgs) -> Result<()> {
    let set = ObservationSet::load(&args.observations)
        .with_context(|| format!("reading {}", args.observations.display()))?;
    let grid = sudoku_scan::reconstruct(&set)?;
    deliver(&grid.render(), args.output.as_deref())
}

fn deliver(grid: &str, output: Option<&std::path::Path>) -> Result<()> {
    let mut sink: Box<dyn GridSink> = match output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };
    sink.accept(grid)?;
    Ok(())
}
