use clap::Parser;
use resection::{error::Error, prelude::*, record::LandmarkRecord};
use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode};
use tracing::{error, info};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON array of `{ id, x, y, bearing }` landmark records.
    #[arg(long, required_unless_present = "print_options")]
    landmarks: Option<PathBuf>,

    /// Easting of the initial guess. Defaults to the landmark centroid.
    #[arg(long, requires = "guess_y", allow_hyphen_values = true)]
    guess_x: Option<f64>,

    /// Northing of the initial guess. Defaults to the landmark centroid.
    #[arg(long, requires = "guess_x", allow_hyphen_values = true)]
    guess_y: Option<f64>,

    /// Path to a JSON file with resection options.
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long)]
    max_iterations: Option<usize>,

    #[arg(long)]
    tolerance: Option<f64>,

    /// Print the effective options as JSON and exit.
    #[arg(long)]
    print_options: bool,
}

fn main() -> ExitCode {
    // Register an event subscriber that prints events to STDOUT.
    let subscriber = tracing_subscriber::FmtSubscriber::new();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to register tracing subscriber");
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut options: ResectionOptions = match &args.options {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => ResectionOptions::default(),
    };
    if let Some(max_iterations) = args.max_iterations {
        options = options.with_max_iterations(max_iterations);
    }
    if let Some(tolerance) = args.tolerance {
        options = options.with_tolerance(tolerance);
    }

    if args.print_options {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    let path = args
        .landmarks
        .ok_or_else(|| Error::InvalidInput("missing landmark file".into()))?;
    let records: Vec<LandmarkRecord> = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
    let landmarks = Landmarks::new(
        records
            .into_iter()
            .map(Landmark::try_from)
            .collect::<Result<_, _>>()?,
    )?;
    info!("read {} landmarks from {}", landmarks.len(), path.display());

    let guess = match (args.guess_x, args.guess_y) {
        (Some(x), Some(y)) => Point::from_meters(x, y),
        _ => landmarks.centroid(),
    };

    let result = resect(&landmarks, guess, &options)?;
    info!(
        iterations = result.iterations,
        converged = result.converged,
        circles = result.circles,
        "resection finished"
    );
    println!("{result}");

    Ok(())
}
