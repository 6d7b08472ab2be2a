use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::subscriber::{self, SetGlobalDefaultError};
use tracing::{info, warn, Level};

use glyph_mlp::config::{RunConfig, Settings};
use glyph_mlp::data::{append_sample, read_dataset, split_holdout, LabelMap, PixelGrid};
use glyph_mlp::{evaluate, train_loop, Model};

#[derive(Parser)]
#[command(version, about = "Train and run a glyph classifier on binary pixel grids")]
struct Cli {
    /// YAML run config; command-line flags override its values
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a fresh model from a dataset file and save it
    Train {
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(long, value_name = "INT")]
        epochs: Option<usize>,
        #[arg(long, value_name = "FLOAT")]
        lr: Option<f32>,
        #[arg(long, value_name = "INT")]
        hidden: Option<usize>,
        #[arg(long, value_name = "INT")]
        grid_side: Option<usize>,
        /// Trailing samples held out for evaluation
        #[arg(long, value_name = "INT")]
        holdout: Option<usize>,
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
    },
    /// Classify an image with a saved model
    Predict {
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,
    },
    /// Report accuracy of a saved model on a dataset file
    Evaluate {
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
    },
    /// Print the pixel grid an image reduces to
    Preview {
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,
        #[arg(long, value_name = "INT")]
        grid_side: Option<usize>,
    },
    /// Append an image as a labelled sample to a dataset file
    Record {
        #[arg(short, long, value_name = "PATH")]
        image: PathBuf,
        #[arg(short, long)]
        label: String,
        #[arg(short, long, value_name = "PATH")]
        data: PathBuf,
        #[arg(long, value_name = "INT")]
        grid_side: Option<usize>,
    },
    /// Write a saved model out as JSON
    ExportJson {
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let file_config = match &cli.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    match cli.command {
        Command::Train { data, model, epochs, lr, hidden, grid_side, holdout, seed } => {
            let overrides = RunConfig {
                grid_side,
                hidden_size: hidden,
                epochs,
                learning_rate: lr,
                holdout,
                seed,
                ..RunConfig::default()
            };
            run_train(&file_config.merge(overrides).resolve(), &data, &model)?;
        }
        Command::Predict { model, image } => {
            let settings = file_config.resolve();
            let model = Model::load(&model)?;
            let side = grid_side_of(&model)?;
            let grid = PixelGrid::load_image(&image, side)?;
            let labels = settings.labels.build();
            check_class_count(&model, labels.as_ref())?;
            let result = model.predict(&grid.to_input())?;
            let label = labels.label_of(result.predicted_index)
                .unwrap_or_else(|| format!("#{}", result.predicted_index));
            println!("{label} ({:.1}% confidence)", result.confidence * 100.0);
        }
        Command::Evaluate { model, data } => {
            let settings = file_config.resolve();
            let model = Model::load(&model)?;
            let side = grid_side_of(&model)?;
            let labels = settings.labels.build();
            check_class_count(&model, labels.as_ref())?;
            let parsed = read_dataset(&data, side, labels.as_ref())?;
            let eval = evaluate(&model, &parsed.samples)?;
            println!(
                "{}/{} correct ({:.1}%), {} lines skipped",
                eval.correct,
                eval.total,
                eval.accuracy() * 100.0,
                parsed.skipped
            );
        }
        Command::Preview { image, grid_side } => {
            let settings = file_config.merge(RunConfig { grid_side, ..RunConfig::default() }).resolve();
            let grid = PixelGrid::load_image(&image, settings.grid_side)?;
            print!("{}", grid.render());
        }
        Command::Record { image, label, data, grid_side } => {
            let settings = file_config.merge(RunConfig { grid_side, ..RunConfig::default() }).resolve();
            if settings.labels.build().index_of(&label).is_none() {
                warn!(%label, "label is outside the configured alphabet; training will skip it");
            }
            let grid = PixelGrid::load_image(&image, settings.grid_side)?;
            append_sample(&data, &label, &grid)?;
            info!(path = %data.display(), %label, "sample recorded");
        }
        Command::ExportJson { model, out } => {
            Model::load(&model)?.save_json(&out)?;
            info!(path = %out.display(), "model exported");
        }
    }
    Ok(())
}

fn run_train(settings: &Settings, data: &Path, model_path: &Path) -> Result<(), Box<dyn Error>> {
    let labels = settings.labels.build();
    let parsed = read_dataset(data, settings.grid_side, labels.as_ref())?;
    info!(samples = parsed.samples.len(), skipped = parsed.skipped, "dataset loaded");

    let (train_set, test_set) = split_holdout(parsed.samples, settings.holdout);

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut model = Model::new(settings.input_size(), settings.hidden_size, labels.class_count(), &mut rng)?;

    let outcome = train_loop(&mut model, &train_set, &settings.train_config())?;
    info!(epochs = outcome.epochs_completed, loss = ?outcome.last_loss, "training finished");

    if !test_set.is_empty() {
        let eval = evaluate(&model, &test_set)?;
        info!(correct = eval.correct, total = eval.total, accuracy = eval.accuracy(), "held-out evaluation");
    }

    model.save(model_path)?;
    info!(path = %model_path.display(), "model saved");
    Ok(())
}

/// Recovers the grid side from a model's input size.
fn grid_side_of(model: &Model) -> Result<usize, Box<dyn Error>> {
    let n = model.input_size();
    let side = (n as f64).sqrt().round() as usize;
    if side * side != n {
        return Err(format!("model input size {n} is not a square pixel grid").into());
    }
    Ok(side)
}

/// Fails when the configured label scheme does not fit the model's outputs.
fn check_class_count(model: &Model, labels: &dyn LabelMap) -> Result<(), glyph_mlp::Error> {
    if labels.class_count() != model.output_size() {
        return Err(glyph_mlp::Error::DimensionMismatch {
            what: "label classes",
            expected: model.output_size(),
            actual: labels.class_count(),
        });
    }
    Ok(())
}

fn init_logging(verbose: bool) -> Result<(), SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(subscriber)
}
