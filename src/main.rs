// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;

use movenet_inference::cli::args::{Cli, Commands};
use movenet_inference::cli::predict::run_prediction;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Predict(args) => run_prediction(args),
    }
}
