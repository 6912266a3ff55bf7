// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

use crate::inference::DEFAULT_MIN_CONFIDENCE;
use crate::task::Task;

/// Model used when `--model` is not given.
pub const DEFAULT_MODEL: &str = "movenet-lightning.onnx";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Predict Options:
    --model, -m <MODEL>    Path to MoveNet ONNX model [default: movenet-lightning.onnx]
    --source, -s <SOURCE>  Input image
    --task <TASK>          Model variant (single, multi) [default: from output shape]
    --conf <CONF>          Minimum person score for multi-pose models [default: 0.2]
    --imgsz <IMGSZ>        Inference image size [default: from model, else 256]
    --threads <THREADS>    ONNX Runtime intra-op threads [default: 0 = runtime default]
    --output, -o <DIR>     Directory for annotated images [default: outputs]
    --save <BOOL>          Save the annotated image [default: true]
    --json                 Print results as JSON
    --verbose <BOOL>       Show verbose output [default: true]

Examples:
    movenet-inference predict --model movenet-lightning.onnx --source person.jpg
    movenet-inference predict -m movenet-multipose.onnx -s crowd.jpg --conf 0.3
    movenet-inference predict -m movenet-thunder.onnx -s person.jpg --json --save false"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pose estimation on an image
    Predict(PredictArgs),
}

/// Arguments for the predict command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to MoveNet ONNX model file
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Input image
    #[arg(short, long)]
    pub source: Option<String>,

    /// Model variant (single, multi); inferred from the output shape if omitted
    #[arg(long)]
    pub task: Option<Task>,

    /// Minimum person score for multi-pose models
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    pub conf: f32,

    /// Inference image size
    #[arg(long)]
    pub imgsz: Option<usize>,

    /// ONNX Runtime intra-op threads (0 = runtime default)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Directory for annotated images
    #[arg(short, long, default_value = "outputs")]
    pub output: String,

    /// Save the annotated image
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub save: bool,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_args_defaults() {
        let args = Cli::parse_from(["app", "predict"]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model, DEFAULT_MODEL);
                assert!((predict_args.conf - 0.2).abs() < f32::EPSILON);
                assert!(predict_args.task.is_none());
                assert!(predict_args.imgsz.is_none());
                assert_eq!(predict_args.threads, 0);
                assert_eq!(predict_args.output, "outputs");
                assert!(predict_args.save);
                assert!(!predict_args.json);
                assert!(predict_args.verbose);
                assert!(predict_args.source.is_none());
            }
        }
    }

    #[test]
    fn test_predict_args_custom() {
        let args = Cli::parse_from([
            "app",
            "predict",
            "--model",
            "movenet-multipose.onnx",
            "--source",
            "crowd.jpg",
            "--task",
            "multi",
            "--conf",
            "0.35",
            "--imgsz",
            "320",
            "--save",
            "false",
            "--json",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model, "movenet-multipose.onnx");
                assert_eq!(predict_args.source, Some("crowd.jpg".to_string()));
                assert_eq!(predict_args.task, Some(Task::MultiPose));
                assert!((predict_args.conf - 0.35).abs() < f32::EPSILON);
                assert_eq!(predict_args.imgsz, Some(320));
                assert!(!predict_args.save);
                assert!(predict_args.json);
                assert!(!predict_args.verbose);
            }
        }
    }

    #[test]
    fn test_invalid_task_rejected() {
        let args = Cli::try_parse_from(["app", "predict", "--task", "detect"]);
        assert!(args.is_err());
    }
}
