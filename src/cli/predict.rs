// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::Path;
use std::process;

#[cfg(feature = "annotate")]
use crate::annotate::save_annotated;

use crate::cli::args::PredictArgs;
use crate::cli::logging::{format_ms, set_verbose};
use crate::results::{Person, Results};
use crate::{InferenceConfig, PoseModel, VERSION};
use crate::{error, info, section, verbose, warn};

/// Run MoveNet pose estimation on a single image.
pub fn run_prediction(args: &PredictArgs) {
    set_verbose(args.verbose);

    let Some(source) = args.source.as_deref().filter(|s| Path::new(s).is_file()) else {
        error!("Specify a valid image file");
        process::exit(1);
    };

    let mut config = InferenceConfig::new()
        .with_min_confidence(args.conf)
        .with_threads(args.threads);
    if let Some(sz) = args.imgsz {
        config = config.with_imgsz(sz);
    }
    if let Some(task) = args.task {
        config = config.with_task(task);
    }

    let mut model = match PoseModel::load_with_config(&args.model, config) {
        Ok(m) => m,
        Err(e) => {
            error!("Error loading model: {e}");
            process::exit(1);
        }
    };

    verbose!("MoveNet Inference {VERSION} 🚀 Rust ONNX CPU");
    verbose!(
        "Loaded model: {} input={} {:?} [1, {size}, {size}, 3] output={} task={}",
        args.model,
        model.input_name(),
        model.input_type(),
        model.output_name(),
        model.task().map_or("auto", |t| t.as_str()),
        size = model.input_size(),
    );

    let image = match image::open(source) {
        Ok(img) => img,
        Err(e) => {
            error!("Failed to load image {source}: {e}");
            process::exit(1);
        }
    };

    let result = match model.predict_image(&image, source.to_string()) {
        Ok(r) => r,
        Err(e) => {
            error!("Inference failed: {e}");
            process::exit(1);
        }
    };

    report(&result);

    if args.json {
        match result.to_json() {
            Ok(json) => info!("{json}"),
            Err(e) => error!("{e}"),
        }
    }

    #[cfg(feature = "annotate")]
    if args.save {
        match save_annotated(&image, &result, Path::new(&args.output)) {
            Ok(path) => verbose!("Created output image: {}", path.display()),
            Err(e) => {
                error!("Failed to save output image: {e}");
                process::exit(1);
            }
        }
    }

    #[cfg(not(feature = "annotate"))]
    if args.save {
        warn!(
            "--save requires the 'annotate' feature. Compile with --features annotate to enable saving."
        );
    }

    if result.is_empty() {
        warn!("No person found in {source}");
    }
}

/// Print shapes, timings and one line per person.
fn report(result: &Results) {
    let (orig_h, orig_w) = result.orig_shape;
    let (in_h, in_w) = result.input_shape;
    verbose!(
        "image {}: {orig_w}x{orig_h} -> {in_w}x{in_h} {} ({})",
        result.path,
        result.verbose(),
        result.task
    );
    verbose!("Inference time: {}", format_ms(result.speed.inference.unwrap_or(0.0)));
    verbose!(
        "Processing time: {}",
        format_ms(result.speed.preprocess.unwrap_or(0.0) + result.speed.postprocess.unwrap_or(0.0))
    );

    if !result.is_empty() {
        section!("Persons");
    }
    for person in &result.persons {
        verbose!("{}", format_person_summary(person));
    }
}

/// Format one person like `"person 3: score 0.81, box [12, 40, 96, 210], 17 parts"`.
fn format_person_summary(person: &Person) -> String {
    let bbox = person.bbox.map_or_else(String::new, |[x, y, w, h]| {
        format!(", box [{x}, {y}, {w}, {h}]")
    });
    format!(
        "person {}: score {:.2}{bbox}, {} parts",
        person.id,
        person.score,
        person.parts.len()
    )
}
