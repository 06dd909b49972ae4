use crate::{
    backend::InferenceBackend,
    config::ClassifierConfig,
    postprocessing::{Prediction, parse_prediction},
    preprocessing::PreProcessor,
};
use common::span;
use image::DynamicImage;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::time::Instant;

/// Preprocess, forward pass and argmax over one loaded model.
pub struct Classifier {
    backend: Box<dyn InferenceBackend>,
    preprocessor: PreProcessor,
    duration_histogram: Histogram<f64>,
    predictions_counter: Counter<u64>,
}

fn init_metrics(meter_name: &'static str) -> (Histogram<f64>, Counter<u64>) {
    let meter = global::meter(meter_name);
    let latency_buckets = [
        0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0,
    ];
    let duration_histogram: Histogram<f64> = meter
        .f64_histogram("prediction_duration_seconds")
        .with_description("Time to classify one image (preprocess + infer + postprocess)")
        .with_unit("s")
        .with_boundaries(latency_buckets.to_vec())
        .build();
    let predictions_counter: Counter<u64> = meter
        .u64_counter("predictions_total")
        .with_description("Total predictions served, by label")
        .build();

    (duration_histogram, predictions_counter)
}

impl Classifier {
    pub fn new(backend: impl InferenceBackend + 'static, config: &ClassifierConfig) -> Self {
        let (duration_histogram, predictions_counter) = init_metrics("classifier");

        Self {
            backend: Box::new(backend),
            preprocessor: PreProcessor::from_config(config),
            duration_histogram,
            predictions_counter,
        }
    }

    /// Classify one image. Any decodable image gets one of the fixed labels;
    /// there is no out-of-domain rejection.
    #[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn predict(&mut self, image: &DynamicImage) -> anyhow::Result<Prediction> {
        let started = Instant::now();

        let input = self.preprocessor.preprocess(image)?;

        let output = {
            let _s = span!("infer");
            self.backend.infer(&input)?
        };

        let prediction = {
            let _s = span!("postprocess");
            parse_prediction(&output.view())?
        };

        let elapsed = started.elapsed().as_secs_f64();
        self.duration_histogram.record(elapsed, &[]);
        self.predictions_counter
            .add(1, &[KeyValue::new("label", prediction.label)]);

        let fruit_class = prediction.fruit_class();
        tracing::debug!(
            label = prediction.label,
            fruit = fruit_class.map(|(fruit, _)| fruit.name()),
            ripeness = fruit_class.map(|(_, ripeness)| ripeness.name()),
            confidence = prediction.confidence,
            elapsed_ms = elapsed * 1000.0,
            "Image classified"
        );

        Ok(prediction)
    }
}
