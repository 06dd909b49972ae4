use crate::labels::{self, Fruit, NUM_CLASSES, Ripeness};
use ndarray::ArrayViewD;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: &'static str,
    pub index: usize,
    /// The model's own score for `label`, taken unmodified from `scores`.
    pub confidence: f32,
    pub scores: Vec<f32>,
}

impl Prediction {
    pub fn fruit_class(&self) -> Option<(Fruit, Ripeness)> {
        labels::parse_class(self.label)
    }

    /// Confidence as a percentage with two decimals, e.g. `"97.12%"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

/// Index and value of the highest score. Ties resolve to the lowest index;
/// non-finite scores never win over finite ones.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| score.is_finite())
        .fold(None, |best, (i, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((i, score)),
        })
}

/// Flatten a `[1, 15]` (or `[15]`) score tensor.
pub fn extract_scores(output: &ArrayViewD<f32>) -> anyhow::Result<Vec<f32>> {
    match output.shape() {
        [n] | [1, n] if *n == NUM_CLASSES => Ok(output.iter().copied().collect()),
        shape => anyhow::bail!(
            "Unexpected model output shape {:?}: expected [1, {}]",
            shape,
            NUM_CLASSES
        ),
    }
}

#[tracing::instrument(skip(output), level = "debug")]
pub fn parse_prediction(output: &ArrayViewD<f32>) -> anyhow::Result<Prediction> {
    let scores = extract_scores(output)?;

    let (index, confidence) = argmax(&scores)
        .ok_or_else(|| anyhow::anyhow!("Model produced no finite class scores"))?;

    let label = labels::class_name(index)
        .ok_or_else(|| anyhow::anyhow!("No label for class index {}", index))?;

    Ok(Prediction {
        label,
        index,
        confidence,
        scores,
    })
}
