use std::fmt;

use crate::domain::Embedding;

#[derive(Debug)]
pub enum NormalizeError {
    IncompatibleDimensions { source: usize, target: usize },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::IncompatibleDimensions { source, target } => write!(
                f,
                "cannot reconcile a {source}-dimensional embedding with a {target}-dimensional index"
            ),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Reconcile a provider vector with the dimensionality the vector index is
/// provisioned for.
///
/// A matching vector passes through untouched and a longer one is
/// truncated to the first `target` components. A shorter one is expanded
/// only when its length divides `target` evenly: the output concatenates
/// copies of the input scaled by 1, 0.5, 0.25, ... so every component
/// still carries signal (384 -> 1536 takes four copies, 768 -> 1536 two).
/// Any other dimension gap is rejected outright; writing a vector that is
/// mostly ad hoc fill would poison later similarity searches.
pub fn normalize_embedding(
    embedding: &Embedding,
    target: usize,
) -> Result<Embedding, NormalizeError> {
    let source = embedding.dimensions();

    if source == target {
        return Ok(embedding.clone());
    }

    if source > target {
        return Ok(Embedding::new(embedding.values[..target].to_vec()));
    }

    if source == 0 || target % source != 0 {
        return Err(NormalizeError::IncompatibleDimensions { source, target });
    }

    let copies = target / source;
    let mut values = Vec::with_capacity(target);
    let mut scale = 1.0f32;
    for _ in 0..copies {
        values.extend(embedding.values.iter().map(|v| v * scale));
        scale *= 0.5;
    }

    Ok(Embedding::new(values))
}
