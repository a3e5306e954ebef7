use reverie::application::services::{NormalizeError, normalize_embedding};
use reverie::domain::Embedding;

#[test]
fn given_matching_dimension_when_normalizing_then_vector_passes_through() {
    let embedding = Embedding::new(vec![0.5; 1536]);

    let normalized = normalize_embedding(&embedding, 1536).unwrap();

    assert_eq!(normalized, embedding);
}

#[test]
fn given_shorter_divisor_dimension_when_normalizing_then_scaled_copies_fill_to_target() {
    let embedding = Embedding::new(vec![1.0, 2.0, 3.0, 4.0]);

    let normalized = normalize_embedding(&embedding, 16).unwrap();

    assert_eq!(normalized.dimensions(), 16);
    // Prefix invariant: the original vector is untouched at the front.
    assert_eq!(&normalized.values[..4], &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(&normalized.values[4..8], &[0.5, 1.0, 1.5, 2.0]);
    assert_eq!(&normalized.values[8..12], &[0.25, 0.5, 0.75, 1.0]);
    assert_eq!(&normalized.values[12..16], &[0.125, 0.25, 0.375, 0.5]);
}

#[test]
fn given_384_dimensions_when_normalizing_to_1536_then_prefix_is_unscaled_input() {
    let embedding = Embedding::new(vec![0.8; 384]);

    let normalized = normalize_embedding(&embedding, 1536).unwrap();

    assert_eq!(normalized.dimensions(), 1536);
    assert_eq!(&normalized.values[..384], embedding.values.as_slice());
    assert!((normalized.values[384] - 0.4).abs() < f32::EPSILON);
    assert!((normalized.values[768] - 0.2).abs() < f32::EPSILON);
    assert!((normalized.values[1152] - 0.1).abs() < f32::EPSILON);
}

#[test]
fn given_longer_dimension_when_normalizing_then_truncated_to_target() {
    let values: Vec<f32> = (0..2048).map(|i| i as f32).collect();
    let embedding = Embedding::new(values.clone());

    let normalized = normalize_embedding(&embedding, 1536).unwrap();

    assert_eq!(normalized.dimensions(), 1536);
    assert_eq!(normalized.values.as_slice(), &values[..1536]);
}

#[test]
fn given_non_divisor_dimension_when_normalizing_then_rejected() {
    let embedding = Embedding::new(vec![1.0; 500]);

    let result = normalize_embedding(&embedding, 1536);

    assert!(matches!(
        result,
        Err(NormalizeError::IncompatibleDimensions {
            source: 500,
            target: 1536,
        })
    ));
}

#[test]
fn given_empty_embedding_when_normalizing_then_rejected() {
    let embedding = Embedding::new(Vec::new());

    let result = normalize_embedding(&embedding, 1536);

    assert!(matches!(
        result,
        Err(NormalizeError::IncompatibleDimensions { source: 0, .. })
    ));
}
