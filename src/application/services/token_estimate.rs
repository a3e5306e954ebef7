/// Rough token estimate for usage records: ~4 characters per token.
/// Good enough for trend-level cost tracking, never used for billing.
pub fn estimate_tokens(text: &str) -> u32 {
    ((text.chars().count() + 3) / 4).max(1) as u32
}

/// Per-model $ estimate per million tokens, from published vendor pricing.
pub fn estimate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
    let (input_price, output_price) = if model.contains("gpt-4o") && !model.contains("mini") {
        (2.5, 10.0)
    } else if model.contains("gpt-4o-mini") {
        (0.15, 0.6)
    } else if model.contains("8b") {
        (0.05, 0.08)
    } else if model.contains("mixtral") {
        (0.24, 0.24)
    } else {
        // llama-3.1-70b-versatile and anything unrecognized
        (0.59, 0.79)
    };

    (input_tokens as f64 / 1_000_000.0) * input_price
        + (output_tokens as f64 / 1_000_000.0) * output_price
}
