//! Token and cost estimation for generation calls.

use serde::Serialize;

/// Pricing per million tokens (gemini-1.5-pro, USD).
const INPUT_PRICE_PER_MILLION: f64 = 1.25;
const OUTPUT_PRICE_PER_MILLION: f64 = 5.00;

/// Rough token estimate: one token per four characters.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

/// Estimated cost of one generation exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl CostEstimate {
    /// Estimate from the prompt and completion texts.
    pub fn for_exchange(prompt: &str, completion: &str) -> Self {
        let input_tokens = estimate_tokens(prompt);
        let output_tokens = estimate_tokens(completion);

        let input_cost = round6(input_tokens as f64 / 1_000_000.0 * INPUT_PRICE_PER_MILLION);
        let output_cost = round6(output_tokens as f64 / 1_000_000.0 * OUTPUT_PRICE_PER_MILLION);

        Self {
            input_tokens,
            output_tokens,
            input_cost,
            output_cost,
            total_cost: round6(input_cost + output_cost),
        }
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_cost_for_exchange() {
        let prompt = "x".repeat(4_000_000); // 1M input tokens
        let estimate = CostEstimate::for_exchange(&prompt, "");
        assert_eq!(estimate.input_tokens, 1_000_000);
        assert!((estimate.input_cost - 1.25).abs() < 1e-9);
        assert_eq!(estimate.output_tokens, 0);
        assert!((estimate.total_cost - 1.25).abs() < 1e-9);
    }
}
