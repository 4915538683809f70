//! Scenario calculator for the landing page.
//!
//! Rental income accrues linearly, resale value compounds yearly and the
//! annualised figure is a straight average over the holding period, not an
//! IRR. Non-finite inputs flow through the arithmetic unchanged.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Holding periods offered by the calculator, in years
pub const HOLDING_PERIOD_CHOICES: [u32; 4] = [3, 5, 7, 10];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInput {
    /// Purchase price (PLN in the UI)
    pub purchase_price: f64,
    /// Years held before resale
    pub holding_period: u32,
    /// Net yield in percent per year
    pub net_yield_low: f64,
    pub net_yield_high: f64,
    /// Appreciation in percent per year
    pub appreciation_low: f64,
    pub appreciation_high: f64,
}

impl Default for CalculatorInput {
    fn default() -> Self {
        Self {
            purchase_price: 500_000.0,
            holding_period: 5,
            net_yield_low: 6.0,
            net_yield_high: 9.0,
            appreciation_low: 7.0,
            appreciation_high: 10.0,
        }
    }
}

/// Which low/high pairs are given the wrong way round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvertedRanges {
    pub net_yield: bool,
    pub appreciation: bool,
}

impl CalculatorInput {
    /// Report pairs where the low bound exceeds the high bound.
    ///
    /// The calculation itself still runs on the pairs as given.
    pub fn inverted_ranges(&self) -> Option<InvertedRanges> {
        let ranges = InvertedRanges {
            net_yield: self.net_yield_low > self.net_yield_high,
            appreciation: self.appreciation_low > self.appreciation_high,
        };
        (ranges.net_yield || ranges.appreciation).then_some(ranges)
    }
}

/// Low and high bounds of the four projected quantities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResult {
    pub rental_income_low: f64,
    pub rental_income_high: f64,
    pub resale_value_low: f64,
    pub resale_value_high: f64,
    pub total_return_low: f64,
    pub total_return_high: f64,
    pub annualized_return_low: f64,
    pub annualized_return_high: f64,
}

/// One scenario's figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub rental_income: f64,
    pub resale_value: f64,
    pub total_return: f64,
    pub annualized_return: f64,
}

/// Project a single scenario.
///
/// A zero holding period yields no income, no growth and a zero
/// annualised return.
pub fn project(price: f64, years: u32, net_yield: f64, appreciation: f64) -> Scenario {
    let years_f = f64::from(years);

    let rental_income = price * (net_yield / 100.0) * years_f;
    let resale_value = price * (1.0 + appreciation / 100.0).powf(years_f);
    let total_return = rental_income + (resale_value - price);
    let annualized_return = if years == 0 {
        0.0
    } else {
        (total_return / price / years_f) * 100.0
    };

    Scenario {
        rental_income,
        resale_value,
        total_return,
        annualized_return,
    }
}

/// Compute the low and high scenario for the given input
pub fn calculate(input: &CalculatorInput) -> CalculatorResult {
    if let Some(inverted) = input.inverted_ranges() {
        warn!(
            net_yield = inverted.net_yield,
            appreciation = inverted.appreciation,
            "calculator input has low bound above high bound"
        );
    }

    let low = project(
        input.purchase_price,
        input.holding_period,
        input.net_yield_low,
        input.appreciation_low,
    );
    let high = project(
        input.purchase_price,
        input.holding_period,
        input.net_yield_high,
        input.appreciation_high,
    );

    CalculatorResult {
        rental_income_low: low.rental_income,
        rental_income_high: high.rental_income,
        resale_value_low: low.resale_value,
        resale_value_high: high.resale_value,
        total_return_low: low.total_return,
        total_return_high: high.total_return,
        annualized_return_low: low.annualized_return,
        annualized_return_high: high.annualized_return,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_default_scenario() {
        let result = calculate(&CalculatorInput::default());

        assert!(close(result.rental_income_low, 150_000.0));
        assert!(close(result.rental_income_high, 225_000.0));
        assert!(close(result.resale_value_high, 805_255.0));
        assert!(close(result.resale_value_low, 500_000.0 * 1.07_f64.powi(5)));
        assert!(close(
            result.total_return_high,
            225_000.0 + (result.resale_value_high - 500_000.0)
        ));
        assert!(close(
            result.annualized_return_high,
            result.total_return_high / 500_000.0 / 5.0 * 100.0
        ));
    }

    #[test]
    fn test_resale_compounds() {
        for years in HOLDING_PERIOD_CHOICES {
            for appreciation in [-3.0, 0.0, 4.5, 12.0] {
                let scenario = project(320_000.0, years, 5.0, appreciation);
                let expected = 320_000.0 * (1.0 + appreciation / 100.0).powf(f64::from(years));
                assert!(close(scenario.resale_value, expected));
            }
        }
    }

    #[test]
    fn test_rental_income_is_linear() {
        let base = project(400_000.0, 5, 7.0, 5.0);
        let doubled_price = project(800_000.0, 5, 7.0, 5.0);
        let doubled_years = project(400_000.0, 10, 7.0, 5.0);

        assert_eq!(doubled_price.rental_income, base.rental_income * 2.0);
        assert_eq!(doubled_years.rental_income, base.rental_income * 2.0);
    }

    #[test]
    fn test_low_never_exceeds_high() {
        for years in HOLDING_PERIOD_CHOICES {
            let input = CalculatorInput {
                purchase_price: 750_000.0,
                holding_period: years,
                net_yield_low: 4.0,
                net_yield_high: 8.0,
                appreciation_low: 2.0,
                appreciation_high: 9.0,
            };
            let result = calculate(&input);
            assert!(result.annualized_return_low <= result.annualized_return_high);
            assert!(input.inverted_ranges().is_none());
        }
    }

    #[test]
    fn test_inverted_ranges_are_reported_not_fixed() {
        let input = CalculatorInput {
            net_yield_low: 9.0,
            net_yield_high: 6.0,
            ..CalculatorInput::default()
        };

        assert_eq!(
            input.inverted_ranges(),
            Some(InvertedRanges {
                net_yield: true,
                appreciation: false
            })
        );
        let result = calculate(&input);
        assert!(result.rental_income_low > result.rental_income_high);
    }

    #[test]
    fn test_zero_holding_period() {
        let scenario = project(500_000.0, 0, 6.0, 7.0);
        assert_eq!(scenario.rental_income, 0.0);
        assert_eq!(scenario.resale_value, 500_000.0);
        assert_eq!(scenario.annualized_return, 0.0);
    }

    #[test]
    fn test_huge_holding_period_keeps_growing() {
        let scenario = project(100.0, u32::MAX, 0.0, 1.0);
        assert!(scenario.resale_value.is_infinite());
        assert!(scenario.resale_value > 0.0);
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let input = CalculatorInput {
            purchase_price: f64::NAN,
            ..CalculatorInput::default()
        };
        assert!(calculate(&input).total_return_low.is_nan());
    }
}
