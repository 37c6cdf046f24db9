//! Checkout pricing: shipping methods, pricing policy and order summaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::round_cents;

/// Shipping speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping",
            Self::Express => "Express Shipping",
            Self::Overnight => "Overnight Shipping",
        }
    }

    #[must_use]
    pub const fn delivery_estimate(&self) -> &'static str {
        match self {
            Self::Standard => "5-7 business days",
            Self::Express => "2-3 business days",
            Self::Overnight => "Next business day",
        }
    }

    /// Only standard shipping is waived above the free-shipping threshold.
    #[must_use]
    pub const fn free_over_threshold(&self) -> bool {
        matches!(self, Self::Standard)
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown shipping method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid shipping method: {0} (expected standard, express or overnight)")]
pub struct ParseShippingMethodError(String);

impl std::str::FromStr for ShippingMethod {
    type Err = ParseShippingMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "overnight" => Ok(Self::Overnight),
            _ => Err(ParseShippingMethodError(s.to_owned())),
        }
    }
}

/// Store-wide shipping and tax settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotal at or above which standard shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Sales tax as a fraction (0.08 = 8%).
    pub tax_rate: Decimal,
    pub standard_rate: Decimal,
    pub express_rate: Decimal,
    pub overnight_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(5000, 2),
            tax_rate: Decimal::new(8, 2),
            standard_rate: Decimal::new(999, 2),
            express_rate: Decimal::new(1999, 2),
            overnight_rate: Decimal::new(3999, 2),
        }
    }
}

impl PricingPolicy {
    /// Base price of a shipping method.
    #[must_use]
    pub const fn shipping_rate(&self, method: ShippingMethod) -> Decimal {
        match method {
            ShippingMethod::Standard => self.standard_rate,
            ShippingMethod::Express => self.express_rate,
            ShippingMethod::Overnight => self.overnight_rate,
        }
    }

    /// Shipping charged for `subtotal` with `method`.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal, method: ShippingMethod) -> Decimal {
        if method.free_over_threshold() && subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.shipping_rate(method)
        }
    }

    /// How much more must be added to qualify for free shipping, if anything.
    #[must_use]
    pub fn amount_to_free_shipping(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.free_shipping_threshold)
            .then(|| round_cents(self.free_shipping_threshold - subtotal))
    }
}

/// Totals shown at checkout and sent with the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the summary for an exact (unrounded) cart subtotal.
    ///
    /// Each component is rounded to cents once; the total is the sum of the
    /// rounded components so the displayed figures always add up.
    #[must_use]
    pub fn compute(subtotal: Decimal, method: ShippingMethod, policy: &PricingPolicy) -> Self {
        let shipping = round_cents(policy.shipping_for(subtotal, method));
        let tax = round_cents(subtotal.saturating_mul(policy.tax_rate));
        let subtotal = round_cents(subtotal);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
        }
    }
}

/// Delivery address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_standard_shipping_free_at_threshold() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(usd(4999), ShippingMethod::Standard), usd(999));
        assert_eq!(policy.shipping_for(usd(5000), ShippingMethod::Standard), Decimal::ZERO);
    }

    #[test]
    fn test_express_never_free() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(usd(20000), ShippingMethod::Express), usd(1999));
        assert_eq!(
            policy.shipping_for(usd(20000), ShippingMethod::Overnight),
            usd(3999)
        );
    }

    #[test]
    fn test_amount_to_free_shipping() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.amount_to_free_shipping(usd(4000)), Some(usd(1000)));
        assert_eq!(policy.amount_to_free_shipping(usd(5000)), None);
    }

    #[test]
    fn test_summary() {
        let summary =
            OrderSummary::compute(usd(1000), ShippingMethod::Standard, &PricingPolicy::default());
        assert_eq!(summary.subtotal, usd(1000));
        assert_eq!(summary.shipping, usd(999));
        assert_eq!(summary.tax, usd(80));
        assert_eq!(summary.total, usd(2079));
    }

    #[test]
    fn test_summary_rounds_tax_once() {
        // 33.335 * 0.08 = 2.6668 -> 2.67
        let summary = OrderSummary::compute(
            Decimal::new(33_335, 3),
            ShippingMethod::Express,
            &PricingPolicy::default(),
        );
        assert_eq!(summary.subtotal, usd(3334));
        assert_eq!(summary.tax, usd(267));
        assert_eq!(summary.total, usd(3334) + usd(1999) + usd(267));
    }

    #[test]
    fn test_summary_saturates_on_huge_subtotal() {
        let summary =
            OrderSummary::compute(Decimal::MAX, ShippingMethod::Express, &PricingPolicy::default());
        assert_eq!(summary.total, Decimal::MAX);
    }

    #[test]
    fn test_shipping_method_parse() {
        assert_eq!(
            "overnight".parse::<ShippingMethod>().unwrap(),
            ShippingMethod::Overnight
        );
        assert!("drone".parse::<ShippingMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&ShippingMethod::Express).unwrap(),
            "\"express\""
        );
    }
}
