//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are in the currency's standard unit (rand, not cents). Formatting
//! follows the storefront's display convention: currency symbol, thousands
//! separated by commas, two decimal places (e.g. `R1,234.56`).

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rand, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(self.amount, self.currency_code))
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ZAR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ZAR => "R",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ZAR => "ZAR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZAR" => Ok(Self::ZAR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// Format an amount as a display string, e.g. `R1,234.56`.
///
/// Amounts are rounded half away from zero to two decimal places.
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{}.{cents}",
        currency.symbol(),
        group_thousands(whole)
    )
}

/// Insert a comma between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Discount percentage between an original and a sale price, rounded to a
/// whole percent.
///
/// Returns `None` when the original price is not positive.
#[must_use]
pub fn calculate_discount(original_price: Decimal, sale_price: Decimal) -> Option<Decimal> {
    if original_price <= Decimal::ZERO {
        return None;
    }
    let ratio = (original_price - sale_price) / original_price * Decimal::ONE_HUNDRED;
    Some(ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Amount saved by buying at the sale price.
#[must_use]
pub fn calculate_savings(original_price: Decimal, sale_price: Decimal) -> Decimal {
    original_price - sale_price
}

/// Pricing attributes of a sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_tag: Option<String>,
}

impl PricedItem {
    /// A regular-priced item.
    #[must_use]
    pub const fn regular(price: Decimal) -> Self {
        Self {
            price,
            original_price: None,
            discount: None,
            on_sale: false,
            sale_tag: None,
        }
    }

    /// True when flagged on sale and the original price exceeds the current price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.on_sale && self.original_price.is_some_and(|original| original > self.price)
    }

    /// Badge text for on-sale items: the sale tag, else `NN% OFF`, else `SALE`.
    #[must_use]
    pub fn sale_badge(&self) -> Option<String> {
        if !self.is_on_sale() {
            return None;
        }
        if let Some(tag) = &self.sale_tag {
            return Some(tag.clone());
        }
        if let Some(discount) = self.discount {
            return Some(format!("{discount}% OFF"));
        }
        Some("SALE".to_owned())
    }

    /// Savings per unit, zero when not on sale.
    #[must_use]
    pub fn unit_savings(&self) -> Decimal {
        match self.original_price {
            Some(original) if self.on_sale => calculate_savings(original, self.price),
            _ => Decimal::ZERO,
        }
    }
}

/// Fully formatted price information for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    pub current_price: String,
    pub original_price: Option<String>,
    pub discount: Decimal,
    pub savings: Option<String>,
    pub on_sale: bool,
    pub sale_tag: Option<String>,
    pub currency: CurrencyCode,
}

impl PriceDisplay {
    /// Build the display for an item.
    ///
    /// An explicit discount on the item wins over the computed one; a missing
    /// sale tag defaults to `SALE`.
    #[must_use]
    pub fn for_item(item: &PricedItem, currency: CurrencyCode) -> Self {
        let current_price = format_price(item.price, currency);

        match item.original_price {
            Some(original) if item.on_sale => {
                let discount = item
                    .discount
                    .or_else(|| calculate_discount(original, item.price))
                    .unwrap_or(Decimal::ZERO);
                Self {
                    current_price,
                    original_price: Some(format_price(original, currency)),
                    discount,
                    savings: Some(format_price(calculate_savings(original, item.price), currency)),
                    on_sale: true,
                    sale_tag: Some(item.sale_tag.clone().unwrap_or_else(|| "SALE".to_owned())),
                    currency,
                }
            }
            _ => Self {
                current_price,
                original_price: None,
                discount: Decimal::ZERO,
                savings: None,
                on_sale: false,
                sale_tag: None,
                currency,
            },
        }
    }
}

/// Formatted price range across items, e.g. `R649.99 - R2,299.99`.
///
/// Returns `None` for an empty set and a single price when all items cost the same.
#[must_use]
pub fn price_range<'a, I>(items: I, currency: CurrencyCode) -> Option<String>
where
    I: IntoIterator<Item = &'a PricedItem>,
{
    let mut prices = items.into_iter().map(|item| item.price);
    let first = prices.next()?;
    let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

    if min == max {
        Some(format_price(min, currency))
    } else {
        Some(format!(
            "{} - {}",
            format_price(min, currency),
            format_price(max, currency)
        ))
    }
}

/// A labelled price filter band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    pub label: &'static str,
    pub min: Decimal,
    /// Exclusive upper bound; `None` for the open-ended top band.
    pub max: Option<Decimal>,
}

impl PriceBand {
    /// True when `price` falls within this band.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }
}

/// Price filter bands for the South African storefront.
pub const ZAR_PRICE_BANDS: [PriceBand; 5] = [
    PriceBand {
        label: "Under R500",
        min: Decimal::ZERO,
        max: Some(Decimal::from_parts(500, 0, 0, false, 0)),
    },
    PriceBand {
        label: "R500 - R1,000",
        min: Decimal::from_parts(500, 0, 0, false, 0),
        max: Some(Decimal::from_parts(1000, 0, 0, false, 0)),
    },
    PriceBand {
        label: "R1,000 - R1,500",
        min: Decimal::from_parts(1000, 0, 0, false, 0),
        max: Some(Decimal::from_parts(1500, 0, 0, false, 0)),
    },
    PriceBand {
        label: "R1,500 - R2,000",
        min: Decimal::from_parts(1500, 0, 0, false, 0),
        max: Some(Decimal::from_parts(2000, 0, 0, false, 0)),
    },
    PriceBand {
        label: "Over R2,000",
        min: Decimal::from_parts(2000, 0, 0, false, 0),
        max: None,
    },
];

/// Aggregate totals for a set of priced items and quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub total_savings: Decimal,
    pub item_count: u32,
}

impl CartTotals {
    /// Sum price, savings and quantity over `(item, quantity)` pairs.
    #[must_use]
    pub fn calculate<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (&'a PricedItem, u32)>,
    {
        items
            .into_iter()
            .fold(Self::default(), |mut totals, (item, quantity)| {
                let qty = Decimal::from(quantity);
                totals.subtotal += item.price * qty;
                totals.total_savings += item.unit_savings() * qty;
                totals.item_count = totals.item_count.saturating_add(quantity);
                totals
            })
    }

    /// Formatted subtotal.
    #[must_use]
    pub fn subtotal_display(&self, currency: CurrencyCode) -> String {
        format_price(self.subtotal, currency)
    }

    /// Formatted savings.
    #[must_use]
    pub fn savings_display(&self, currency: CurrencyCode) -> String {
        format_price(self.total_savings, currency)
    }
}
