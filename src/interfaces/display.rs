use crate::domain::payment::Amount;
use rust_decimal::Decimal;

/// Display conventions for one currency.
#[derive(Debug, Clone, Copy)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Decimal places of the smallest unit (0 for rupiah, 2 for cents).
    pub minor_units: u32,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

pub const IDR: Currency = Currency {
    code: "IDR",
    symbol: "Rp",
    minor_units: 0,
    thousands_separator: '.',
    decimal_separator: ',',
};

pub const USD: Currency = Currency {
    code: "USD",
    symbol: "$",
    minor_units: 2,
    thousands_separator: ',',
    decimal_separator: '.',
};

/// Renders a smallest-unit amount for display, e.g. `Rp 50.000`.
///
/// Scaling goes through `Decimal`, so no precision is lost on the way
/// out; the core keeps integer amounts everywhere else.
pub fn format_amount(amount: Amount, currency: &Currency) -> String {
    let value = Decimal::new(amount.value(), currency.minor_units);
    let rendered = value.to_string();
    let (integral, fraction) = match rendered.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
    for (i, digit) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            grouped.push(currency.thousands_separator);
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!(
            "{} {}{}{}",
            currency.symbol, grouped, currency.decimal_separator, fraction
        ),
        None => format!("{} {}", currency.symbol, grouped),
    }
}
