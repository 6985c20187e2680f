//! Amounts in English words, for the "Total Amount (in words)" line.
//!
//! Short scale, three-digit groups, no "and":
//! `1234` → `One Thousand Two Hundred Thirty Four`.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 4] = ["", "Thousand", "Million", "Billion"];

/// First value the scale table cannot name.
pub const WORDS_LIMIT: u64 = 1_000_000_000_000;

/// Renders a whole number in words.
///
/// ## Errors
/// `InvalidInput` for `n >= 10^12`, past "Billion".
///
/// ## Example
/// ```rust
/// use stockbill_core::words::to_words;
///
/// assert_eq!(to_words(0).unwrap(), "Zero");
/// assert_eq!(to_words(1_000_000).unwrap(), "One Million");
/// ```
pub fn to_words(n: u64) -> CoreResult<String> {
    if n == 0 {
        return Ok("Zero".to_string());
    }
    if n >= WORDS_LIMIT {
        return Err(CoreError::invalid_input(format!(
            "{} is too large to write in words",
            n
        )));
    }

    let mut groups = Vec::new();
    let mut rest = n;
    for scale in SCALES {
        let chunk = (rest % 1000) as usize;
        if chunk != 0 {
            let mut words = chunk_words(chunk);
            if !scale.is_empty() {
                words.push(scale);
            }
            groups.push(words.join(" "));
        }
        rest /= 1000;
    }

    groups.reverse();
    Ok(groups.join(" "))
}

/// `"X Rupees"` for a money amount rounded to whole rupees.
///
/// Negative amounts are rejected the same way as oversized ones.
pub fn amount_in_words(amount: Money) -> CoreResult<String> {
    let rupees = u64::try_from(amount.round_to_rupees())
        .map_err(|_| CoreError::invalid_input("amount must not be negative"))?;
    Ok(format!("{} Rupees", to_words(rupees)?))
}

fn chunk_words(chunk: usize) -> Vec<&'static str> {
    let mut words = Vec::with_capacity(3);
    let hundreds = chunk / 100;
    let below_hundred = chunk % 100;

    if hundreds > 0 {
        words.push(ONES[hundreds]);
        words.push("Hundred");
    }
    match below_hundred {
        0 => {}
        1..=9 => words.push(ONES[below_hundred]),
        10..=19 => words.push(TEENS[below_hundred - 10]),
        _ => {
            words.push(TENS[below_hundred / 10]);
            if below_hundred % 10 != 0 {
                words.push(ONES[below_hundred % 10]);
            }
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(to_words(0).unwrap(), "Zero");
        assert_eq!(to_words(7).unwrap(), "Seven");
        assert_eq!(to_words(13).unwrap(), "Thirteen");
        assert_eq!(to_words(40).unwrap(), "Forty");
        assert_eq!(to_words(99).unwrap(), "Ninety Nine");
        assert_eq!(to_words(100).unwrap(), "One Hundred");
        assert_eq!(to_words(118).unwrap(), "One Hundred Eighteen");
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(
            to_words(1234).unwrap(),
            "One Thousand Two Hundred Thirty Four"
        );
        assert_eq!(to_words(1_000_000).unwrap(), "One Million");
        assert_eq!(to_words(1_000_001).unwrap(), "One Million One");
        assert_eq!(
            to_words(4_130_000).unwrap(),
            "Four Million One Hundred Thirty Thousand"
        );
        assert_eq!(
            to_words(999_999_999_999).unwrap(),
            "Nine Hundred Ninety Nine Billion Nine Hundred Ninety Nine Million \
             Nine Hundred Ninety Nine Thousand Nine Hundred Ninety Nine"
        );
    }

    #[test]
    fn test_scale_overflow() {
        assert!(matches!(
            to_words(WORDS_LIMIT),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_amount_in_words_rounds() {
        assert_eq!(
            amount_in_words(Money::from_paise(11800)).unwrap(),
            "One Hundred Eighteen Rupees"
        );
        assert_eq!(
            amount_in_words(Money::from_paise(11750)).unwrap(),
            "One Hundred Eighteen Rupees"
        );
        assert_eq!(amount_in_words(Money::from_paise(40)).unwrap(), "Zero Rupees");
        assert!(amount_in_words(Money::from_paise(-100)).is_err());
    }
}
