//! Amount-in-words using the Indian numbering system.
//!
//! Above a thousand the integer part is grouped by lakh (10^5) and crore
//! (10^7) rather than by millions, so `1234567` reads
//! "Twelve Lakh Thirty Four Thousand Five Hundred and Sixty Seven".

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const THOUSAND: u64 = 1_000;
const LAKH: u64 = 100_000;
const CRORE: u64 = 10_000_000;

fn in_words(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let ones = n % 10;
        let mut s = TENS[(n / 10) as usize].to_string();
        if ones != 0 {
            s.push(' ');
            s.push_str(ONES[ones as usize]);
        }
        return s;
    }
    if n < THOUSAND {
        let rest = n % 100;
        let mut s = format!("{} Hundred", ONES[(n / 100) as usize]);
        if rest != 0 {
            s.push_str(" and ");
            s.push_str(&in_words(rest));
        }
        return s;
    }

    let (unit, name) = if n < LAKH {
        (THOUSAND, "Thousand")
    } else if n < CRORE {
        (LAKH, "Lakh")
    } else {
        (CRORE, "Crore")
    };

    let rest = n % unit;
    let mut s = format!("{} {}", in_words(n / unit), name);
    if rest != 0 {
        s.push(' ');
        s.push_str(&in_words(rest));
    }
    s
}

/// Spells out a rupee amount, e.g. `1500.0` → "One Thousand Five Hundred Rupees Only".
///
/// Paise are rounded to the nearest whole paisa; a fraction that rounds up to
/// 100 paise carries into the rupees. Negative and non-finite inputs are
/// treated as zero.
pub fn amount_to_words(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };

    let mut rupees = amount.trunc() as u64;
    let mut paise = ((amount - amount.trunc()) * 100.0).round() as u64;
    if paise >= 100 {
        rupees += 1;
        paise -= 100;
    }

    let mut words = String::new();
    if rupees > 0 {
        words.push_str(&in_words(rupees));
        words.push_str(" Rupees");
    }
    if paise > 0 {
        if !words.is_empty() {
            words.push_str(" and ");
        }
        words.push_str(&in_words(paise));
        words.push_str(" Paise");
    }
    if words.is_empty() {
        words.push_str("Zero Rupees");
    }
    words.push_str(" Only");
    words
}
