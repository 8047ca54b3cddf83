//! Input masks for Brazilian phone numbers and postal codes.

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn take_digits(value: &str, max: usize) -> String {
    digits_only(value).chars().take(max).collect()
}

/// `(xx) xxxxx-xxxx`, built progressively while typing.
pub fn mask_phone(value: &str) -> String {
    let digits = take_digits(value, 11);
    if digits.is_empty() {
        return digits;
    }
    // Digits are ASCII, so byte slicing is safe.
    let area = &digits[..digits.len().min(2)];
    let prefix = if digits.len() > 2 { &digits[2..digits.len().min(7)] } else { "" };
    let mut masked = format!("({}) {}", area, prefix);
    if digits.len() > 7 {
        masked.push('-');
        masked.push_str(&digits[7..]);
    }
    masked
}

/// `xxxxx-xxx`.
pub fn mask_cep(value: &str) -> String {
    let digits = take_digits(value, 8);
    if digits.len() > 5 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}
