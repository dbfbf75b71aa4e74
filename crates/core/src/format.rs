/// Ratio in `[0, 1]` as a percentage with one decimal (`0.16438` → `"16.4"`).
pub fn percent(ratio: f64) -> String {
    format!("{:.1}", ratio * 100.0)
}

/// Integer with en-US thousands separators (`4160` → `"4,160"`).
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Singular/plural noun for a count.
pub fn plural<'a>(count: i64, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_one_decimal() {
        assert_eq!(percent(60.0 / 365.0), "16.4");
        assert_eq!(percent(1.0), "100.0");
        assert_eq!(percent(0.0), "0.0");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(4160), "4,160");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-2500), "-2,500");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "day", "days"), "day");
        assert_eq!(plural(0, "day", "days"), "days");
        assert_eq!(plural(2, "day", "days"), "days");
    }
}
