/// Group a plain national number as `(AAA) BBB-CCCC` while it is typed
///
/// Only runs of up to ten ASCII digits are grouped. Anything longer, or
/// anything containing `*`, `#` or `+`, is returned unchanged.
pub fn format_for_display(digits: &str) -> String {
    if digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }

    let area = &digits[..digits.len().min(3)];
    let exchange = &digits[area.len()..digits.len().min(6)];
    let subscriber = &digits[area.len() + exchange.len()..];

    match (area.len(), exchange.is_empty(), subscriber.is_empty()) {
        (3, false, false) => format!("({}) {}-{}", area, exchange, subscriber),
        (3, false, true) => format!("({}) {}", area, exchange),
        (3, true, _) => format!("({})", area),
        _ => area.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progressive_grouping() {
        assert_eq!(format_for_display(""), "");
        assert_eq!(format_for_display("1"), "1");
        assert_eq!(format_for_display("12"), "12");
        assert_eq!(format_for_display("123"), "(123)");
        assert_eq!(format_for_display("1234"), "(123) 4");
        assert_eq!(format_for_display("123456"), "(123) 456");
        assert_eq!(format_for_display("1234567"), "(123) 456-7");
        assert_eq!(format_for_display("1234567890"), "(123) 456-7890");
    }

    #[test]
    fn test_passthrough_for_long_numbers() {
        assert_eq!(format_for_display("12345678901"), "12345678901");
        assert_eq!(format_for_display("442071234567890"), "442071234567890");
    }

    #[test]
    fn test_passthrough_for_symbols() {
        assert_eq!(format_for_display("+1555"), "+1555");
        assert_eq!(format_for_display("*21#"), "*21#");
        assert_eq!(format_for_display("555#"), "555#");
    }

    #[test]
    fn test_formatting_is_stable_for_same_input() {
        for raw in ["", "9", "555", "5551234", "5551234567", "+44", "1234567890123"] {
            assert_eq!(format_for_display(raw), format_for_display(raw));
        }
    }
}
