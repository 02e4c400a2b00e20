/// Format a call duration as `mm:ss`
///
/// Minutes are not wrapped into hours; past 99 minutes the field widens.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Avatar initials: first letter of the first two words, upper-cased
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(9), "00:09");
        assert_eq!(format_duration(65), "01:05");
        assert_eq!(format_duration(3599), "59:59");
        assert_eq!(format_duration(3600), "60:00");
        assert_eq!(format_duration(6000), "100:00");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Jane Smith"), "JS");
        assert_eq!(initials("john ronald reuel tolkien"), "JR");
        assert_eq!(initials("Unknown"), "U");
        assert_eq!(initials("  "), "");
    }
}
