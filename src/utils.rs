const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

/// Human readable size with decimal units and three significant digits,
/// e.g. `15_931_539_456` -> `"15.9 GB"`.
pub fn bytes_to_closest_unit(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut exponent = 0;
    let mut value = bytes as f64;
    while value >= 1000.0 && exponent < UNITS.len() - 1 {
        value /= 1000.0;
        exponent += 1;
    }
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let mut number = format!("{:.*}", decimals, value);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", number, UNITS[exponent])
}

/// Shortens `input` to at most `limit` characters by replacing its middle with `…`.
pub fn middle_ellipsis(input: &str, limit: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= limit {
        return input.to_string();
    }
    if limit < 3 {
        return chars[..limit].iter().collect();
    }
    let per_side = (limit - 1) / 2;
    let left: String = chars[..per_side].iter().collect();
    let right: String = chars[chars.len() - per_side..].iter().collect();
    format!("{}…{}", left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_sizes_in_bytes() {
        assert_eq!(bytes_to_closest_unit(0), "0 B");
        assert_eq!(bytes_to_closest_unit(999), "999 B");
    }

    #[test]
    fn formats_with_three_significant_digits() {
        assert_eq!(bytes_to_closest_unit(1536), "1.54 kB");
        assert_eq!(bytes_to_closest_unit(15_931_539_456), "15.9 GB");
        assert_eq!(bytes_to_closest_unit(16_000_000_000), "16 GB");
        assert_eq!(bytes_to_closest_unit(256_060_514_304), "256 GB");
        assert_eq!(bytes_to_closest_unit(2_000_000_000_000), "2 TB");
    }

    #[test]
    fn middle_ellipsis_keeps_short_input() {
        assert_eq!(middle_ellipsis("SanDisk", 14), "SanDisk");
    }

    #[test]
    fn middle_ellipsis_shortens_long_input() {
        let shortened = middle_ellipsis("Generic Mass Storage Device", 14);
        assert_eq!(shortened, "Generi…Device");
        assert!(shortened.chars().count() <= 14);
    }
}
