//! Number formatting for LDraw output

/// Format a coordinate or matrix value the way it is written to LDraw files.
///
/// Uses the shortest decimal form that parses back to the same `f64`, without
/// exponent, and writes negative zero as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Join already formatted fields with single spaces
pub(crate) fn join_fields<I, T>(fields: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    fields
        .into_iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn test_format_number_round_trips() {
        for value in [1.0 / 3.0, 7.99361e-15, 123456.789, -0.000001] {
            let text = format_number(value);
            assert!(!text.contains('e'));
            assert_eq!(text.parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn test_join_fields() {
        assert_eq!(join_fields(["1", "2", "3"]), "1 2 3");
        assert_eq!(join_fields(Vec::<String>::new()), "");
    }
}
