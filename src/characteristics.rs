/// Parsing of the free-text characteristics field into individual traits

/// Split a raw characteristics string into traits.
///
/// Runs of `,` and `;` separate entries. Each entry is trimmed and lowercased,
/// empty entries are dropped and input order is preserved.
pub fn parse_characteristics(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split([',', ';'])
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_and_semicolons() {
        let traits = parse_characteristics("Kind, FUNNY;adventurous");
        assert_eq!(traits, vec!["kind", "funny", "adventurous"]);
    }

    #[test]
    fn collapses_delimiter_runs_and_blanks() {
        let traits = parse_characteristics(" ,; generous ;;, ,  warm ,");
        assert_eq!(traits, vec!["generous", "warm"]);
    }

    #[test]
    fn blank_input_yields_no_traits() {
        assert!(parse_characteristics("").is_empty());
        assert!(parse_characteristics("   ").is_empty());
        assert!(parse_characteristics(",;,").is_empty());
    }

    #[test]
    fn keeps_multi_word_traits_intact() {
        let traits = parse_characteristics("Really Thoughtful, quick witted");
        assert_eq!(traits, vec!["really thoughtful", "quick witted"]);
    }
}
