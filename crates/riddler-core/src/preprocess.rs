/// Lower-cases, trims and collapses every whitespace run to one space.
///
/// Catalog riddles and recognized text both go through this before they are
/// compared, so the two sides always agree on spacing and case.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "What Has Keys But No Locks",
        "  what\thas\nkeys  but\r\nno   locks  ",
        "Clue: The more you TAKE, the more you leave behind",
        "ÉCOLE\u{00A0}Über  straße",
        "\u{2003}em\u{2003}space\u{2003}",
        "a",
    ];

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(
            normalize("  what\thas\nkeys  but\r\nno   locks  "),
            "what has keys but no locks"
        );
        assert_eq!(normalize("What Has Keys"), "what has keys");
        assert_eq!(normalize("ÉCOLE\u{00A0}Über"), "école über");
    }

    #[test]
    fn test_normalize_blank_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
