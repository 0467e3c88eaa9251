use std::cmp::Ordering;

/// Orders category names alphabetically the way Polish readers expect:
/// case-insensitive, each diacritic letter right after its base letter.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    let left_keys = left.chars().map(sort_key);
    let right_keys = right.chars().map(sort_key);
    left_keys.cmp(right_keys).then_with(|| left.cmp(right))
}

fn sort_key(ch: char) -> (char, u8) {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    match lower {
        'ą' => ('a', 1),
        'ć' => ('c', 1),
        'ę' => ('e', 1),
        'ł' => ('l', 1),
        'ń' => ('n', 1),
        'ó' => ('o', 1),
        'ś' => ('s', 1),
        'ź' => ('z', 1),
        'ż' => ('z', 2),
        other => (other, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| compare_names(a, b));
        names
    }

    #[test]
    fn diacritics_follow_base_letter() {
        assert_eq!(
            sorted(vec!["Źródła", "Zasilanie", "Łączniki", "Maszty", "Lampy"]),
            vec!["Lampy", "Łączniki", "Maszty", "Zasilanie", "Źródła"]
        );
    }

    #[test]
    fn base_name_precedes_its_accessory() {
        assert_eq!(
            sorted(vec!["Generator - wyposażenie", "Generatory", "Generator"]),
            vec!["Generator", "Generator - wyposażenie", "Generatory"]
        );
    }

    #[test]
    fn case_does_not_dominate() {
        assert_eq!(sorted(vec!["beton", "Agregat"]), vec!["Agregat", "beton"]);
    }
}
