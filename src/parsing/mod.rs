//! Parsers for spoken Slovak input
//!
//! Both parsers work on whitespace-separated tokens and compare words after
//! folding diacritics, so "mája" and "maja" or "veľké" and "velke" are the
//! same word. Neither parser fails: unrecognised input degrades to a
//! best-effort string.

pub mod date;
pub mod password;

pub use date::parse_spoken_date;
pub use password::parse_password_dictation;

/// Fold a Slovak (or Czech) letter with a diacritic to its base letter.
///
/// Characters outside the table are returned unchanged.
pub fn fold_char(c: char) -> char {
    match c {
        'á' | 'ä' => 'a',
        'Á' | 'Ä' => 'A',
        'č' => 'c',
        'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'é' | 'ě' => 'e',
        'É' | 'Ě' => 'E',
        'í' => 'i',
        'Í' => 'I',
        'ĺ' | 'ľ' => 'l',
        'Ĺ' | 'Ľ' => 'L',
        'ň' => 'n',
        'Ň' => 'N',
        'ó' | 'ô' | 'ö' => 'o',
        'Ó' | 'Ô' | 'Ö' => 'O',
        'ŕ' | 'ř' => 'r',
        'Ŕ' | 'Ř' => 'R',
        'š' => 's',
        'Š' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ú' | 'ů' | 'ü' => 'u',
        'Ú' | 'Ů' | 'Ü' => 'U',
        'ý' => 'y',
        'Ý' => 'Y',
        'ž' => 'z',
        'Ž' => 'Z',
        other => other,
    }
}

/// Reduce a token to its lookup form: folded, lowercase ASCII letters and digits only
pub fn clean_word(word: &str) -> String {
    word.chars()
        .map(fold_char)
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_char_slovak_letters() {
        let folded: String = "áäčďéíĺľňóôŕšťúýž".chars().map(fold_char).collect();
        assert_eq!(folded, "aacdeillnoorstuyz");
    }

    #[test]
    fn test_fold_char_keeps_case() {
        assert_eq!(fold_char('Ľ'), 'L');
        assert_eq!(fold_char('q'), 'q');
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Mája,"), "maja");
        assert_eq!(clean_word("veľké"), "velke");
        assert_eq!(clean_word("12."), "12");
        assert_eq!(clean_word("--"), "");
    }
}
