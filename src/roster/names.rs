use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove diacritics: decompose to NFD and drop the combining marks.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Surname of a "Surname Firstname" display name: its first space-delimited
/// token, without quotes.
pub fn leading_surname(display_name: &str) -> String {
    display_name
        .split(' ')
        .next()
        .unwrap_or_default()
        .replace('"', "")
}

/// A name split by letter case: uppercase tokens are the surname, the rest
/// the first name ("MARTIN Jean Paul" -> "martin", "jean-paul").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSplitName {
    pub surname: String,
    pub first_name: String,
}

impl CaseSplitName {
    pub fn parse(name: &str) -> Self {
        let (upper, mixed): (Vec<&str>, Vec<&str>) = name
            .split_whitespace()
            .partition(|token| token.to_uppercase() == *token);
        CaseSplitName {
            surname: normalize_tokens(&upper),
            first_name: normalize_tokens(&mixed),
        }
    }

    /// File name of the prepared exam, `surname.firstname.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.{}.pdf", self.surname, self.first_name)
    }
}

fn normalize_tokens(tokens: &[&str]) -> String {
    let joined = tokens
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    strip_accents(&joined)
}
