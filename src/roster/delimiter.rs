use crate::error::ConfigError;

/// Number of leading bytes inspected when guessing the delimiter.
pub const SAMPLE_SIZE: usize = 2048;

const CANDIDATES: [u8; 2] = [b',', b';'];

/// Parse a user-supplied delimiter such as `";"` or `"\t"`.
pub fn parse_delimiter(s: &str) -> Result<u8, ConfigError> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(ConfigError::InvalidDelimiter(s.to_string())),
    }
}

/// Guess whether the roster uses commas or semicolons from its leading bytes.
pub fn sniff_delimiter(text: &str) -> Result<u8, ConfigError> {
    let mut end = text.len().min(SAMPLE_SIZE);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut sample = &text[..end];
    if end < text.len() {
        // Drop the line the sample cut in half
        if let Some(pos) = sample.rfind('\n') {
            sample = &sample[..pos];
        }
    }

    let lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let header = lines.first().ok_or(ConfigError::AmbiguousDelimiter)?;

    let counts: Vec<Vec<usize>> = CANDIDATES
        .iter()
        .map(|&c| lines.iter().map(|line| count_unquoted(line, c)).collect())
        .collect();
    let consistent: Vec<bool> = counts
        .iter()
        .map(|per_line| per_line[0] > 0 && per_line.iter().all(|&n| n == per_line[0]))
        .collect();

    match (consistent[0], consistent[1]) {
        (true, false) => Ok(CANDIDATES[0]),
        (false, true) => Ok(CANDIDATES[1]),
        _ => {
            let comma = count_unquoted(header, b',');
            let semicolon = count_unquoted(header, b';');
            let both = consistent[0] && consistent[1];
            match (comma, semicolon) {
                (c, s) if c > s && (both || s == 0) => Ok(b','),
                (c, s) if s > c && (both || c == 0) => Ok(b';'),
                _ => Err(ConfigError::AmbiguousDelimiter),
            }
        }
    }
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_comma() {
        let text = "Full name,Identifier,Email\nJean MARTIN,Participant 12,a@b.c\n";
        assert_eq!(sniff_delimiter(text).unwrap(), b',');
    }

    #[test]
    fn test_sniff_semicolon() {
        let text = "Nom complet;Identifiant\nMARTIN Jean;Participant 12\nDURAND Luc;Participant 13\n";
        assert_eq!(sniff_delimiter(text).unwrap(), b';');
    }

    #[test]
    fn test_sniff_ignores_quoted_commas() {
        let text = "Name;ID\n\"Martin, Jean\";12\n\"Durand, Luc\";13\n";
        assert_eq!(sniff_delimiter(text).unwrap(), b';');
    }

    #[test]
    fn test_sniff_prefers_header_when_both_consistent() {
        let text = "a,b,c;d\n1,2,3;4\n";
        assert_eq!(sniff_delimiter(text).unwrap(), b',');
    }

    #[test]
    fn test_sniff_ambiguous() {
        assert!(matches!(
            sniff_delimiter("name\nMartin\n"),
            Err(ConfigError::AmbiguousDelimiter)
        ));
        assert!(matches!(
            sniff_delimiter("a,b;c\n1,2;3\n"),
            Err(ConfigError::AmbiguousDelimiter)
        ));
        assert!(sniff_delimiter("").is_err());
    }

    #[test]
    fn test_sniff_drops_truncated_line() {
        let mut text = String::from("Name;ID\n");
        while text.len() < SAMPLE_SIZE - 10 {
            text.push_str("MARTIN Jean;12\n");
        }
        text.push_str("DURAND, Luc, and a very long tail;13\n");
        assert_eq!(sniff_delimiter(&text).unwrap(), b';');
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
