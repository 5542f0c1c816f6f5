pub mod delimiter;
pub mod names;

use crate::error::ConfigError;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub use names::CaseSplitName;

const NAME_HEADERS: &[&str] = &["nom complet", "full name", "name"];
const ID_HEADERS: &[&str] = &["identifiant", "identifier", "id number", "id"];

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// One student from an exported roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub display_name: String,
    pub identifier: String,
}

impl RosterRow {
    pub fn surname(&self) -> String {
        names::leading_surname(&self.display_name)
    }
}

/// A roster whose columns are located by header name.
#[derive(Debug)]
pub struct Roster {
    pub delimiter: u8,
    pub headers: Vec<String>,
    pub rows: Vec<RosterRow>,
}

/// Which delimiter the roster was read with and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterSource {
    Explicit,
    Detected,
}

impl Roster {
    /// Load a roster, using `delimiter` if given or sniffing it otherwise.
    pub fn load<P: AsRef<Path>>(path: P, delimiter: Option<&str>) -> Result<(Self, DelimiterSource)> {
        let text = read_roster(path.as_ref())?;
        let (delimiter, source) = match delimiter {
            Some(d) => (delimiter::parse_delimiter(d)?, DelimiterSource::Explicit),
            None => (delimiter::sniff_delimiter(&text)?, DelimiterSource::Detected),
        };
        Ok((Self::parse(&text, delimiter)?, source))
    }

    pub fn parse(text: &str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read roster header")?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ConfigError::EmptyRoster.into());
        }

        let name_col = find_column(&headers, NAME_HEADERS)
            .ok_or_else(|| ConfigError::MissingNameColumn(headers.clone()))?;
        let id_col = find_column(&headers, ID_HEADERS).unwrap_or(0);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to read roster row")?;
            let display_name = record.get(name_col).unwrap_or_default().trim();
            if display_name.is_empty() {
                continue;
            }
            rows.push(RosterRow {
                display_name: display_name.to_string(),
                identifier: extract_digits(record.get(id_col).unwrap_or_default()),
            });
        }

        Ok(Roster {
            delimiter,
            headers,
            rows,
        })
    }
}

/// One row of a positional `number;NAME Firstname;...` roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalRow {
    pub line: usize,
    pub name: Option<CaseSplitName>,
}

/// Load a semicolon roster whose second field holds the student name.
/// The first line is a header. Rows without a name field keep `name: None`.
pub fn load_positional<P: AsRef<Path>>(path: P) -> Result<Vec<PositionalRow>> {
    let text = read_roster(path.as_ref())?;
    parse_positional(&text)
}

pub fn parse_positional(text: &str) -> Result<Vec<PositionalRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read roster row")?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(PositionalRow {
            line: record.position().map_or(0, |p| p.line() as usize),
            name: record.get(1).map(CaseSplitName::parse),
        });
    }
    Ok(rows)
}

/// Concatenate every run of digits in `field` ("Participant 12-3" -> "123").
pub fn extract_digits(field: &str) -> String {
    DIGITS.find_iter(field).map(|m| m.as_str()).collect()
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
}

fn read_roster(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ConfigError::MissingPath(path.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster: {}", path.display()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_english_export() {
        let text = "Identifier,Full name,Email address\n\
                    Participant 1234,MARTIN Jean,jean@example.org\n\
                    Participant 99,\"DURAND Luc, Jr\",luc@example.org\n";
        let roster = Roster::parse(text, b',').unwrap();
        assert_eq!(
            roster.rows,
            vec![
                RosterRow {
                    display_name: "MARTIN Jean".into(),
                    identifier: "1234".into(),
                },
                RosterRow {
                    display_name: "DURAND Luc, Jr".into(),
                    identifier: "99".into(),
                },
            ]
        );
        assert_eq!(roster.rows[0].surname(), "MARTIN");
    }

    #[test]
    fn test_parse_french_export_and_skip_empty_names() {
        let text = "Identifiant;Nom complet;Statut\n\
                    Participant 7;  LEROY Anne  ;ok\n\
                    Participant 8;;ok\n\
                    Participant 9;   ;ok\n";
        let roster = Roster::parse(text, b';').unwrap();
        assert_eq!(roster.rows.len(), 1);
        assert_eq!(roster.rows[0].display_name, "LEROY Anne");
        assert_eq!(roster.rows[0].identifier, "7");
    }

    #[test]
    fn test_identifier_falls_back_to_first_column() {
        let text = "Code;Name\nA-12-34;MARTIN Jean\n";
        let roster = Roster::parse(text, b';').unwrap();
        assert_eq!(roster.rows[0].identifier, "1234");
    }

    #[test]
    fn test_header_aliases_are_case_insensitive() {
        let text = "ID NUMBER,NAME\n5,MARTIN Jean\n";
        let roster = Roster::parse(text, b',').unwrap();
        assert_eq!(roster.rows[0].identifier, "5");
        assert_eq!(roster.rows[0].display_name, "MARTIN Jean");
    }

    #[test]
    fn test_missing_name_column() {
        let err = Roster::parse("Email,Group\na@b.c,G1\n", b',').unwrap_err();
        match err.downcast::<ConfigError>().unwrap() {
            ConfigError::MissingNameColumn(headers) => {
                assert_eq!(headers, vec!["Email".to_string(), "Group".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_strips_bom_and_detects_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all("\u{feff}Nom complet;Identifiant\nMARTIN Jean;Participant 3\n".as_bytes())
            .unwrap();

        let (roster, source) = Roster::load(&path, None).unwrap();
        assert_eq!(source, DelimiterSource::Detected);
        assert_eq!(roster.delimiter, b';');
        assert_eq!(roster.headers[0], "Nom complet");
        assert_eq!(roster.rows[0].identifier, "3");
    }

    #[test]
    fn test_load_with_explicit_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.csv");
        // Neither ',' nor ';' is consistent and the header ties, so detection fails
        std::fs::write(&path, "Name;ID;a,b,c\nMARTIN Jean;12\nDURAND Luc;13;x,y,z,w\n").unwrap();
        assert!(Roster::load(&path, None).is_err());

        let (roster, source) = Roster::load(&path, Some(";")).unwrap();
        assert_eq!(source, DelimiterSource::Explicit);
        assert_eq!(roster.delimiter, b';');
        assert_eq!(roster.headers, vec!["Name", "ID", "a,b,c"]);
        assert_eq!(roster.rows.len(), 2);
        assert_eq!(roster.rows[0].display_name, "MARTIN Jean");
        assert_eq!(roster.rows[1].identifier, "13");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Roster::load(dir.path().join("nope.csv"), None).unwrap_err();
        assert!(matches!(
            err.downcast::<ConfigError>().unwrap(),
            ConfigError::MissingPath(_)
        ));
    }

    #[test]
    fn test_parse_positional() {
        let text = "N;Nom;Groupe\n1;MARTIN Jean;G1\n2;DUPONT-MOREL Élodie;G1\n\n3\n";
        let rows = parse_positional(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name.as_ref().unwrap().file_name(), "martin.jean.pdf");
        assert_eq!(rows[1].name.as_ref().unwrap().surname, "dupont-morel");
        assert_eq!(rows[1].name.as_ref().unwrap().first_name, "elodie");
        assert!(rows[2].name.is_none());
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits("Participant 12-34"), "1234");
        assert_eq!(extract_digits("none"), "");
    }
}
