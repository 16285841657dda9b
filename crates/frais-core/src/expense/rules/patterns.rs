//! Regex patterns for travel-expense form fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Family name label: "NOM : DUPONT", "Name: Smith", "SURNAME: DOE". Captures to end of line.
    pub static ref AGENT_NAME: Regex = Regex::new(
        r"(?i)\b(?:NOM|NAME|SURNAME)[ \t]*:[ \t]*(\p{L}[\p{L}'\- \t]*)"
    ).unwrap();

    // First name label: "PRENOM : JEAN", "Prénom: Hélène", "FIRST NAME: JOHN".
    pub static ref FIRST_NAME: Regex = Regex::new(
        r"(?i)\b(?:PR[EÉ]NOM|FIRST[ \t]+NAME)[ \t]*:[ \t]*(\p{L}[\p{L}'\- \t]*)"
    ).unwrap();

    // Amount to pay: "TOTAL A PAYER = 125,50", "TOTAL TO PAY = 1 234.00"
    pub static ref TOTAL_TO_PAY: Regex = Regex::new(
        r"(?i)TOTAL\s+(?:[AÀ]\s+PAYER|TO\s+PAY)\s*[=:]\s*(\d{1,3}(?:[ \u{00a0}]\d{3})+(?:[.,]\d+)?|\d+(?:[.,]\d+)?)"
    ).unwrap();

    // Word immediately preceding a NAME label that turns it into a first-name label.
    pub static ref FIRST_PREFIX: Regex = Regex::new(
        r"(?i)\bFIRST[ \t]*$"
    ).unwrap();
}
