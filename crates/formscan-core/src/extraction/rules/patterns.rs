//! Regex patterns for French administrative and legal documents.
//!
//! Each concept has a cascade of patterns tried in priority order. The first
//! capturing group of every pattern holds the value to extract.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Titles of legal texts
    pub static ref TITLE_LABELED: Regex = Regex::new(
        r"(?i)(?:titre|objet|sujet|intitulé)\s*:?\s*([^\n\r]{10,200})"
    ).unwrap();

    pub static ref FIRST_LINE: Regex = Regex::new(
        r"(?m)^([^\n\r]{20,150})\s*(?:\n|\r)"
    ).unwrap();

    pub static ref TITLE_ENACTMENT: Regex = Regex::new(
        r"(?i)(?:décret|arrêté|loi|ordonnance)(?:\s+(?:exécutif|présidentiel|ministériel|interministériel))?\s+(?:(?:n°|numéro)\s*[\d/-]+\s+)?(?:du|en date du)\s+(?:\d{1,2}(?:er)?\s+\p{L}+\s+\d{4}|[\d/.-]+)\s+(?:relatif|relative|portant|fixant)\s+([^\n\r]{10,150})"
    ).unwrap();

    pub static ref TITLE_CONCERNING: Regex = Regex::new(
        r"(?i)(?:concernant|relatifs?|relatives?|portant sur)\s+([^\n\r]{10,150})"
    ).unwrap();

    // Titles of administrative procedures
    pub static ref PROCEDURE_TITLE_LABELED: Regex = Regex::new(
        r"(?i)(?:titre|objet|procédure|sujet|intitulé)\s*:?\s*([^\n\r]{10,200})"
    ).unwrap();

    pub static ref PROCEDURE_ACTION: Regex = Regex::new(
        r"(?i)(?:procédure|démarche|formalité)\s+(?:de|pour|relative|concernant)\s+([^\n\r]{10,150})"
    ).unwrap();

    pub static ref PROCEDURE_REQUEST: Regex = Regex::new(
        r"(?i)(?:demande|dossier|formulaire)\s+(?:de|pour)\s+([^\n\r]{10,120})"
    ).unwrap();

    // Clauses of legal texts
    pub static ref CONSIDERANT: Regex = Regex::new(
        r"(?i)considérant\s+(?:que\s+)?([^.]{50,200})"
    ).unwrap();

    pub static ref ARTICLE_PREMIER: Regex = Regex::new(
        r"(?i)article\s+(?:premier|1er|1)\b\s*:?\s*([^.]{50,300})"
    ).unwrap();

    pub static ref DISPOSITIONS_FINALES: Regex = Regex::new(
        r"(?i)(?:article\s+(?:final|dernier)|dispositions?\s+finales?)\s*:?\s*([^.]{30,200})"
    ).unwrap();

    // Reference numbers
    pub static ref REFERENCE_ENACTMENT: Regex = Regex::new(
        r"(?i)(?:loi|décret|arrêté|ordonnance|circulaire)(?:\s+(?:exécutif|présidentiel|ministériel|interministériel|organique))?\s+n°\s*(\d[\w/-]*)"
    ).unwrap();

    pub static ref REFERENCE_NUMBER: Regex = Regex::new(
        r"(?i)\bn°\s*(\d[\w/-]*)"
    ).unwrap();

    // Dates
    pub static ref DATE_FRENCH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:er)?\s+(janvier|février|fevrier|mars|avril|mai|juin|juillet|août|aout|septembre|octobre|novembre|décembre|decembre)\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_needs_line_break() {
        assert!(FIRST_LINE.is_match("Une première ligne assez longue\nsuite"));
        assert!(!FIRST_LINE.is_match("Une première ligne assez longue"));
        assert!(!FIRST_LINE.is_match("Courte\nsuite"));
    }

    #[test]
    fn test_article_premier_does_not_match_article_ten() {
        let text = "Article 10 : les dispositions du présent texte entrent en vigueur dès leur publication officielle";
        assert!(!ARTICLE_PREMIER.is_match(text));
    }

    #[test]
    fn test_title_enactment() {
        let caps = TITLE_ENACTMENT
            .captures("Décret exécutif n° 24-05 du 10 janvier 2024 relatif à la protection des données")
            .unwrap();
        assert_eq!(&caps[1], "à la protection des données");

        let caps = TITLE_ENACTMENT
            .captures("Loi du 12/03/2023 portant organisation des élections locales")
            .unwrap();
        assert_eq!(&caps[1], "organisation des élections locales");
    }

    #[test]
    fn test_reference_enactment() {
        let caps = REFERENCE_ENACTMENT
            .captures("Décret exécutif n° 24-05 du 10 janvier 2024")
            .unwrap();
        assert_eq!(&caps[1], "24-05");
    }
}
