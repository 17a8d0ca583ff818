//! Brazilian tax documents (CPF for people, CNPJ for companies).
//!
//! Documents are stored and looked up as bare digits, whatever punctuation the caller typed.

/// Strips every character that is not an ASCII digit.
pub fn digits_only(document: &str) -> String {
    document.chars().filter(char::is_ascii_digit).collect()
}
