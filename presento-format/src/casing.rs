//! Casing helpers used as property naming strategies

/// Default delimiter for [`to_camel_case`]
pub const DEFAULT_DELIMITER: char = '_';

/// Convert delimiter-separated text to upper camel case
///
/// Each piece is lowercased and its first character upper-cased, so
/// `FIX_CAPITALIZATION` becomes `FixCapitalization` and `a_lot_of_words`
/// becomes `ALotOfWords`.
pub fn to_camel_case(text: &str, delimiter: char) -> String {
    let mut result = String::with_capacity(text.len());

    for piece in text.split(delimiter) {
        let lower = piece.to_lowercase();
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }

    result
}

/// Naming strategy converting `snake_case` properties
pub fn snake_to_camel_case(property: &str) -> String {
    to_camel_case(property, DEFAULT_DELIMITER)
}

/// Naming strategy converting `kebab-case` properties
pub fn kebab_to_camel_case(property: &str) -> String {
    to_camel_case(property, '-')
}
