//! Identifier sanitization for generated TypeScript names.
//!
//! Every generated identifier (interface names, enum names, enum members,
//! association keys) goes through these functions. They are pure: the same
//! input always yields the same output, and the order of the individual steps
//! matters for the result.
//!
//! "Word" characters are ASCII letters, digits and `_`; whitespace is space,
//! tab, newline, carriage return and form feed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches every character that is neither a word character nor whitespace.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z_\t\n\x0C\r ]").expect("NON_WORD pattern is valid"));

fn strip_non_word(input: &str) -> String {
    NON_WORD.replace_all(input, "").into_owned()
}

/// Uppercases the first letter of every word, where words are separated by
/// whitespace. Letters, digits and `_` do not start a new word.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    out
}

/// Turns a free-text label into a lowercase, underscore-joined identifier.
///
/// An empty input yields `"_"`. A non-empty input made only of punctuation
/// yields an empty string; callers that need an identifier must handle that.
///
/// ## Examples
///
/// ```
/// use hsgen_lib::sanitize::sanitize_label;
///
/// assert_eq!(sanitize_label(""), "_");
/// assert_eq!(sanitize_label("Hello, World!"), "hello_world");
/// assert_eq!(sanitize_label("Decision Maker"), "decision_maker");
/// ```
pub fn sanitize_label(input: &str) -> String {
    if input.is_empty() {
        return "_".to_string();
    }

    strip_non_word(input).replace(' ', "_").to_lowercase()
}

/// Converts a schema name such as `line_item` into an interface name (`LineItem`).
///
/// ## Examples
///
/// ```
/// use hsgen_lib::sanitize::schema_name_to_interface_name;
///
/// assert_eq!(schema_name_to_interface_name("my_custom_object"), "MyCustomObject");
/// assert_eq!(schema_name_to_interface_name("DEAL"), "Deal");
/// ```
pub fn schema_name_to_interface_name(input: &str) -> String {
    strip_non_word(input)
        .to_lowercase()
        .split('_')
        .map(title_case)
        .collect()
}

/// Converts a property label such as `Deal Stage` into an enum name fragment (`DealStage`).
///
/// ## Examples
///
/// ```
/// use hsgen_lib::sanitize::label_to_enum_name;
///
/// assert_eq!(label_to_enum_name("Deal Stage"), "DealStage");
/// assert_eq!(label_to_enum_name("  lead  (status) "), "LeadStatus");
/// ```
pub fn label_to_enum_name(input: &str) -> String {
    strip_non_word(input)
        .to_lowercase()
        .split_whitespace()
        .map(title_case)
        .collect()
}

/// Prefixes `_` when the identifier would otherwise start with a digit.
///
/// ## Examples
///
/// ```
/// use hsgen_lib::sanitize::prepend_underscore_to_enum;
///
/// assert_eq!(prepend_underscore_to_enum("1st"), "_1st");
/// assert_eq!(prepend_underscore_to_enum("abc"), "abc");
/// ```
pub fn prepend_underscore_to_enum(input: &str) -> String {
    if input.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{input}")
    } else {
        input.to_string()
    }
}
