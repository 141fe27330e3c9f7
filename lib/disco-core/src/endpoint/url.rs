/// Delimiter wrapped around every built URL template.
const DELIMITER: char = '\'';

/// Builds a URL template, returning it wrapped in one delimiter on each side.
///
/// Placeholders (`{name}`, `{+name}`) are left in place; they are substituted
/// when the request is executed. Callers strip the delimiters with
/// [`trim_delimiters`].
pub fn build_url(template: &str) -> String {
    format!("{DELIMITER}{template}{DELIMITER}")
}

/// Removes exactly one leading and one trailing character.
pub fn trim_delimiters(built: &str) -> &str {
    let mut chars = built.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
