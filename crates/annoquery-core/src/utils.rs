/// Whether `s` can appear in statement text without quoting.
///
/// Plain identifiers start with an ASCII letter or `_` and continue with
/// ASCII alphanumerics or `_`.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote an identifier (label, property key, alias) for statement text.
///
/// Plain identifiers pass through; anything else is wrapped in backticks with
/// embedded backticks doubled.
///
/// # Examples
/// ```
/// use annoquery_core::utils::escape_identifier;
/// assert_eq!(escape_identifier("label"), "label");
/// assert_eq!(escape_identifier("2nd_phone"), "`2nd_phone`");
/// assert_eq!(escape_identifier("a`b"), "`a``b`");
/// ```
pub fn escape_identifier(s: &str) -> String {
    if is_plain_identifier(s) {
        return s.to_string();
    }
    format!("`{}`", s.replace('`', "``"))
}

/// Convert arbitrary text into a snake_case variable fragment.
///
/// Runs of characters that are not ASCII alphanumerics collapse into a single
/// `_`; uppercase letters are lowered. Used for pattern variables and
/// parameter hints, which must always be plain identifiers.
///
/// # Examples
/// ```
/// use annoquery_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("Phone Type"), "phone_type");
/// assert_eq!(to_snake_case("SH-ZH"), "sh_zh");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
    }
    while result.ends_with('_') {
        result.pop();
    }
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
