//! Element and attribute name sanitizing

/// Format an element or attribute name so it is usable in XML markup.
///
/// Every character outside `[A-Za-z0-9:.\-_]` is removed. If the remaining name
/// starts with a digit, `-` or `.` it is prefixed with an underscore. An empty
/// result is returned as-is.
pub fn format_name(name: &str) -> String {
    let mut formatted: String = name.chars().filter(|c| is_name_char(*c)).collect();

    if formatted
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit() || first == '-' || first == '.')
    {
        formatted.insert(0, '_');
    }

    formatted
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '-' | '_')
}
