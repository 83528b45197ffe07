/// Normalize a user-supplied host URL.
///
/// Pure string function (no network, no DNS): identical inputs always
/// normalize identically. A recognized scheme is left untouched; a `www.`
/// host gets the default scheme prepended; anything else is treated as a
/// bare domain and gets both the scheme and the conventional `www.` prefix.
pub fn normalize_host(input: &str) -> String {
    let trimmed = input.trim();

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.starts_with("www.") {
        format!("https://{trimmed}")
    } else {
        format!("https://www.{trimmed}")
    }
}
