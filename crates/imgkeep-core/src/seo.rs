//! SEO friendly name normalization.

const CONNECTION_CHARS: [char; 3] = ['-', '_', ' '];

fn is_connection_char(c: char) -> bool {
    CONNECTION_CHARS.contains(&c)
}

/// Turn free text into a URL slug.
///
/// Letters and digits are kept, runs of `-`, `_` and spaces collapse into a
/// single `-`, anything else is dropped, and the result never starts or ends
/// with a separator:
///
/// ```
/// use imgkeep_core::format_for_seo;
///
/// assert_eq!(
///     format_for_seo("_some1 ran----dom __test -- to add-5- "),
///     "some1-ran-dom-test-to-add-5"
/// );
/// ```
pub fn format_for_seo(name: &str) -> String {
    let mut formatted = String::with_capacity(name.len());
    let mut pending_separator = false;

    let kept = name
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_numeric() || is_connection_char(*c));

    for c in kept {
        if is_connection_char(c) {
            // Emitted only once the next letter or digit shows up.
            pending_separator = !formatted.is_empty();
            continue;
        }

        if pending_separator {
            formatted.push('-');
            pending_separator = false;
        }
        formatted.push(c);
    }

    formatted
}
