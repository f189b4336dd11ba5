//! Single-pass multi-key substitution.

use indexmap::IndexMap;

/// Replace every occurrence of every key in `values` within `text`.
///
/// The text is scanned once from the left. At each position the longest key
/// starting there is replaced and scanning resumes after it, so replacement
/// values are never themselves searched for keys. Keys must be non-empty.
pub fn substitute(text: &str, values: &IndexMap<String, String>) -> String {
    if values.is_empty() {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let hit = values
            .iter()
            .filter(|(key, _)| !key.is_empty() && rest.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len());
        match hit {
            Some((key, value)) => {
                out.push_str(&text[copied_to..pos]);
                out.push_str(value);
                pos += key.len();
                copied_to = pos;
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    out.push_str(&text[copied_to..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_all_occurrences() {
        let out = substitute("%A% and %A%", &values(&[("%A%", "x")]));
        assert_eq!(out, "x and x");
    }

    #[test]
    fn replacement_output_is_not_rescanned() {
        let out = substitute("%A% %B%", &values(&[("%A%", "%B%"), ("%B%", "b")]));
        assert_eq!(out, "%B% b");
    }

    #[test]
    fn longest_key_wins_at_a_position() {
        let vals = values(&[("_PLH_1_", "one"), ("_PLH_1_1_", "eleven")]);
        assert_eq!(substitute("_PLH_1_1_", &vals), "eleven");
        assert_eq!(substitute("_PLH_1_2_", &vals), "one2_");
    }

    #[test]
    fn matching_starts_at_first_possible_offset() {
        let vals = values(&[("_PLH_3_", "v")]);
        assert_eq!(substitute("__PLH_3__", &vals), "_v_");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let out = substitute("Привет, %NAME%! ✓", &values(&[("%NAME%", "Аня")]));
        assert_eq!(out, "Привет, Аня! ✓");
    }

    #[test]
    fn no_values_returns_text_unchanged() {
        assert_eq!(substitute("static %X%", &IndexMap::new()), "static %X%");
    }
}
