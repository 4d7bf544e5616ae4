//! Place-name normalization for display.
//!
//! Feed place text usually reads "local description, larger region"
//! (e.g. "5km N of Ridgecrest, CA"). For display the segments are flipped
//! so the larger region leads. Oceanic and regional names such as
//! "Mid-Atlantic Ridge" have no such structure and are only capitalized.

/// Words marking a place as an oceanic/regional name that must not be
/// reordered.
pub const REGION_KEYWORDS: &[&str] = &[
    "Region", "Ocean", "Ridge", "Sea", "Passage", "Rise", "Gulf",
];

/// Normalizes a raw feed place string into its display form.
///
/// 1. Empty input gives an empty string.
/// 2. If any word matches a [`REGION_KEYWORDS`] entry (ignoring case and
///    trailing commas), the capitalized words are rejoined in order.
/// 3. Otherwise the `", "`-separated segments are reversed and the new
///    first segment is title-cased.
#[must_use]
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let capitalized = capitalize(raw);
    let words: Vec<&str> = capitalized.split_whitespace().collect();

    if words.iter().any(|w| is_region_keyword(w)) {
        return words.join(" ");
    }

    let mut segments: Vec<String> = raw.split(", ").map(str::to_string).collect();
    segments.reverse();
    if let Some(first) = segments.first_mut() {
        *first = title_case(first);
    }

    segments.join(", ")
}

fn is_region_keyword(word: &str) -> bool {
    let word = word.trim_end_matches(',');
    REGION_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Upper-cases the first letter of every alphabetic run, leaving the rest
/// of each run as-is so abbreviations like "CA" survive.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for c in s.chars() {
        if c.is_alphabetic() && !prev_alpha {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_local_and_region() {
        assert_eq!(normalize("5km N of Ridgecrest, CA"), "CA, 5km N of Ridgecrest");
    }

    #[test]
    fn keeps_region_names_in_order() {
        assert_eq!(normalize("Mariana Trench Region"), "Mariana trench region");
        assert_eq!(normalize("central Mid-Atlantic Ridge"), "Central mid-atlantic ridge");
        assert_eq!(normalize("Gulf of Alaska"), "Gulf of alaska");
    }

    #[test]
    fn region_keyword_with_trailing_comma() {
        assert_eq!(normalize("Banda Sea, Indonesia"), "Banda sea, indonesia");
    }

    #[test]
    fn keyword_must_be_a_whole_word() {
        // "Seattle" contains "Sea" but is not a region keyword.
        assert_eq!(normalize("3 km W of Seattle, Washington"), "Washington, 3 km W of Seattle");
    }

    #[test]
    fn single_segment_is_title_cased() {
        assert_eq!(normalize("southern alaska"), "Southern Alaska");
        assert_eq!(normalize("fiji"), "Fiji");
    }

    #[test]
    fn three_segments_reverse_fully() {
        assert_eq!(normalize("near town, county, state"), "State, county, near town");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
