//! Station name clean-up for display and lookup.
//!
//! Digitraffic publishes names like "Helsinki asema" ("asema" is Finnish
//! for "station"). Pages show "Helsinki", and URLs use the bare city name
//! in any case and with or without diacritics, so lookup compares a
//! stricter normalized form.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// The word stripped from station names.
const STATION_WORD: &str = "asema";

/// Clean a station name for display.
///
/// Removes the whole word "asema" (any case), turns underscores into spaces,
/// collapses the whitespace around a removed token and trims. Other spacing
/// and the case of everything else are preserved. Idempotent.
///
/// # Examples
///
/// ```
/// use juna_server::stations::sanitize_station_name;
///
/// assert_eq!(sanitize_station_name("Helsinki asema"), "Helsinki");
/// assert_eq!(sanitize_station_name("Asema Tikkurila"), "Tikkurila");
/// assert_eq!(sanitize_station_name("pasila_autojuna"), "pasila autojuna");
/// assert_eq!(sanitize_station_name("Asemakatu"), "Asemakatu");
/// ```
pub fn sanitize_station_name(name: &str) -> String {
    let name = name.replace('_', " ");
    let mut out = String::with_capacity(name.len());
    let mut rest = name.as_str();
    let mut removed = false;

    while !rest.is_empty() {
        let word_start = rest.len() - rest.trim_start().len();
        let (gap, tail) = rest.split_at(word_start);
        let word_len = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let (word, tail) = tail.split_at(word_len);
        rest = tail;

        if word.is_empty() {
            break;
        }
        if word.eq_ignore_ascii_case(STATION_WORD) {
            removed = true;
            continue;
        }

        // The gaps on both sides of a removed token become one space
        if !out.is_empty() {
            out.push_str(if removed { " " } else { gap });
        }
        out.push_str(word);
        removed = false;
    }

    out
}

/// Normalize a name for matching against a URL segment.
///
/// Sanitizes, decomposes (NFD), drops combining marks, removes spaces,
/// hyphens and parentheses, and lowercases.
///
/// # Examples
///
/// ```
/// use juna_server::stations::normalize_for_match;
///
/// assert_eq!(normalize_for_match("Jyväskylä asema"), "jyvaskyla");
/// assert_eq!(normalize_for_match("jyvaskyla"), "jyvaskyla");
/// assert_eq!(normalize_for_match("Helsinki-Vantaa (lentoasema)"), "helsinkivantaalentoasema");
/// ```
pub fn normalize_for_match(name: &str) -> String {
    sanitize_station_name(name)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_token() {
        assert_eq!(sanitize_station_name("Tampere asema"), "Tampere");
        assert_eq!(sanitize_station_name("Tampere ASEMA"), "Tampere");
    }

    #[test]
    fn strips_leading_token() {
        assert_eq!(sanitize_station_name("asema Tampere"), "Tampere");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_station_name("  Riihimäki   asema  "), "Riihimäki");
        assert_eq!(sanitize_station_name("Helsinki asema  Pasila"), "Helsinki Pasila");
    }

    #[test]
    fn keeps_spacing_away_from_token() {
        assert_eq!(sanitize_station_name("Foo  Bar"), "Foo  Bar");
        assert_eq!(sanitize_station_name("Foo\tBar asema"), "Foo\tBar");
        assert_eq!(sanitize_station_name("Foo  asema\tBar"), "Foo Bar");
    }

    #[test]
    fn keeps_token_inside_words() {
        assert_eq!(sanitize_station_name("Lentoasema"), "Lentoasema");
        assert_eq!(sanitize_station_name("Asemakylä"), "Asemakylä");
    }

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(sanitize_station_name("Helsinki_asema"), "Helsinki");
    }

    #[test]
    fn preserves_case_of_rest() {
        assert_eq!(sanitize_station_name("hELSinki asema"), "hELSinki");
    }

    #[test]
    fn empty_and_token_only() {
        assert_eq!(sanitize_station_name(""), "");
        assert_eq!(sanitize_station_name("asema"), "");
    }

    #[test]
    fn normalize_strips_diacritics_and_punctuation() {
        assert_eq!(normalize_for_match("Käpylä"), "kapyla");
        assert_eq!(normalize_for_match("Seinäjoki asema"), "seinajoki");
        assert_eq!(normalize_for_match("Kauniainen-Grankulla"), "kauniainengrankulla");
        assert_eq!(normalize_for_match("Åbo (Turku)"), "aboturku");
    }

    #[test]
    fn normalize_matches_url_forms() {
        assert_eq!(normalize_for_match("Hämeenlinna"), normalize_for_match("hameenlinna"));
        assert_eq!(normalize_for_match("Helsinki asema"), normalize_for_match("helsinki"));
    }
}
