//! Display locales.

use serde::{Deserialize, Deserializer};

/// A supported display locale.
///
/// Unknown locale codes fall back to Finnish, the home locale of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    Fi,
    Sv,
    En,
}

impl Locale {
    /// Map a language code (`fi`, `sv-FI`, `en_GB`, ...) to a locale.
    pub fn from_code(code: &str) -> Self {
        let lang = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "sv" => Locale::Sv,
            "en" => Locale::En,
            _ => Locale::Fi,
        }
    }

    /// Short language code.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Fi => "fi",
            Locale::Sv => "sv",
            Locale::En => "en",
        }
    }

    /// Separator between hours and minutes in clock times.
    pub fn clock_separator(&self) -> char {
        match self {
            Locale::Fi => '.',
            Locale::Sv | Locale::En => ':',
        }
    }

    /// Short unit label for hours.
    pub fn hour_unit(&self) -> &'static str {
        match self {
            Locale::Fi => "t",
            Locale::Sv => "tim",
            Locale::En => "h",
        }
    }

    /// Short unit label for minutes.
    pub fn minute_unit(&self) -> &'static str {
        "min"
    }

    pub fn departures_label(&self) -> &'static str {
        match self {
            Locale::Fi => "Lähtevät",
            Locale::Sv => "Avgående",
            Locale::En => "Departures",
        }
    }

    pub fn arrivals_label(&self) -> &'static str {
        match self {
            Locale::Fi => "Saapuvat",
            Locale::Sv => "Ankommande",
            Locale::En => "Arrivals",
        }
    }

    pub fn next_train_label(&self) -> &'static str {
        match self {
            Locale::Fi => "Seuraava juna",
            Locale::Sv => "Nästa tåg",
            Locale::En => "Next train",
        }
    }

    pub fn cancelled_label(&self) -> &'static str {
        match self {
            Locale::Fi => "Peruttu",
            Locale::Sv => "Inställt",
            Locale::En => "Cancelled",
        }
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Locale::from_code(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(Locale::from_code("fi"), Locale::Fi);
        assert_eq!(Locale::from_code("sv"), Locale::Sv);
        assert_eq!(Locale::from_code("en"), Locale::En);
        assert_eq!(Locale::from_code("en-GB"), Locale::En);
        assert_eq!(Locale::from_code("SV_fi"), Locale::Sv);
    }

    #[test]
    fn unknown_code_falls_back_to_finnish() {
        assert_eq!(Locale::from_code("de"), Locale::Fi);
        assert_eq!(Locale::from_code(""), Locale::Fi);
    }

    #[test]
    fn deserialize_never_fails() {
        let locale: Locale = serde_json::from_str("\"xx\"").unwrap();
        assert_eq!(locale, Locale::Fi);
    }
}
