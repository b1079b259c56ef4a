//! Supported display locales and their text direction.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Self::En => TextDirection::LeftToRight,
            Self::Ar => TextDirection::RightToLeft,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == TextDirection::RightToLeft
    }

    /// Separator between breadcrumb levels, pointing in reading order.
    pub fn breadcrumb_separator(&self) -> &'static str {
        if self.is_rtl() {
            " < "
        } else {
            " > "
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept region-qualified tags such as "ar-SA" or "en_US".
        let lang = s
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_tags() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ar-SA".parse::<Locale>().unwrap(), Locale::Ar);
        assert_eq!("EN_us".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_arabic_is_rtl() {
        assert!(Locale::Ar.is_rtl());
        assert!(!Locale::En.is_rtl());
        assert_eq!(Locale::En.breadcrumb_separator(), " > ");
        assert_eq!(Locale::Ar.breadcrumb_separator(), " < ");
    }
}
