//! CLDR-style plural categories, selected per locale from a static table.
//!
//! A catalogue stores plural variants in the order returned by
//! [`PluralRule::categories`], which is also the order Qt Linguist uses for
//! `<numerusform>` elements.

use std::fmt;
use unic_langid::LanguageIdentifier;

/// Grammatical number class of a count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A family of languages sharing the same cardinal plural rule for integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// One form for every count.
    NoPlural,
    /// `1` is singular, everything else plural.
    #[default]
    OneOther,
    /// `0` and `1` are singular.
    ZeroOneOther,
    /// Croatian, Serbian, Bosnian: `21` is singular, `22` is few, `25` is other.
    CroatianSerbian,
    /// Russian, Ukrainian, Belarusian.
    EastSlavic,
    Polish,
    CzechSlovak,
    Slovenian,
    Lithuanian,
    Latvian,
    Romanian,
    Macedonian,
    Hebrew,
    Irish,
    Arabic,
}

use PluralCategory::{Few, Many, One, Other, Two, Zero};

/// Primary language subtag to rule family.
const PLURAL_RULES: &[(&str, PluralRule)] = &[
    ("af", PluralRule::OneOther),
    ("ak", PluralRule::ZeroOneOther),
    ("am", PluralRule::ZeroOneOther),
    ("ar", PluralRule::Arabic),
    ("be", PluralRule::EastSlavic),
    ("bg", PluralRule::OneOther),
    ("bn", PluralRule::ZeroOneOther),
    ("bo", PluralRule::NoPlural),
    ("bs", PluralRule::CroatianSerbian),
    ("ca", PluralRule::OneOther),
    ("cs", PluralRule::CzechSlovak),
    ("da", PluralRule::OneOther),
    ("de", PluralRule::OneOther),
    ("dz", PluralRule::NoPlural),
    ("el", PluralRule::OneOther),
    ("en", PluralRule::OneOther),
    ("eo", PluralRule::OneOther),
    ("es", PluralRule::OneOther),
    ("et", PluralRule::OneOther),
    ("eu", PluralRule::OneOther),
    ("fa", PluralRule::ZeroOneOther),
    ("ff", PluralRule::ZeroOneOther),
    ("fi", PluralRule::OneOther),
    ("fo", PluralRule::OneOther),
    ("fr", PluralRule::ZeroOneOther),
    ("fur", PluralRule::OneOther),
    ("fy", PluralRule::OneOther),
    ("ga", PluralRule::Irish),
    ("gl", PluralRule::OneOther),
    ("gu", PluralRule::OneOther),
    ("ha", PluralRule::OneOther),
    ("he", PluralRule::Hebrew),
    ("hi", PluralRule::ZeroOneOther),
    ("hr", PluralRule::CroatianSerbian),
    ("hu", PluralRule::OneOther),
    ("hy", PluralRule::ZeroOneOther),
    ("id", PluralRule::NoPlural),
    ("ig", PluralRule::NoPlural),
    ("it", PluralRule::OneOther),
    ("iw", PluralRule::Hebrew),
    ("ja", PluralRule::NoPlural),
    ("jv", PluralRule::NoPlural),
    ("ka", PluralRule::OneOther),
    ("kab", PluralRule::ZeroOneOther),
    ("kk", PluralRule::OneOther),
    ("km", PluralRule::NoPlural),
    ("ko", PluralRule::NoPlural),
    ("ky", PluralRule::OneOther),
    ("lb", PluralRule::OneOther),
    ("ln", PluralRule::ZeroOneOther),
    ("lo", PluralRule::NoPlural),
    ("lt", PluralRule::Lithuanian),
    ("lv", PluralRule::Latvian),
    ("mk", PluralRule::Macedonian),
    ("ml", PluralRule::OneOther),
    ("mn", PluralRule::OneOther),
    ("mo", PluralRule::Romanian),
    ("mr", PluralRule::OneOther),
    ("ms", PluralRule::NoPlural),
    ("my", PluralRule::NoPlural),
    ("nb", PluralRule::OneOther),
    ("ne", PluralRule::OneOther),
    ("nl", PluralRule::OneOther),
    ("nn", PluralRule::OneOther),
    ("no", PluralRule::OneOther),
    ("or", PluralRule::OneOther),
    ("pa", PluralRule::OneOther),
    ("pl", PluralRule::Polish),
    ("ps", PluralRule::OneOther),
    ("pt", PluralRule::ZeroOneOther),
    ("ro", PluralRule::Romanian),
    ("ru", PluralRule::EastSlavic),
    ("sah", PluralRule::NoPlural),
    ("sh", PluralRule::CroatianSerbian),
    ("sk", PluralRule::CzechSlovak),
    ("sl", PluralRule::Slovenian),
    ("sq", PluralRule::OneOther),
    ("sr", PluralRule::CroatianSerbian),
    ("sv", PluralRule::OneOther),
    ("sw", PluralRule::OneOther),
    ("ta", PluralRule::OneOther),
    ("te", PluralRule::OneOther),
    ("th", PluralRule::NoPlural),
    ("tk", PluralRule::OneOther),
    ("to", PluralRule::NoPlural),
    ("tr", PluralRule::OneOther),
    ("uk", PluralRule::EastSlavic),
    ("ur", PluralRule::OneOther),
    ("uz", PluralRule::OneOther),
    ("vi", PluralRule::NoPlural),
    ("wo", PluralRule::NoPlural),
    ("yo", PluralRule::NoPlural),
    ("zh", PluralRule::NoPlural),
    ("zu", PluralRule::ZeroOneOther),
];

impl PluralRule {
    /// Looks up the rule for a locale by its primary language subtag.
    ///
    /// Languages missing from the table use [`PluralRule::OneOther`].
    pub fn for_language(lang: &LanguageIdentifier) -> Self {
        let language = lang.language.as_str();
        match PLURAL_RULES
            .binary_search_by_key(&language, |(code, _)| *code)
            .map(|found| PLURAL_RULES[found].1)
        {
            Ok(rule) => rule,
            Err(_) => {
                tracing::debug!(
                    "No plural rule registered for '{}', using one/other",
                    lang
                );
                Self::default()
            },
        }
    }

    /// The categories this rule distinguishes, in form order.
    pub const fn categories(self) -> &'static [PluralCategory] {
        match self {
            Self::NoPlural => &[Other],
            Self::OneOther | Self::ZeroOneOther | Self::Macedonian => &[One, Other],
            Self::CroatianSerbian | Self::CzechSlovak | Self::Lithuanian | Self::Romanian => {
                &[One, Few, Other]
            },
            Self::EastSlavic | Self::Polish => &[One, Few, Many],
            Self::Slovenian => &[One, Two, Few, Other],
            Self::Latvian => &[Zero, One, Other],
            Self::Hebrew => &[One, Two, Other],
            Self::Irish => &[One, Two, Few, Many, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
        }
    }

    /// Number of plural forms a fully translated message carries.
    pub const fn form_count(self) -> usize {
        self.categories().len()
    }

    /// Category of the integer count `n`.
    pub fn category(self, n: u64) -> PluralCategory {
        let mod10 = n % 10;
        let mod100 = n % 100;
        let slavic_one = mod10 == 1 && mod100 != 11;
        let slavic_few = (2..=4).contains(&mod10) && !(12..=14).contains(&mod100);

        match self {
            Self::NoPlural => Other,
            Self::OneOther => {
                if n == 1 {
                    One
                } else {
                    Other
                }
            },
            Self::ZeroOneOther => {
                if n <= 1 {
                    One
                } else {
                    Other
                }
            },
            Self::CroatianSerbian => {
                if slavic_one {
                    One
                } else if slavic_few {
                    Few
                } else {
                    Other
                }
            },
            Self::EastSlavic => {
                if slavic_one {
                    One
                } else if slavic_few {
                    Few
                } else {
                    Many
                }
            },
            Self::Polish => {
                if n == 1 {
                    One
                } else if slavic_few {
                    Few
                } else {
                    Many
                }
            },
            Self::CzechSlovak => match n {
                1 => One,
                2..=4 => Few,
                _ => Other,
            },
            Self::Slovenian => match mod100 {
                1 => One,
                2 => Two,
                3 | 4 => Few,
                _ => Other,
            },
            Self::Lithuanian => {
                let teen = (11..=19).contains(&mod100);
                if mod10 == 1 && !teen {
                    One
                } else if mod10 >= 2 && !teen {
                    Few
                } else {
                    Other
                }
            },
            Self::Latvian => {
                if mod10 == 0 || (11..=19).contains(&mod100) {
                    Zero
                } else if slavic_one {
                    One
                } else {
                    Other
                }
            },
            Self::Romanian => {
                if n == 1 {
                    One
                } else if n == 0 || (2..=19).contains(&mod100) {
                    Few
                } else {
                    Other
                }
            },
            Self::Macedonian => {
                if slavic_one {
                    One
                } else {
                    Other
                }
            },
            Self::Hebrew => match n {
                1 => One,
                2 => Two,
                _ => Other,
            },
            Self::Irish => match n {
                1 => One,
                2 => Two,
                3..=6 => Few,
                7..=10 => Many,
                _ => Other,
            },
            Self::Arabic => match (n, mod100) {
                (0, _) => Zero,
                (1, _) => One,
                (2, _) => Two,
                (_, 3..=10) => Few,
                (_, 11..=99) => Many,
                _ => Other,
            },
        }
    }

    /// Position of the variant for `n` among [`PluralRule::categories`].
    pub fn form_index(self, n: u64) -> usize {
        let category = self.category(n);
        self.categories()
            .iter()
            .position(|candidate| *candidate == category)
            .unwrap_or(self.form_count() - 1)
    }
}
