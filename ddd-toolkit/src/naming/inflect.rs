//! Naming-convention helpers for generated code
//!
//! Class names keep the caller's capitalisation apart from the first letter
//! of each word, so `HRM` stays `HRM`. Word splitting for `snake_case` only
//! happens at separators and before an upper-case letter, never around
//! digits (`address2` stays `address2`).
//!
//! Singular and plural forms only inflect the last word of an identifier
//! (`LineItems` -> `LineItem`). Irregular and uncountable words are looked up
//! first; everything else goes through `Inflector`'s rules.

use convert_case::{Boundary, Case, Casing};
use inflector::Inflector;

/// Word boundaries used for `snake_case`
const SNAKE_BOUNDARIES: [Boundary; 5] = [
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
];

/// Words with the same singular and plural form
const UNCOUNTABLE: &[&str] = &[
    "audio",
    "bison",
    "cattle",
    "chassis",
    "compensation",
    "data",
    "deer",
    "education",
    "emoji",
    "equipment",
    "evidence",
    "feedback",
    "firmware",
    "fish",
    "furniture",
    "gold",
    "hardware",
    "information",
    "knowledge",
    "metadata",
    "money",
    "moose",
    "news",
    "nutrition",
    "offspring",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "swine",
    "traffic",
    "wheat",
];

/// Irregular `(singular, plural)` pairs
const IRREGULAR: &[(&str, &str)] = &[
    ("alias", "aliases"),
    ("bus", "buses"),
    ("campus", "campuses"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("move", "moves"),
    ("ox", "oxen"),
    ("person", "people"),
    ("sex", "sexes"),
    ("status", "statuses"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

#[derive(Clone, Copy)]
enum Number {
    Singular,
    Plural,
}

/// Naming helpers
pub struct Inflect;

impl Inflect {
    /// Convert string to `StudlyCase` (class-name form)
    ///
    /// Splits on `-`, `_` and spaces and upper-cases the first letter of each
    /// word. The rest of each word is left as written.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::studly("line_item"), "LineItem");
    /// assert_eq!(Inflect::studly("billing"), "Billing");
    /// assert_eq!(Inflect::studly("LineItem"), "LineItem");
    /// assert_eq!(Inflect::studly("HRM"), "HRM");
    /// ```
    #[must_use]
    pub fn studly(input: &str) -> String {
        input
            .split(['-', '_', ' '])
            .map(Self::ucfirst)
            .collect()
    }

    /// Convert string to camelCase (variable-name form)
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::camel("LineItem"), "lineItem");
    /// ```
    #[must_use]
    pub fn camel(input: &str) -> String {
        let studly = Self::studly(input);
        let mut chars = studly.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_lowercase().chain(chars).collect()
        })
    }

    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::snake("LineItem"), "line_item");
    /// assert_eq!(Inflect::snake("phone_number"), "phone_number");
    /// assert_eq!(Inflect::snake("address2"), "address2");
    /// ```
    #[must_use]
    pub fn snake(input: &str) -> String {
        input.with_boundaries(&SNAKE_BOUNDARIES).to_case(Case::Snake)
    }

    /// Singular form of an identifier, inflecting its last word
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::singular("LineItems"), "LineItem");
    /// assert_eq!(Inflect::singular("Status"), "Status");
    /// ```
    #[must_use]
    pub fn singular(input: &str) -> String {
        Self::inflect_last_word(input, Number::Singular)
    }

    /// Plural form of an identifier, inflecting its last word
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::plural("SalesPerson"), "SalesPeople");
    /// assert_eq!(Inflect::plural("category"), "categories");
    /// ```
    #[must_use]
    pub fn plural(input: &str) -> String {
        Self::inflect_last_word(input, Number::Plural)
    }

    /// Table name for a class name (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::table_name("LineItem"), "line_items");
    /// assert_eq!(Inflect::table_name("Post"), "posts");
    /// assert_eq!(Inflect::table_name("Person"), "people");
    /// ```
    #[must_use]
    pub fn table_name(input: &str) -> String {
        Self::plural(&Self::snake(input))
    }

    /// Route prefix for a module (plain lower case, no separators)
    ///
    /// # Examples
    ///
    /// ```
    /// # use ddd_toolkit::naming::Inflect;
    /// assert_eq!(Inflect::route_prefix("UserProfile"), "userprofile");
    /// ```
    #[must_use]
    pub fn route_prefix(module: &str) -> String {
        module.to_lowercase()
    }

    fn ucfirst(word: &str) -> String {
        let mut chars = word.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Byte offset where the last word of an identifier starts
    fn last_word_start(input: &str) -> usize {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (idx, ch) in input.char_indices() {
            if let Some(prev) = prev {
                let separated = matches!(prev, '_' | '-' | ' ');
                let camel_hump = ch.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit());
                if separated || camel_hump {
                    start = idx;
                }
            }
            prev = Some(ch);
        }
        start
    }

    fn inflect_last_word(input: &str, number: Number) -> String {
        let (head, word) = input.split_at(Self::last_word_start(input));
        if word.is_empty() {
            return input.to_string();
        }

        let lower = word.to_lowercase();
        let inflected = if UNCOUNTABLE.contains(&lower.as_str()) {
            lower
        } else if let Some(&(singular, plural)) = IRREGULAR
            .iter()
            .find(|&&(singular, plural)| lower == singular || lower == plural)
        {
            match number {
                Number::Singular => singular.to_string(),
                Number::Plural => plural.to_string(),
            }
        } else {
            match number {
                Number::Singular => lower.to_singular(),
                Number::Plural => lower.to_plural(),
            }
        };

        format!("{head}{}", Self::match_case(&inflected, word))
    }

    /// Apply the capitalisation of `original` to `word`
    fn match_case(word: &str, original: &str) -> String {
        let has_letters = original.chars().any(char::is_alphabetic);
        let all_upper = original.chars().count() > 1 && !original.chars().any(char::is_lowercase);

        if has_letters && all_upper {
            word.to_uppercase()
        } else if original.chars().next().is_some_and(char::is_uppercase) {
            Self::ucfirst(word)
        } else {
            word.to_string()
        }
    }
}
