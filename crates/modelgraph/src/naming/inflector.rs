//! English inflections for default storage names

use convert_case::{Boundary, Case, Casing};

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("move", "moves"),
    ("ox", "oxen"),
    ("person", "people"),
    ("sex", "sexes"),
    ("tooth", "teeth"),
    ("woman", "women"),
    ("zombie", "zombies"),
];

/// Digits stay attached to the letters before and after them; only a
/// capital following a digit starts a new word.
const DIGIT_JOINS: [Boundary; 3] = [Boundary::LowerDigit, Boundary::UpperDigit, Boundary::DigitLower];

/// Snake-case each `::` segment and join them with `_`
///
/// `Blog::BlogPost` becomes `blog_blog_post`, `V2Post` becomes `v2_post`.
pub fn underscore(name: &str) -> String {
    name.split("::")
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.remove_boundaries(&DIGIT_JOINS).to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join("_")
}

/// Pluralize the last word of an underscored identifier
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(split) => word.split_at(split + 1),
        None => ("", word),
    };

    if last.is_empty() {
        return word.to_string();
    }

    format!("{}{}", head, pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return plural.to_string();
    }
    // Already plural
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    let stem = |suffix_len: usize| &word[..word.len() - suffix_len];

    if lower == "quiz" {
        return format!("{}zes", word);
    }
    if lower.ends_with("mouse") || lower.ends_with("louse") {
        return format!("{}ice", stem(4));
    }
    for ending in ["matrix", "vertex", "index"] {
        if lower.ends_with(ending) {
            return format!("{}ices", stem(2));
        }
    }
    if lower.ends_with('x') || lower.ends_with("ch") || lower.ends_with("ss") || lower.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(before) = lower.strip_suffix('y') {
        let consonant = before.chars().last().is_some_and(|c| !"aeiouy".contains(c));
        if consonant || before.ends_with("qu") {
            return format!("{}ies", stem(1));
        }
    }
    if lower.ends_with("hive") {
        return format!("{}s", word);
    }
    if lower.ends_with("fe") && !lower.ends_with("ffe") {
        return format!("{}ves", stem(2));
    }
    if lower.ends_with("lf") || lower.ends_with("rf") {
        return format!("{}ves", stem(1));
    }
    if lower.ends_with("sis") {
        return format!("{}ses", stem(3));
    }
    if lower.ends_with("tum") || lower.ends_with("ium") {
        return format!("{}a", stem(2));
    }
    if lower.ends_with("buffalo") || lower.ends_with("tomato") {
        return format!("{}es", word);
    }
    if lower == "bus" || lower.ends_with("alias") || lower.ends_with("status") {
        return format!("{}es", word);
    }
    if lower.ends_with("octopus") || lower.ends_with("virus") {
        return format!("{}i", stem(2));
    }
    if lower.ends_with('s') {
        return word.to_string();
    }

    format!("{}s", word)
}

/// Default storage name: underscored and pluralized, `Blog::User` to `blog_users`
pub fn default_storage_name(model_name: &str) -> String {
    pluralize(&underscore(model_name))
}
