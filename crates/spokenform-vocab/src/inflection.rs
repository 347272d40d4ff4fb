//! English pluralization for synthesized `*_plural` lists.
//!
//! Irregular words are tried first, then the suffix table from the most
//! specific pattern down to the catch-all `$ -> s`. Uncountable words are
//! returned unchanged.

use regex::Regex;
use std::sync::OnceLock;

const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "rice",
    "series",
    "sheep",
    "species",
];

/// `(singular, plural)` pairs. Later pairs take precedence over earlier ones.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("human", "humans"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("cow", "kine"),
    ("zombie", "zombies"),
];

/// Suffix rules, most specific first.
const SUFFIX_RULES: &[(&str, &str)] = &[
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(oxen)$", "${1}"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)(m|l)ice$", "${1}ice"),
    (r"(?i)(m|l)ouse$", "${1}ice"),
    (r"(?i)(passer)s?by$", "${1}sby"),
    (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive)$", "${1}s"),
    (r"(?i)([lr])f$", "${1}ves"),
    (r"(?i)([^f])fe$", "${1}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])a$", "${1}a"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(buffal|potat|tomat)o$", "${1}oes"),
    (r"(?i)(bu)s$", "${1}ses"),
    (r"(?i)(alias|status)$", "${1}es"),
    (r"(?i)(octop|vir)i$", "${1}i"),
    (r"(?i)(octop|vir)us$", "${1}i"),
    (r"(?i)^(ax|test)is$", "${1}es"),
    (r"(?i)s$", "s"),
    (r"$", "s"),
];

struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(pattern: &str, replacement: String) -> Option<Self> {
        Regex::new(pattern)
            .ok()
            .map(|pattern| Rule { pattern, replacement })
    }
}

/// Rules for one irregular pair, matching either form at the end of a word.
fn irregular_rules(singular: &str, plural: &str) -> Vec<Rule> {
    let same_initial = singular.chars().next().map(|c| c.to_ascii_lowercase())
        == plural.chars().next().map(|c| c.to_ascii_lowercase());
    [plural, singular]
        .into_iter()
        .filter_map(|word| {
            if same_initial {
                let (head, tail) = word.split_at(1);
                Rule::new(
                    &format!("(?i)({head}){tail}$"),
                    format!("${{1}}{}", &plural[1..]),
                )
            } else {
                Rule::new(&format!("(?i){word}$"), plural.to_string())
            }
        })
        .collect()
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut rules: Vec<Rule> = IRREGULARS
            .iter()
            .rev()
            .flat_map(|(singular, plural)| irregular_rules(singular, plural))
            .collect();
        rules.extend(
            SUFFIX_RULES
                .iter()
                .filter_map(|(pattern, replacement)| Rule::new(pattern, replacement.to_string())),
        );
        rules
    })
}

/// Plural form of `word`. Rules are anchored at the end of the input, so
/// multi-word spoken forms like `sub word` inflect their last word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLES.contains(&word.to_lowercase().as_str()) {
        return word.to_string();
    }
    rules()
        .iter()
        .find(|rule| rule.pattern.is_match(word))
        .map(|rule| {
            rule.pattern
                .replace(word, rule.replacement.as_str())
                .into_owned()
        })
        .unwrap_or_else(|| word.to_string())
}
