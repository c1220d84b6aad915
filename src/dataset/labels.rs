use crate::error::{CoughError, Result};
use crate::types::{CoughCategory, Sex};

const SEX_TOKENS: [(&str, Sex); 2] = [("male", Sex::Male), ("female", Sex::Female)];

const CATEGORY_TOKENS: [(&str, CoughCategory); 4] = [
    ("normal", CoughCategory::Normal),
    ("wet", CoughCategory::Wet),
    ("whistling", CoughCategory::Whistling),
    ("covid", CoughCategory::Covid),
];

impl Sex {
    pub fn token(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl CoughCategory {
    pub fn token(self) -> &'static str {
        match self {
            CoughCategory::Normal => "normal",
            CoughCategory::Wet => "wet",
            CoughCategory::Whistling => "whistling",
            CoughCategory::Covid => "covid",
        }
    }
}

/// Sex named by exactly one whitespace-delimited word of `directory`, otherwise `None`.
pub fn resolve_sex(directory: &str) -> Option<Sex> {
    let mut matches = SEX_TOKENS
        .iter()
        .filter(|(token, _)| directory.split_whitespace().any(|word| word == *token));
    match (matches.next(), matches.next()) {
        (Some((_, sex)), None) => Some(*sex),
        _ => None,
    }
}

/// Category whose token occurs in `directory`. Zero or several matches are an error.
pub fn resolve_category(directory: &str) -> Result<CoughCategory> {
    let matches: Vec<CoughCategory> = CATEGORY_TOKENS
        .iter()
        .filter(|(token, _)| directory.contains(token))
        .map(|(_, category)| *category)
        .collect();
    match matches.as_slice() {
        [category] => Ok(*category),
        _ => Err(CoughError::LabelResolution {
            directory: directory.to_string(),
            matches: matches.len(),
        }),
    }
}

/// Inverse of the resolvers: `"{sex} {category}"`.
pub fn directory_name(sex: Sex, category: CoughCategory) -> String {
    format!("{} {}", sex.token(), category.token())
}
