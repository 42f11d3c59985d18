//! Category Classification
//!
//! Maps a chain name to one of four business categories using fixed
//! membership lists. Matching is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chains that only sell burgers
pub const BURGER_ONLY: &[&str] = &[
    "Burgerizzr",
    "Johnny Rockets",
    "Five Guys",
    "Salt",
    "Section-B",
    "Fatburger",
];

/// Chains that only sell fried chicken
pub const CHICKEN_ONLY: &[&str] = &["Al Baik", "KyoChon", "Raising Cane's", "Texas Chicken"];

/// Chains with both burgers and fried chicken on the menu
pub const BOTH: &[&str] = &["Herfy", "Kudu", "McDonald's", "Burger King", "Hardee's", "KFC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Burger,
    Chicken,
    Both,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Burger,
        Category::Chicken,
        Category::Both,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Burger => "Burger",
            Category::Chicken => "Chicken",
            Category::Both => "Both",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown category '{}' (expected one of: Burger, Chicken, Both, Other)",
                    s
                )
            })
    }
}

/// Classify a chain by name.
///
/// Lists are checked in priority order: burger-only, chicken-only, both.
/// Anything else is `Other`.
pub fn classify(name: &str) -> Category {
    if BURGER_ONLY.contains(&name) {
        Category::Burger
    } else if CHICKEN_ONLY.contains(&name) {
        Category::Chicken
    } else if BOTH.contains(&name) {
        Category::Both
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_chains() {
        assert_eq!(classify("Al Baik"), Category::Chicken);
        assert_eq!(classify("KFC"), Category::Both);
        assert_eq!(classify("Five Guys"), Category::Burger);
        assert_eq!(classify("Unknown Chain"), Category::Other);
    }

    #[test]
    fn test_every_listed_name_maps_to_its_list() {
        for name in BURGER_ONLY {
            assert_eq!(classify(name), Category::Burger, "{}", name);
        }
        for name in CHICKEN_ONLY {
            assert_eq!(classify(name), Category::Chicken, "{}", name);
        }
        for name in BOTH {
            assert_eq!(classify(name), Category::Both, "{}", name);
        }
    }

    #[test]
    fn test_lists_are_disjoint() {
        for name in BURGER_ONLY {
            assert!(!CHICKEN_ONLY.contains(name) && !BOTH.contains(name), "{}", name);
        }
        for name in CHICKEN_ONLY {
            assert!(!BURGER_ONLY.contains(name) && !BOTH.contains(name), "{}", name);
        }
        for name in BOTH {
            assert!(!BURGER_ONLY.contains(name) && !CHICKEN_ONLY.contains(name), "{}", name);
        }
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(classify("kfc"), Category::Other);
        assert_eq!(classify(" KFC"), Category::Other);
        assert_eq!(classify("Al  Baik"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_deterministic() {
        for name in ["Herfy", "Salt", "Nando's", "Texas Chicken", "عربي"] {
            assert_eq!(classify(name), classify(name));
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        assert!("burger".parse::<Category>().is_err());
    }
}
