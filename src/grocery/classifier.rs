use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregator::AggregatedIngredient;

/// Grocery store section. Every list carries all six, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Produce,
    Dairy,
    MeatPoultry,
    Bakery,
    Pantry,
    Other,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Produce,
        Section::Dairy,
        Section::MeatPoultry,
        Section::Bakery,
        Section::Pantry,
        Section::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Produce => "Produce",
            Section::Dairy => "Dairy",
            Section::MeatPoultry => "Meat/Poultry",
            Section::Bakery => "Bakery",
            Section::Pantry => "Pantry",
            Section::Other => "Other",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PRODUCE_KEYWORDS: &[&str] = &[
    "spinach", "lettuce", "kale", "arugula", "cabbage", "tomato", "onion", "shallot", "garlic",
    "scallion", "leek", "carrot", "celery", "bell pepper", "jalapeno", "jalapeño", "cucumber",
    "zucchini", "squash", "eggplant", "broccoli", "cauliflower", "potato", "mushroom",
    "green bean", "peas", "sweet corn", "corn on the cob", "corn kernel", "avocado", "ginger",
    "cilantro", "parsley", "basil", "mint", "thyme", "rosemary", "dill", "apple", "banana",
    "orange", "lemon", "lime", "berries", "berry", "grape", "mango", "pineapple", "melon",
    "peach", "pear",
];

const PRODUCE_EXCLUDED: &[&str] = &["powder", "corn starch"];

const DAIRY_KEYWORDS: &[&str] = &[
    "milk", "cream", "butter", "cheese", "cheddar", "mozzarella", "parmesan", "feta", "ricotta",
    "yogurt", "yoghurt", "egg",
];

const DAIRY_EXCLUDED: &[&str] = &[
    "peanut butter", "almond butter", "cashew butter", "nut butter", "cocoa butter",
    "coconut milk", "coconut cream", "cream of tartar", "egg noodle",
];

const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "turkey", "duck", "beef", "steak", "pork", "bacon", "sausage", "prosciutto",
    "ham", "meat", "lamb", "veal", "salmon", "tuna", "cod", "tilapia", "fish", "shrimp",
    "prawn", "crab", "lobster", "scallop",
];

const MEAT_EXCLUDED: &[&str] = &["graham", "champagne", "chamomile", "hamburger bun", "fish sauce"];

const BAKERY_KEYWORDS: &[&str] = &[
    "bread", "bun", "dinner roll", "bread roll", "rolls", "bagel", "baguette", "tortilla", "pita",
    "croissant", "muffin",
];

const PANTRY_KEYWORDS: &[&str] = &[
    "flour", "sugar", "salt", "pepper", "oil", "vinegar", "rice", "pasta", "spaghetti",
    "noodle", "bean", "lentil", "chickpea", "stock", "broth", "sauce", "honey", "syrup",
    "baking", "yeast", "vanilla", "cinnamon", "cumin", "paprika", "oregano", "spice", "oats",
    "nut", "almond", "pecan", "cashew", "seed", "canned", "starch", "cornmeal", "powder",
    "cream of tartar",
];

/// A set matches when the name contains one of its keywords and none of its
/// excluded phrases.
struct KeywordSet {
    section: Section,
    keywords: &'static [&'static str],
    excluded: &'static [&'static str],
}

impl KeywordSet {
    fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|keyword| name.contains(keyword))
            && !self.excluded.iter().any(|phrase| name.contains(phrase))
    }
}

/// Evaluation order matters: the first set with a match wins.
const KEYWORD_SETS: &[KeywordSet] = &[
    KeywordSet { section: Section::Produce, keywords: PRODUCE_KEYWORDS, excluded: PRODUCE_EXCLUDED },
    KeywordSet { section: Section::Dairy, keywords: DAIRY_KEYWORDS, excluded: DAIRY_EXCLUDED },
    KeywordSet { section: Section::MeatPoultry, keywords: MEAT_KEYWORDS, excluded: MEAT_EXCLUDED },
    KeywordSet { section: Section::Bakery, keywords: BAKERY_KEYWORDS, excluded: &[] },
    KeywordSet { section: Section::Pantry, keywords: PANTRY_KEYWORDS, excluded: &[] },
];

/// Local section lookup by substring match; `Other` when nothing matches.
pub fn classify(ingredient_name: &str) -> Section {
    let normalized = ingredient_name.to_lowercase();
    KEYWORD_SETS
        .iter()
        .find(|set| set.matches(&normalized))
        .map(|set| set.section)
        .unwrap_or(Section::Other)
}

/// Buckets ingredients by section. Always six entries in canonical order,
/// empty sections included; items keep their input order.
pub fn group_by_section(items: &[AggregatedIngredient]) -> Vec<(Section, Vec<&AggregatedIngredient>)> {
    Section::ALL
        .iter()
        .map(|section| {
            let members = items.iter().filter(|item| classify(&item.name) == *section).collect();
            (*section, members)
        })
        .collect()
}
