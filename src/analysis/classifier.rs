//! Document classifier
//!
//! Assigns each MOC a structural [`MocType`] and a topical [`Category`] from
//! its name and path. Both decisions are ordered rule tables evaluated
//! first-match-wins, so every rule can be tested and reordered on its own.

use crate::graph::{Category, MocType};

/// What a classification rule looks at
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    /// Lowercased corpus-relative path
    pub path: &'a str,
    /// Lowercased basename
    pub basename: &'a str,
    /// Raw content (unused by the built-in rules)
    pub content: &'a str,
}

/// A single first-match-wins rule
#[derive(Clone, Copy)]
pub struct Rule<T: Copy> {
    pub name: &'static str,
    pub matches: fn(&ClassifyInput<'_>) -> bool,
    pub outcome: T,
}

impl<T: Copy + std::fmt::Debug> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<T: Copy> Rule<T> {
    pub fn applies(&self, input: &ClassifyInput<'_>) -> bool {
        (self.matches)(input)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn is_system_doc(input: &ClassifyInput<'_>) -> bool {
    contains_any(input.basename, &["home", "atlas", "index"]) || input.path.contains("system")
}

fn is_shallow_main(input: &ClassifyInput<'_>) -> bool {
    input.path.split('/').count() <= 2 && !input.basename.contains("sub")
}

fn always(_: &ClassifyInput<'_>) -> bool {
    true
}

fn is_creative(input: &ClassifyInput<'_>) -> bool {
    contains_any(input.basename, &["writing", "creative"])
}

fn is_knowledge(input: &ClassifyInput<'_>) -> bool {
    contains_any(input.basename, &["pkm", "knowledge"])
}

fn is_personal(input: &ClassifyInput<'_>) -> bool {
    contains_any(input.basename, &["people", "personal"])
}

fn is_system_topic(input: &ClassifyInput<'_>) -> bool {
    contains_any(input.basename, &["system", "home"])
}

/// Structural type rules, in priority order
pub const TYPE_RULES: &[Rule<MocType>] = &[
    Rule {
        name: "system-name-or-path",
        matches: is_system_doc,
        outcome: MocType::System,
    },
    Rule {
        name: "shallow-path",
        matches: is_shallow_main,
        outcome: MocType::Main,
    },
    Rule {
        name: "fallback",
        matches: always,
        outcome: MocType::Sub,
    },
];

/// Topical category rules, in priority order
pub const CATEGORY_RULES: &[Rule<Category>] = &[
    Rule {
        name: "creative",
        matches: is_creative,
        outcome: Category::Creative,
    },
    Rule {
        name: "knowledge",
        matches: is_knowledge,
        outcome: Category::Knowledge,
    },
    Rule {
        name: "personal",
        matches: is_personal,
        outcome: Category::Personal,
    },
    Rule {
        name: "system",
        matches: is_system_topic,
        outcome: Category::System,
    },
];

/// Evaluates the type and category rule tables
#[derive(Debug, Clone)]
pub struct Classifier {
    type_rules: Vec<Rule<MocType>>,
    category_rules: Vec<Rule<Category>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// Classifier with the built-in rule tables
    pub fn new() -> Self {
        Self {
            type_rules: TYPE_RULES.to_vec(),
            category_rules: CATEGORY_RULES.to_vec(),
        }
    }

    /// Insert a type rule ahead of the built-in ones
    pub fn with_type_rule(mut self, rule: Rule<MocType>) -> Self {
        self.type_rules.insert(0, rule);
        self
    }

    /// Insert a category rule ahead of the built-in ones
    pub fn with_category_rule(mut self, rule: Rule<Category>) -> Self {
        self.category_rules.insert(0, rule);
        self
    }

    /// Classify a document. Total: always yields a type and a category.
    pub fn classify(&self, path: &str, basename: &str, content: &str) -> (MocType, Category) {
        let path = path.to_lowercase();
        let basename = basename.to_lowercase();
        let input = ClassifyInput {
            path: &path,
            basename: &basename,
            content,
        };

        let moc_type = first_match(&self.type_rules, &input).unwrap_or(MocType::Sub);
        let category = first_match(&self.category_rules, &input).unwrap_or(Category::General);
        (moc_type, category)
    }
}

fn first_match<T: Copy>(rules: &[Rule<T>], input: &ClassifyInput<'_>) -> Option<T> {
    rules.iter().find(|r| r.applies(input)).map(|r| r.outcome)
}

/// Classify with the built-in rules
pub fn classify(path: &str, basename: &str, content: &str) -> (MocType, Category) {
    Classifier::new().classify(path, basename, content)
}
