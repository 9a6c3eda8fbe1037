//! Typed feature program
//!
//! The compiler builds this structure, the printer renders it as feature file
//! text and the shaper in [`super::simulate`] executes it. Rules that refer to
//! classes the font does not have are dropped here, before any text exists.

use std::collections::BTreeSet;
use tracing::debug;

/// One entry of a glyph slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// A named glyph class
    Class(String),
    /// A single glyph
    Glyph(String),
}

/// A position in a rule, matching any of its atoms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot(pub Vec<Atom>);

impl Slot {
    pub fn class(name: impl Into<String>) -> Self {
        Slot(vec![Atom::Class(name.into())])
    }

    pub fn glyph(name: impl Into<String>) -> Self {
        Slot(vec![Atom::Glyph(name.into())])
    }

    /// Union of several classes
    pub fn any<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Slot(names.into_iter().map(|n| Atom::Class(n.into())).collect())
    }

    /// Drop atoms naming undefined classes. `None` when nothing is left.
    fn prune(&self, defined: &BTreeSet<String>) -> Option<Slot> {
        let atoms: Vec<Atom> = self
            .0
            .iter()
            .filter(|atom| match atom {
                Atom::Class(name) => defined.contains(name),
                Atom::Glyph(_) => true,
            })
            .cloned()
            .collect();
        (!atoms.is_empty()).then_some(Slot(atoms))
    }

    fn is_single(&self) -> bool {
        self.0.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Replace(Slot),
    /// Stop the lookup at this position without substituting
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Left context, in text order
    pub backtrack: Vec<Slot>,
    pub input: Slot,
    pub lookahead: Vec<Slot>,
    pub action: Action,
    /// Written with a marked input (`x'`), i.e. a chaining rule
    pub contextual: bool,
}

impl Rule {
    /// Context-free substitution
    pub fn single(input: Slot, replacement: Slot) -> Self {
        Self {
            backtrack: Vec::new(),
            input,
            lookahead: Vec::new(),
            action: Action::Replace(replacement),
            contextual: false,
        }
    }

    pub fn context(
        backtrack: Vec<Slot>,
        input: Slot,
        lookahead: Vec<Slot>,
        replacement: Slot,
    ) -> Self {
        Self {
            backtrack,
            input,
            lookahead,
            action: Action::Replace(replacement),
            contextual: true,
        }
    }

    pub fn ignore(backtrack: Vec<Slot>, input: Slot, lookahead: Vec<Slot>) -> Self {
        Self {
            backtrack,
            input,
            lookahead,
            action: Action::Ignore,
            contextual: true,
        }
    }

    /// The rule restricted to defined classes, or `None` if any position
    /// would be left empty or the substitution is no longer one-to-one
    fn prune(&self, defined: &BTreeSet<String>) -> Option<Rule> {
        let backtrack = self
            .backtrack
            .iter()
            .map(|slot| slot.prune(defined))
            .collect::<Option<Vec<_>>>()?;
        let lookahead = self
            .lookahead
            .iter()
            .map(|slot| slot.prune(defined))
            .collect::<Option<Vec<_>>>()?;
        let input = self.input.prune(defined)?;
        let action = match &self.action {
            Action::Replace(replacement) => {
                let replacement = replacement.prune(defined)?;
                if !input.is_single() || !replacement.is_single() {
                    return None;
                }
                Action::Replace(replacement)
            }
            Action::Ignore => Action::Ignore,
        };
        Some(Rule {
            backtrack,
            input,
            lookahead,
            action,
            contextual: self.contextual,
        })
    }
}

/// Scan direction of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right; left context sees rewritten glyphs
    Forward,
    /// Right to left (reverse chaining); right context sees rewritten glyphs
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub name: String,
    pub direction: Direction,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub glyphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub tag: String,
    /// Lookup names; execution order is the program's lookup order
    pub lookups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureProgram {
    pub language_systems: Vec<(String, String)>,
    pub classes: Vec<ClassDef>,
    pub lookups: Vec<Lookup>,
    pub features: Vec<Feature>,
}

impl FeatureProgram {
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Lookup> {
        self.lookups.iter().find(|l| l.name == name)
    }

    pub fn feature(&self, tag: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.tag == tag)
    }

    pub fn lookup_names(&self) -> Vec<&str> {
        self.lookups.iter().map(|l| l.name.as_str()).collect()
    }
}

/// Assembles a [`FeatureProgram`], omitting everything that would reference
/// a class the font does not provide
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: FeatureProgram,
    defined: BTreeSet<String>,
}

impl ProgramBuilder {
    pub fn new(language_systems: &[(&str, &str)]) -> Self {
        let mut builder = Self::default();
        builder.program.language_systems = language_systems
            .iter()
            .map(|(script, lang)| (script.to_string(), lang.to_string()))
            .collect();
        builder
    }

    /// Define a class. Empty classes are not defined at all.
    pub fn class(&mut self, name: impl Into<String>, glyphs: Vec<String>) {
        let name = name.into();
        if glyphs.is_empty() || self.defined.contains(&name) {
            return;
        }
        self.defined.insert(name.clone());
        self.program.classes.push(ClassDef { name, glyphs });
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// Add a lookup with the rules whose classes exist. A lookup left
    /// without rules is not emitted.
    pub fn lookup(&mut self, name: &str, direction: Direction, rules: Vec<Rule>) {
        let total = rules.len();
        let rules: Vec<Rule> = rules
            .iter()
            .filter_map(|rule| rule.prune(&self.defined))
            .collect();
        if rules.len() != total {
            debug!(lookup = name, omitted = total - rules.len(), "omitted rules with undefined classes");
        }
        if rules.is_empty() {
            debug!(lookup = name, "lookup has no rules, not emitted");
            return;
        }
        self.program.lookups.push(Lookup {
            name: name.to_string(),
            direction,
            rules,
        });
    }

    /// Add a feature over the lookups that were emitted
    pub fn feature(&mut self, tag: &str, lookups: &[&str]) {
        let lookups: Vec<String> = lookups
            .iter()
            .filter(|name| self.program.lookup(name).is_some())
            .map(|name| name.to_string())
            .collect();
        if lookups.is_empty() {
            debug!(feature = tag, "feature has no lookups, not emitted");
            return;
        }
        self.program.features.push(Feature {
            tag: tag.to_string(),
            lookups,
        });
    }

    pub fn finish(self) -> FeatureProgram {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_with_undefined_classes_are_omitted() {
        let mut builder = ProgramBuilder::new(&[("DFLT", "dflt")]);
        builder.class("digits", vec!["zero".into(), "one".into()]);
        builder.class("cap_l", vec!["cap_l_d0".into(), "cap_l_d1".into()]);
        builder.lookup(
            "REFLOW",
            Direction::Forward,
            vec![
                Rule::single(Slot::class("cap_l"), Slot::class("digits")),
                Rule::single(Slot::class("ph3_l"), Slot::class("digits")),
            ],
        );
        let program = builder.finish();
        assert_eq!(program.lookup("REFLOW").unwrap().rules.len(), 1);
    }

    #[test]
    fn test_union_keeps_defined_members() {
        let mut builder = ProgramBuilder::new(&[]);
        builder.class("point", vec!["period".into()]);
        builder.class("cap_r", vec!["cap_r_d0".into()]);
        builder.class("ph1_r", vec!["ph1_r_d0".into()]);
        builder.lookup(
            "GROUP",
            Direction::Forward,
            vec![Rule::context(
                vec![Slot::any(["point", "decimal_comma"])],
                Slot::class("cap_r"),
                vec![],
                Slot::class("ph1_r"),
            )],
        );
        let program = builder.finish();
        let rule = &program.lookup("GROUP").unwrap().rules[0];
        assert_eq!(rule.backtrack, vec![Slot::class("point")]);
    }

    #[test]
    fn test_empty_lookups_and_features_are_dropped() {
        let mut builder = ProgramBuilder::new(&[]);
        builder.class("digits", vec!["zero".into()]);
        builder.lookup(
            "SEPARATE_DOTS",
            Direction::Forward,
            vec![Rule::single(Slot::class("sep_space_l"), Slot::class("sep_dot_l"))],
        );
        builder.feature("ss03", &["SEPARATE_DOTS"]);
        let program = builder.finish();
        assert!(program.lookups.is_empty());
        assert!(program.features.is_empty());
    }

    #[test]
    fn test_empty_class_is_undefined() {
        let mut builder = ProgramBuilder::new(&[]);
        builder.class("hex_prefix", vec![]);
        assert!(!builder.is_defined("hex_prefix"));
    }
}
