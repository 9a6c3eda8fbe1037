//! A small GSUB interpreter for [`FeatureProgram`]s
//!
//! Only what the generated rules use: single substitution, chaining context
//! with one marked glyph, ignore rules and reverse chaining. Used for the
//! `--preview` output and for testing the rules without compiling a font.

use crate::features::ir::{Action, Atom, Direction, FeatureProgram, Lookup, Rule, Slot};
use crate::glyphs::roles::{DigitRole, GlyphTables, SeparatorKind};
use std::collections::{BTreeSet, HashMap};

pub struct Shaper<'a> {
    program: &'a FeatureProgram,
    classes: HashMap<&'a str, &'a [String]>,
}

impl<'a> Shaper<'a> {
    pub fn new(program: &'a FeatureProgram) -> Self {
        let classes = program
            .classes
            .iter()
            .map(|class| (class.name.as_str(), class.glyphs.as_slice()))
            .collect();
        Self { program, classes }
    }

    /// Apply the lookups of the active features, in program order
    pub fn shape(&self, glyphs: &[String], features: &[&str]) -> Vec<String> {
        let active: BTreeSet<&str> = features
            .iter()
            .filter_map(|tag| self.program.feature(tag))
            .flat_map(|feature| feature.lookups.iter().map(String::as_str))
            .collect();

        let mut buffer = glyphs.to_vec();
        for lookup in &self.program.lookups {
            if active.contains(lookup.name.as_str()) {
                self.apply(lookup, &mut buffer);
            }
        }
        buffer
    }

    fn apply(&self, lookup: &Lookup, buffer: &mut [String]) {
        let positions: Vec<usize> = match lookup.direction {
            Direction::Forward => (0..buffer.len()).collect(),
            Direction::Reverse => (0..buffer.len()).rev().collect(),
        };
        for i in positions {
            let Some(rule) = lookup.rules.iter().find(|rule| self.matches(rule, buffer, i)) else {
                continue;
            };
            if let Action::Replace(replacement) = &rule.action {
                if let Some(glyph) = self.substitute(&rule.input, replacement, &buffer[i]) {
                    buffer[i] = glyph;
                }
            }
        }
    }

    fn matches(&self, rule: &Rule, buffer: &[String], i: usize) -> bool {
        if !self.contains(&rule.input, &buffer[i]) {
            return false;
        }
        let backtrack = rule.backtrack.iter().rev().enumerate().all(|(n, slot)| {
            i.checked_sub(n + 1)
                .and_then(|j| buffer.get(j))
                .is_some_and(|glyph| self.contains(slot, glyph))
        });
        let lookahead = rule.lookahead.iter().enumerate().all(|(n, slot)| {
            buffer
                .get(i + 1 + n)
                .is_some_and(|glyph| self.contains(slot, glyph))
        });
        backtrack && lookahead
    }

    fn contains(&self, slot: &Slot, glyph: &str) -> bool {
        slot.0.iter().any(|atom| match atom {
            Atom::Glyph(name) => name == glyph,
            Atom::Class(name) => self
                .classes
                .get(name.as_str())
                .is_some_and(|members| members.iter().any(|m| m == glyph)),
        })
    }

    fn substitute(&self, input: &Slot, replacement: &Slot, glyph: &str) -> Option<String> {
        match (input.0.first()?, replacement.0.first()?) {
            (_, Atom::Glyph(to)) => Some(to.clone()),
            (Atom::Class(from), Atom::Class(to)) => {
                let index = self.classes.get(from.as_str())?.iter().position(|g| g == glyph)?;
                self.classes.get(to.as_str())?.get(index).cloned()
            }
            (Atom::Glyph(_), Atom::Class(to)) => self.classes.get(to.as_str())?.first().cloned(),
        }
    }
}

/// Glyph names for `text`, using `glyph_for_char` for each character.
/// Unmapped characters become `.notdef`.
pub fn text_to_glyphs(text: &str, glyph_for_char: impl Fn(char) -> Option<String>) -> Vec<String> {
    text.chars()
        .map(|ch| glyph_for_char(ch).unwrap_or_else(|| ".notdef".to_string()))
        .collect()
}

/// Render shaped glyphs back as text, showing each group gap as the
/// separator drawn in it (a space for a plain gap).
pub fn visualize(
    glyphs: &[String],
    tables: &GlyphTables,
    char_for_glyph: impl Fn(&str) -> Option<char>,
) -> String {
    let mut roles: HashMap<&str, (DigitRole, usize)> = HashMap::new();
    for (role, class) in &tables.classes {
        for (index, name) in class.glyphs().iter().enumerate() {
            roles.entry(name.as_str()).or_insert((*role, index));
        }
    }

    let separator = |kind: SeparatorKind| match kind {
        SeparatorKind::Space => ' ',
        SeparatorKind::Dot => '.',
        SeparatorKind::Comma => ',',
    };

    let mut out = String::new();
    for glyph in glyphs {
        let Some(&(role, index)) = roles.get(glyph.as_str()) else {
            out.push(char_for_glyph(glyph).unwrap_or('\u{fffd}'));
            continue;
        };
        let digit = role.radix().chars().chars().nth(index).unwrap_or('\u{fffd}');
        match role {
            DigitRole::LeftGroupWithSeparator(kind, _) => {
                out.push(separator(kind));
                out.push(digit);
            }
            DigitRole::RightGroupWithSeparator(kind) => {
                out.push(digit);
                out.push(separator(kind));
            }
            _ => out.push(digit),
        }
    }
    out
}
