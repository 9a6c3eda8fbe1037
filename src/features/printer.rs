//! Feature file text for a [`FeatureProgram`]

use crate::features::ir::{Action, Atom, Direction, FeatureProgram, Lookup, Rule, Slot};
use std::fmt::Write;

const INDENT: &str = "    ";

/// `languagesystem` statements
pub fn render_language_systems(program: &FeatureProgram) -> String {
    let mut out = String::new();
    for (script, language) in &program.language_systems {
        let _ = writeln!(out, "languagesystem {script} {language};");
    }
    out
}

/// Classes, lookups and features, without language systems
pub fn render_body(program: &FeatureProgram) -> String {
    let mut out = String::new();

    for class in &program.classes {
        let _ = writeln!(out, "@{} = [{}];", class.name, class.glyphs.join(" "));
    }

    for lookup in &program.lookups {
        out.push('\n');
        render_lookup(&mut out, lookup);
    }

    for feature in &program.features {
        out.push('\n');
        let _ = writeln!(out, "feature {} {{", feature.tag);
        for lookup in &feature.lookups {
            let _ = writeln!(out, "{INDENT}lookup {lookup};");
        }
        let _ = writeln!(out, "}} {};", feature.tag);
    }
    out
}

/// The whole program as a standalone feature file
pub fn render(program: &FeatureProgram) -> String {
    let systems = render_language_systems(program);
    if systems.is_empty() {
        return render_body(program);
    }
    format!("{systems}\n{}", render_body(program))
}

fn render_lookup(out: &mut String, lookup: &Lookup) {
    let _ = writeln!(out, "lookup {} {{", lookup.name);
    for rule in &lookup.rules {
        let _ = writeln!(out, "{INDENT}{};", rule_text(rule, lookup.direction));
    }
    let _ = writeln!(out, "}} {};", lookup.name);
}

fn rule_text(rule: &Rule, direction: Direction) -> String {
    let keyword = match (&rule.action, direction) {
        (Action::Ignore, Direction::Forward) => "ignore sub",
        (Action::Ignore, Direction::Reverse) => "ignore rsub",
        (Action::Replace(_), Direction::Forward) => "sub",
        (Action::Replace(_), Direction::Reverse) => "rsub",
    };

    let mut parts = vec![keyword.to_string()];
    parts.extend(rule.backtrack.iter().map(slot_text));
    let input = slot_text(&rule.input);
    if rule.contextual || direction == Direction::Reverse {
        parts.push(format!("{input}'"));
    } else {
        parts.push(input);
    }
    parts.extend(rule.lookahead.iter().map(slot_text));
    if let Action::Replace(replacement) = &rule.action {
        parts.push("by".to_string());
        parts.push(slot_text(replacement));
    }
    parts.join(" ")
}

fn atom_text(atom: &Atom) -> String {
    match atom {
        Atom::Class(name) => format!("@{name}"),
        Atom::Glyph(name) => name.clone(),
    }
}

fn slot_text(slot: &Slot) -> String {
    match slot.0.as_slice() {
        [single] => atom_text(single),
        atoms => {
            let inner: Vec<String> = atoms.iter().map(atom_text).collect();
            format!("[{}]", inner.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ir::ProgramBuilder;

    fn program() -> FeatureProgram {
        let mut builder = ProgramBuilder::new(&[("DFLT", "dflt"), ("latn", "dflt")]);
        builder.class("digits", vec!["zero".into(), "one".into()]);
        builder.class("cap_l", vec!["cap_l_d0".into(), "cap_l_d1".into()]);
        builder.class("cap_r", vec!["cap_r_d0".into(), "cap_r_d1".into()]);
        builder.class("ph1_l", vec!["ph1_l_d0".into(), "ph1_l_d1".into()]);
        builder.class("point", vec!["period".into()]);
        builder.lookup(
            "CAPTURE",
            Direction::Forward,
            vec![
                Rule::context(
                    vec![Slot::class("cap_l"), Slot::class("point")],
                    Slot::class("digits"),
                    vec![],
                    Slot::class("cap_r"),
                ),
                Rule::ignore(
                    vec![Slot::any(["cap_l", "cap_r"]), Slot::glyph("cap_l_d0")],
                    Slot::class("digits"),
                    vec![],
                ),
                Rule::context(vec![], Slot::class("digits"), vec![], Slot::class("cap_l")),
            ],
        );
        builder.lookup(
            "GROUP_DIGITS",
            Direction::Reverse,
            vec![Rule::context(vec![], Slot::class("cap_l"), vec![], Slot::class("ph1_l"))],
        );
        builder.lookup(
            "REFLOW_DIGITS",
            Direction::Forward,
            vec![Rule::single(Slot::class("cap_l"), Slot::class("digits"))],
        );
        builder.feature("calt", &["CAPTURE", "GROUP_DIGITS", "REFLOW_DIGITS"]);
        builder.finish()
    }

    #[test]
    fn test_render_statements() {
        let text = render(&program());
        assert!(text.starts_with("languagesystem DFLT dflt;\nlanguagesystem latn dflt;\n"));
        assert!(text.contains("@digits = [zero one];"));
        assert!(text.contains("    sub @cap_l @point @digits' by @cap_r;\n"));
        assert!(text.contains("    ignore sub [@cap_l @cap_r] cap_l_d0 @digits';\n"));
        assert!(text.contains("    sub @digits' by @cap_l;\n"));
        assert!(text.contains("    rsub @cap_l' by @ph1_l;\n"));
        assert!(text.contains("    sub @cap_l by @digits;\n"));
        assert!(text.contains("feature calt {\n    lookup CAPTURE;\n    lookup GROUP_DIGITS;\n    lookup REFLOW_DIGITS;\n} calt;\n"));
    }

    #[test]
    fn test_lookups_before_features() {
        let text = render(&program());
        let lookup = text.find("} REFLOW_DIGITS;").unwrap();
        let feature = text.find("feature calt").unwrap();
        let class = text.find("@cap_l = ").unwrap();
        assert!(class < lookup && lookup < feature);
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(&program()), render(&program()));
    }
}
