//! Font renaming and output file names
//!
//! Patched fonts get a new family so they install beside the original. With
//! the detailed style the suffix also encodes the options used, so operating
//! system font caches never confuse two variants.

use crate::core::settings::{GroupingConfig, RenameStyle};
use norad::FontInfo;
use rand::Rng;

const PROJECT: &str = "Numderline";

/// Text appended to the display names and the PostScript name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSuffix {
    /// e.g. ` with Numderline G250 Mono`
    pub display: String,
    /// e.g. `WithNumderlineG250Mono`
    pub postscript: String,
}

impl NameSuffix {
    /// Suffix for a run, or `None` when renaming is off.
    ///
    /// `gap` and `squish_x` are the resolved values. Only annotated runs carry
    /// a random tag; otherwise the same options always give the same name.
    pub fn for_config(config: &GroupingConfig, gap: f64, squish_x: f64) -> Option<Self> {
        let mut tokens = Vec::new();
        match config.rename {
            RenameStyle::Off => return None,
            RenameStyle::Simple => {}
            RenameStyle::Detailed => {
                tokens = option_tokens(config, gap, squish_x);
                if config.debug_annotate {
                    tokens.push(format!("Dbg{}", debug_tag()));
                }
            }
        }

        let mut display = format!(" with {PROJECT}");
        let mut postscript = format!("With{PROJECT}");
        for token in &tokens {
            display.push(' ');
            display.push_str(token);
            postscript.push_str(&postscript_safe(token));
        }
        Some(Self {
            display,
            postscript,
        })
    }
}

/// Deterministic description of the options that change glyph shapes
pub fn option_tokens(config: &GroupingConfig, gap: f64, squish_x: f64) -> Vec<String> {
    let mut tokens = vec![format!("G{}", compact(gap))];
    if config.monospace {
        tokens.push("Mono".to_string());
    }
    if squish_x != 1.0 || config.squish_y != 1.0 {
        tokens.push(format!("S{}x{}", compact(squish_x), compact(config.squish_y)));
    }
    if config.squish_all {
        tokens.push("All".to_string());
    }
    if !config.hex {
        tokens.push("Dec".to_string());
    }
    tokens
}

fn debug_tag() -> String {
    format!("{:04x}", rand::thread_rng().gen::<u16>())
}

/// Shortest readable form: integers without a fraction, else two decimals
fn compact(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn postscript_safe(token: &str) -> String {
    token
        .chars()
        .filter_map(|ch| match ch {
            '.' => Some('p'),
            '-' => Some('m'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Full name as `fontc` would derive it
pub fn full_name(info: &FontInfo) -> String {
    if let Some(full) = info.postscript_full_name.as_deref() {
        return full.to_string();
    }
    let family = info.family_name.as_deref().unwrap_or("Untitled");
    match info.style_name.as_deref() {
        Some(style) if !style.is_empty() => format!("{family} {style}"),
        _ => family.to_string(),
    }
}

/// Insert the suffix after the family part of a PostScript name:
/// `Font-Bold` becomes `FontWithNumderline-Bold`
pub fn postscript_name(base: &str, suffix: &str) -> String {
    match base.split_once('-') {
        Some((family, style)) => format!("{family}{suffix}-{style}"),
        None => format!("{base}{suffix}"),
    }
}

/// Apply the suffix to every name record the UFO carries. Returns the new
/// full name.
pub fn rename(info: &mut FontInfo, suffix: &NameSuffix) -> String {
    let full = format!("{}{}", full_name(info), suffix.display);
    let base_family = info.family_name.clone().unwrap_or_else(|| "Untitled".to_string());

    if let Some(preferred) = info.open_type_name_preferred_family_name.as_mut() {
        preferred.push_str(&suffix.display);
    }
    if let Some(style_map) = info.style_map_family_name.as_mut() {
        style_map.push_str(&suffix.display);
    }
    let postscript = info
        .postscript_font_name
        .clone()
        .unwrap_or_else(|| family_to_postscript(&base_family));
    info.postscript_font_name = Some(postscript_name(&postscript, &suffix.postscript));

    info.family_name = Some(format!("{base_family}{}", suffix.display));
    // Pinned so the compiled font carries the same full name as the output file
    info.postscript_full_name = Some(full.clone());
    info.open_type_name_compatible_full_name = Some(full.clone());
    full
}

fn family_to_postscript(family: &str) -> String {
    family.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// File name for the patched font, with the reserved-name substitutions
/// applied. Reserved font names may not appear in modified versions.
pub fn output_file_name(full_name: &str, reserved: &[(String, String)], extension: &str) -> String {
    let mut name = full_name.to_string();
    for (from, to) in reserved {
        if !from.is_empty() {
            name = name.replace(from.as_str(), to);
        }
    }
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    format!("{name}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> FontInfo {
        let mut info = FontInfo::default();
        info.family_name = Some("Source Code Pro".to_string());
        info.style_name = Some("Bold".to_string());
        info.postscript_font_name = Some("SourceCodePro-Bold".to_string());
        info
    }

    #[test]
    fn test_simple_rename() {
        let config = GroupingConfig::legacy();
        let suffix = NameSuffix::for_config(&config, 250.0, 1.0).unwrap();
        let mut info = info();
        let full = rename(&mut info, &suffix);

        assert_eq!(full, "Source Code Pro Bold with Numderline");
        assert_eq!(info.family_name.as_deref(), Some("Source Code Pro with Numderline"));
        assert_eq!(
            info.postscript_font_name.as_deref(),
            Some("SourceCodeProWithNumderline-Bold")
        );
        assert_eq!(
            info.open_type_name_compatible_full_name.as_deref(),
            Some("Source Code Pro Bold with Numderline")
        );
    }

    #[test]
    fn test_renamed_full_name_matches_font() {
        let config = GroupingConfig::legacy();
        let suffix = NameSuffix::for_config(&config, 250.0, 1.0).unwrap();
        let mut info = FontInfo::default();
        info.family_name = Some("Test Sans".to_string());
        info.style_name = Some("Regular".to_string());

        let full = rename(&mut info, &suffix);
        assert_eq!(full, "Test Sans Regular with Numderline");
        assert_eq!(full_name(&info), full);
        assert_eq!(info.postscript_full_name.as_deref(), Some(full.as_str()));
    }

    #[test]
    fn test_detailed_rename_is_deterministic() {
        let config = GroupingConfig {
            monospace: true,
            ..GroupingConfig::default()
        };
        let first = NameSuffix::for_config(&config, 200.0, 0.9).unwrap();
        let second = NameSuffix::for_config(&config, 200.0, 0.9).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.display, " with Numderline G200 Mono S0.9x1");
        assert_eq!(first.postscript, "WithNumderlineG200MonoS0p9x1");
    }

    #[test]
    fn test_debug_rename_is_tagged() {
        let config = GroupingConfig {
            debug_annotate: true,
            ..GroupingConfig::default()
        };
        let suffix = NameSuffix::for_config(&config, -120.5, 1.0).unwrap();
        assert!(suffix.display.starts_with(" with Numderline G-120.5 Dbg"));
        assert!(suffix.postscript.starts_with("WithNumderlineGm120p5Dbg"));
    }

    #[test]
    fn test_rename_off() {
        let config = GroupingConfig {
            rename: RenameStyle::Off,
            ..GroupingConfig::default()
        };
        assert!(NameSuffix::for_config(&config, 250.0, 1.0).is_none());
    }

    #[test]
    fn test_postscript_name_without_style() {
        assert_eq!(postscript_name("Hack", "WithNumderline"), "HackWithNumderline");
        assert_eq!(
            postscript_name("Fira-Mono-Bold", "WithNumderline"),
            "FiraWithNumderline-Mono-Bold"
        );
    }

    #[test]
    fn test_output_name_substitution() {
        let reserved = vec![("Source".to_string(), "Sauce".to_string())];
        assert_eq!(
            output_file_name("Source Code Pro Bold with Numderline", &reserved, "ttf"),
            "Sauce Code Pro Bold with Numderline.ttf"
        );
        assert_eq!(output_file_name("A/B", &[], "ufo"), "A-B.ufo");
    }
}
