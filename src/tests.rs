#![allow(clippy::assertions_on_constants)]

/// In-memory fonts shared by the unit tests
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::ufo::UfoFont;
    use crate::glyphs::roles::{DigitClass, DigitRole, GlyphTables, Radix, SeparatorKind};
    use norad::{Contour, ContourPoint, Font, Glyph, PointType};

    pub const DIGIT_WIDTH: f64 = 600.0;
    pub const COMMA_WIDTH: f64 = 250.0;

    const DIGIT_NAMES: [&str; 10] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    ];

    fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        let points = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
            .into_iter()
            .map(|(x, y)| ContourPoint::new(x, y, PointType::Line, false, None, None))
            .collect();
        Contour::new(points, None)
    }

    fn glyph(name: &str, ch: char, width: f64, ink: Option<(f64, f64, f64, f64)>) -> Glyph {
        let mut glyph = Glyph::new(name);
        glyph.width = width;
        glyph.codepoints.insert(ch);
        if let Some((x0, y0, x1, y1)) = ink {
            glyph.contours.push(rectangle(x0, y0, x1, y1));
        }
        glyph
    }

    fn build(punctuation_width: f64, keep: impl Fn(char) -> bool) -> UfoFont {
        let mut font = Font::new();
        font.font_info.family_name = Some("Test Sans".to_string());
        font.font_info.style_name = Some("Regular".to_string());
        font.font_info.postscript_font_name = Some("TestSans-Regular".to_string());

        let mut glyphs = Vec::new();
        for (value, name) in DIGIT_NAMES.iter().enumerate() {
            let ch = char::from_digit(value as u32, 10).unwrap_or('0');
            glyphs.push(glyph(name, ch, DIGIT_WIDTH, Some((100.0, 0.0, 500.0, 700.0))));
        }
        let dot_ink = Some((80.0, 0.0, 170.0, 90.0));
        glyphs.push(glyph("period", '.', punctuation_width, dot_ink));
        glyphs.push(glyph("comma", ',', punctuation_width, Some((80.0, -120.0, 170.0, 90.0))));
        glyphs.push(glyph("space", ' ', punctuation_width, None));
        for ch in "xXabcdefABCDEF".chars() {
            glyphs.push(glyph(&ch.to_string(), ch, DIGIT_WIDTH, Some((60.0, 0.0, 540.0, 500.0))));
        }

        let layer = font.default_layer_mut();
        for glyph in glyphs {
            if !glyph.codepoints.iter().all(|cp| keep(cp)) {
                continue;
            }
            layer.insert_glyph(glyph);
        }
        UfoFont::new(font, "synthetic")
    }

    /// Proportional font: digits, `.`, `,`, space, `x`, `X` and hex letters
    pub fn synthetic_font() -> UfoFont {
        build(COMMA_WIDTH, |_| true)
    }

    /// Digits, `.`, `,`, space, `x` and `X` only
    pub fn minimal_font() -> UfoFont {
        build(COMMA_WIDTH, |ch| !ch.is_ascii_hexdigit() || ch.is_ascii_digit())
    }

    /// Punctuation as wide as the digits
    pub fn monospace_font() -> UfoFont {
        build(DIGIT_WIDTH, |_| true)
    }

    pub fn font_without(ch: char) -> UfoFont {
        build(COMMA_WIDTH, move |cp| cp != ch)
    }

    /// Glyph names the way the synthetic fonts name them
    pub fn glyph_for_char(ch: char) -> Option<String> {
        let name = match ch {
            '0'..='9' => DIGIT_NAMES[ch.to_digit(10)? as usize].to_string(),
            '.' => "period".to_string(),
            ',' => "comma".to_string(),
            ' ' => "space".to_string(),
            _ => ch.to_string(),
        };
        Some(name)
    }

    pub fn char_for_glyph(name: &str) -> Option<char> {
        match name {
            "period" => Some('.'),
            "comma" => Some(','),
            "space" => Some(' '),
            _ => {
                if let Some(value) = DIGIT_NAMES.iter().position(|d| *d == name) {
                    return char::from_digit(value as u32, 10);
                }
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(ch),
                    _ => None,
                }
            }
        }
    }

    /// Tables as the variant factory produces them for the synthetic font,
    /// without building any glyphs
    pub fn glyph_tables(hex: bool) -> GlyphTables {
        let mut tables = GlyphTables {
            point: Some("period".to_string()),
            comma: Some("comma".to_string()),
            ..GlyphTables::default()
        };
        let mut radices = vec![Radix::Decimal];
        if hex {
            radices.extend([Radix::Hex, Radix::HexUpper]);
            tables.hex_prefix = vec!["x".to_string(), "X".to_string()];
        }
        let separators = [SeparatorKind::Space, SeparatorKind::Comma, SeparatorKind::Dot];
        for radix in radices {
            let base: Vec<String> = radix.chars().chars().filter_map(glyph_for_char).collect();
            if let Some(class) = DigitClass::new(radix, base) {
                tables.classes.insert(DigitRole::Plain(radix), class);
            }
            for role in DigitRole::roles_for(radix, &separators) {
                tables.classes.insert(role, DigitClass::for_role(role));
            }
        }
        tables
    }
}

#[cfg(test)]
mod ufo_tests {
    use crate::data::ufo::{self, FontEditor, UfoFont};

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Test.ufo");
        super::fixtures::synthetic_font().save(&path).unwrap();

        let font = ufo::load_ufo_from_path(&path).unwrap();
        let font = UfoFont::new(font, "reloaded");
        assert_eq!(font.glyph_for_char('5').as_deref(), Some("five"));
        assert_eq!(font.info().family_name.as_deref(), Some("Test Sans"));
    }

    #[test]
    #[ignore = "Requires test UFO file to be provided via TEST_UFO_PATH"]
    fn test_load_ufo_from_path() {
        let test_path =
            std::env::var("TEST_UFO_PATH").unwrap_or_else(|_| "path/to/test.ufo".to_string());

        if !std::path::Path::new(&test_path).exists() {
            println!("Test UFO not found at {}, skipping test", test_path);
            return;
        }

        let font = ufo::load_ufo_from_path(&test_path).expect("Failed to load UFO file");
        assert!(font.font_info.family_name.is_some(), "Should have family name");
    }
}
