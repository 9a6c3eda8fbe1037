//! UFO file I/O operations
//!
//! The patcher never touches norad types outside this module: glyph work goes
//! through the [`FontEditor`] capability trait so the factory and pipeline can
//! be exercised on in-memory fonts.

use crate::core::errors::{BuildError, BuildResult};
use kurbo::{Affine, Point};
use norad::designspace::DesignSpaceDocument;
use norad::Font;
use std::path::{Path, PathBuf};

/// Operations the patcher needs from a font editing engine
pub trait FontEditor {
    /// Human readable name used in error messages
    fn label(&self) -> &str;

    fn contains_glyph(&self, name: &str) -> bool;

    /// Name of the glyph mapped to `ch`, if any
    fn glyph_for_char(&self, ch: char) -> Option<String>;

    fn width(&self, name: &str) -> Option<f64>;

    /// Copy outline and metrics of `source` into a new, unencoded glyph
    fn clone_glyph(&mut self, source: &str, new_name: &str) -> BuildResult<()>;

    fn set_width(&mut self, name: &str, width: f64) -> BuildResult<()>;

    /// Apply `affine` to the glyph's outline, components and anchors
    fn transform(&mut self, name: &str, affine: Affine) -> BuildResult<()>;

    /// Append a transformed copy of `source`'s outline to `target`
    fn overlay(&mut self, target: &str, source: &str, affine: Affine) -> BuildResult<()>;

    /// Horizontal extent of the glyph's contour points
    fn ink_extent(&self, name: &str) -> Option<(f64, f64)>;

    fn feature_text(&self) -> &str;

    fn set_feature_text(&mut self, text: String);
}

/// One font source inside an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    pub path: PathBuf,
    /// Where the resource was listed, for log messages
    pub origin: PathBuf,
}

/// Enumerate the font resources of an input path.
///
/// A `.ufo` directory is a single resource; a `.designspace` contributes one
/// resource per distinct source UFO.
pub fn resources_in(path: &Path) -> BuildResult<Vec<FontResource>> {
    let is_designspace = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("designspace"));

    if is_designspace {
        let document =
            DesignSpaceDocument::load(path).map_err(|e| BuildError::load(path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut resources: Vec<FontResource> = Vec::new();
        for source in &document.sources {
            let source_path = base.join(&source.filename);
            if resources.iter().any(|r| r.path == source_path) {
                continue;
            }
            resources.push(FontResource {
                path: source_path,
                origin: path.to_path_buf(),
            });
        }
        if resources.is_empty() {
            return Err(BuildError::load(path, "designspace lists no sources"));
        }
        Ok(resources)
    } else if path.is_dir() {
        Ok(vec![FontResource {
            path: path.to_path_buf(),
            origin: path.to_path_buf(),
        }])
    } else {
        Err(BuildError::load(
            path,
            "expected a .ufo directory or a .designspace file",
        ))
    }
}

/// Load a UFO font file from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> BuildResult<Font> {
    let path = path.as_ref();
    Font::load(path).map_err(|e| BuildError::load(path, e))
}

/// [`FontEditor`] over a norad font, editing its default layer
pub struct UfoFont {
    font: Font,
    label: String,
}

impl UfoFont {
    pub fn new(font: Font, label: impl Into<String>) -> Self {
        Self {
            font,
            label: label.into(),
        }
    }

    pub fn open(resource: &FontResource) -> BuildResult<Self> {
        let font = load_ufo_from_path(&resource.path)?;
        Ok(Self::new(font, resource.path.display().to_string()))
    }

    pub fn info(&self) -> &norad::FontInfo {
        &self.font.font_info
    }

    pub fn info_mut(&mut self) -> &mut norad::FontInfo {
        &mut self.font.font_info
    }

    pub fn glyph(&self, name: &str) -> Option<&norad::Glyph> {
        self.font.default_layer().get_glyph(name)
    }

    pub fn save(&self, path: &Path) -> BuildResult<()> {
        self.font
            .save(path)
            .map_err(|e| BuildError::serialization(path, e))
    }

    fn missing(&self, name: &str) -> BuildError {
        BuildError::MissingGlyph {
            what: format!("'{name}'"),
            resource: self.label.clone(),
        }
    }

    fn glyph_mut(&mut self, name: &str) -> BuildResult<&mut norad::Glyph> {
        let label = &self.label;
        self.font
            .default_layer_mut()
            .get_glyph_mut(name)
            .ok_or_else(|| BuildError::MissingGlyph {
                what: format!("'{name}'"),
                resource: label.clone(),
            })
    }
}

impl FontEditor for UfoFont {
    fn label(&self) -> &str {
        &self.label
    }

    fn contains_glyph(&self, name: &str) -> bool {
        self.font.default_layer().contains_glyph(name)
    }

    fn glyph_for_char(&self, ch: char) -> Option<String> {
        self.font
            .default_layer()
            .iter()
            .find(|glyph| glyph.codepoints.iter().any(|cp| cp == ch))
            .map(|glyph| glyph.name().to_string())
    }

    fn width(&self, name: &str) -> Option<f64> {
        self.glyph(name).map(|glyph| glyph.width)
    }

    fn clone_glyph(&mut self, source: &str, new_name: &str) -> BuildResult<()> {
        if self.contains_glyph(new_name) {
            return Err(BuildError::DuplicateGlyphName(new_name.to_string()));
        }
        let original = self.glyph(source).ok_or_else(|| self.missing(source))?;

        let mut copy = norad::Glyph::new(new_name);
        copy.width = original.width;
        copy.height = original.height;
        copy.contours = original.contours.clone();
        copy.components = original.components.clone();
        copy.anchors = original.anchors.clone();

        self.font.default_layer_mut().insert_glyph(copy);
        Ok(())
    }

    fn set_width(&mut self, name: &str, width: f64) -> BuildResult<()> {
        self.glyph_mut(name)?.width = width;
        Ok(())
    }

    fn transform(&mut self, name: &str, affine: Affine) -> BuildResult<()> {
        apply_affine_transform(self.glyph_mut(name)?, affine);
        Ok(())
    }

    fn overlay(&mut self, target: &str, source: &str, affine: Affine) -> BuildResult<()> {
        let source_glyph = self.glyph(source).ok_or_else(|| self.missing(source))?;
        let mut layer = norad::Glyph::new(source);
        layer.contours = source_glyph.contours.clone();
        layer.components = source_glyph.components.clone();
        apply_affine_transform(&mut layer, affine);

        let target_glyph = self.glyph_mut(target)?;
        target_glyph.contours.extend(layer.contours);
        target_glyph.components.extend(layer.components);
        Ok(())
    }

    fn ink_extent(&self, name: &str) -> Option<(f64, f64)> {
        let glyph = self.glyph(name)?;
        glyph
            .contours
            .iter()
            .flat_map(|contour| contour.points.iter())
            .fold(None, |extent, point| match extent {
                None => Some((point.x, point.x)),
                Some((lo, hi)) => Some((f64::min(lo, point.x), f64::max(hi, point.x))),
            })
    }

    fn feature_text(&self) -> &str {
        &self.font.features
    }

    fn set_feature_text(&mut self, text: String) {
        self.font.features = text;
    }
}

/// Apply an affine transform to every point, component and anchor of a glyph
pub fn apply_affine_transform(glyph: &mut norad::Glyph, affine: Affine) {
    for contour in &mut glyph.contours {
        for point in &mut contour.points {
            let moved = affine * Point::new(point.x, point.y);
            point.x = moved.x;
            point.y = moved.y;
        }
    }

    for component in &mut glyph.components {
        let t = &mut component.transform;
        let current = Affine::new([
            t.x_scale,
            t.xy_scale,
            t.yx_scale,
            t.y_scale,
            t.x_offset,
            t.y_offset,
        ]);
        let [a, b, c, d, e, f] = (affine * current).as_coeffs();
        t.x_scale = a;
        t.xy_scale = b;
        t.yx_scale = c;
        t.y_scale = d;
        t.x_offset = e;
        t.y_offset = f;
    }

    for anchor in &mut glyph.anchors {
        let moved = affine * Point::new(anchor.x, anchor.y);
        anchor.x = moved.x;
        anchor.y = moved.y;
    }
}
