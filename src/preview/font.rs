//! TrueType text rasterization using fontdue (pure Rust)
//!
//! Glyph coverage is rendered separately from color: the template renderer
//! blends coverage with its own foreground colors when compositing onto
//! the document surface.

use std::ffi::CString;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use tracing::{debug, info, warn};

/// A rasterized line of text as an 8-bit coverage bitmap
pub struct RenderedText {
    pub width: usize,
    pub height: usize,
    /// Row-major coverage values, 0 = transparent, 255 = full ink
    pub coverage: Vec<u8>,
}

impl RenderedText {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }
}

/// Regular + bold faces resolved from the system font configuration
pub struct FontSet {
    regular: Font,
    bold: Font,
}

impl FontSet {
    /// Load the document fonts, preferring fontconfig resolution and
    /// falling back to well-known file locations.
    pub fn load() -> Result<Self> {
        let regular = load_face(&["DejaVu Sans", "Liberation Sans", "sans-serif"], REGULAR_PATHS)
            .context("Failed to load a regular sans font")?;
        let bold = load_face(&["DejaVu Sans Bold", "Liberation Sans Bold"], BOLD_PATHS)
            .context("Failed to load a bold sans font")?;
        info!("Loaded document fonts");
        Ok(Self { regular, bold })
    }

    /// Build a font set from raw font file bytes (used by tests)
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self> {
        let regular = Font::from_bytes(regular, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse regular font: {e}"))?;
        let bold = Font::from_bytes(bold, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse bold font: {e}"))?;
        Ok(Self { regular, bold })
    }

    fn face(&self, bold: bool) -> &Font {
        if bold { &self.bold } else { &self.regular }
    }

    /// Advance width of `text` at `px` pixels
    pub fn measure(&self, text: &str, px: f32, bold: bool) -> f32 {
        let face = self.face(bold);
        text.chars()
            .map(|ch| face.metrics(ch, px).advance_width)
            .sum()
    }

    /// Vertical distance between consecutive baselines at `px` pixels
    pub fn line_height(&self, px: f32, bold: bool) -> usize {
        match self.face(bold).horizontal_line_metrics(px) {
            Some(metrics) => metrics.new_line_size.ceil() as usize,
            None => (px * 1.25).ceil() as usize,
        }
    }

    /// Greedy word wrap of `text` into lines no wider than `max_width`
    /// pixels. Explicit newlines are honored; a single word wider than the
    /// limit is placed on its own line rather than split.
    pub fn wrap(&self, text: &str, px: f32, bold: bool, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if current.is_empty() || self.measure(&candidate, px, bold) <= max_width {
                    current = candidate;
                } else {
                    lines.push(current);
                    current = word.to_string();
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    /// Render a single line of text into a coverage bitmap. The bitmap
    /// height covers the face's full ascent + descent so consecutive lines
    /// align on consistent baselines.
    pub fn render_line(&self, text: &str, px: f32, bold: bool) -> RenderedText {
        if text.is_empty() {
            return RenderedText::empty();
        }

        let face = self.face(bold);
        let (ascent, descent) = match face.horizontal_line_metrics(px) {
            Some(metrics) => (metrics.ascent, metrics.descent),
            None => (px, -px * 0.25),
        };
        let height = (ascent - descent).ceil() as usize;
        let baseline = ascent.ceil() as i32;

        // Layout pass: glyph positions along the advance direction
        let mut glyphs = Vec::new();
        let mut pen_x = 0.0f32;
        for ch in text.chars() {
            let (metrics, bitmap) = face.rasterize(ch, px);
            glyphs.push((pen_x, metrics, bitmap));
            pen_x += metrics.advance_width;
        }

        let width = pen_x.ceil() as usize;
        if width == 0 || height == 0 {
            return RenderedText::empty();
        }

        let mut coverage = vec![0u8; width * height];
        for (x_offset, metrics, bitmap) in glyphs {
            let glyph_left = x_offset as i32 + metrics.xmin;
            let glyph_top = baseline - metrics.height as i32 - metrics.ymin;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let px_x = glyph_left + gx as i32;
                    let px_y = glyph_top + gy as i32;
                    if px_x < 0 || px_y < 0 || px_x >= width as i32 || px_y >= height as i32 {
                        continue;
                    }
                    let idx = px_y as usize * width + px_x as usize;
                    let sample = bitmap[gy * metrics.width + gx];
                    // Overlapping glyph edges keep the darker sample
                    coverage[idx] = coverage[idx].max(sample);
                }
            }
        }

        RenderedText {
            width,
            height,
            coverage,
        }
    }
}

const REGULAR_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

const BOLD_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

fn load_face(families: &[&str], fallback_paths: &[&str]) -> Result<Font> {
    for family in families {
        match find_font_path(family) {
            Ok(path) => match load_font_file(&path) {
                Ok(font) => {
                    info!(family = %family, path = %path.display(), "Loaded font via fontconfig");
                    return Ok(font);
                }
                Err(err) => warn!(path = %path.display(), error = ?err, "Failed to load resolved font file"),
            },
            Err(err) => debug!(family = %family, error = ?err, "Fontconfig resolution failed"),
        }
    }

    for path in fallback_paths {
        if let Ok(font) = load_font_file(&PathBuf::from(path)) {
            info!(path = %path, "Loaded font from fallback path");
            return Ok(font);
        }
    }

    Err(anyhow::anyhow!(
        "No usable font found. Tried fontconfig families {:?} and paths {:?}",
        families,
        fallback_paths
    ))
}

fn load_font_file(path: &PathBuf) -> Result<Font> {
    let data = fs::read(path).with_context(|| format!("Failed to read font file: {}", path.display()))?;
    Font::from_bytes(data, FontSettings::default())
        .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {e}", path.display()))
}

/// Resolve a font family name to a file path via fontconfig
fn find_font_path(family: &str) -> Result<PathBuf> {
    let fc = fontconfig::Fontconfig::new().context("Failed to initialize fontconfig")?;

    let mut pattern = fontconfig::Pattern::new(&fc);
    let family_cstr =
        CString::new(family).with_context(|| format!("Invalid family name: {family}"))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

    let matched = pattern.font_match();
    let file_path = matched
        .filename()
        .with_context(|| format!("No font file found for '{family}'"))?;

    let path = PathBuf::from(file_path);
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Font file path '{}' does not exist",
            path.display()
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // These run only where a system font is installed; on bare CI images
    // the loader itself is exercised through its error path.
    fn try_fonts() -> Option<FontSet> {
        FontSet::load().ok()
    }

    #[test]
    fn test_render_line_dimensions() {
        let Some(fonts) = try_fonts() else { return };

        let rendered = fonts.render_line("Hello", 16.0, false);
        assert!(rendered.width > 0);
        assert!(rendered.height > 0);
        assert_eq!(rendered.coverage.len(), rendered.width * rendered.height);
        assert!(rendered.coverage.iter().any(|&c| c > 0));
    }

    #[test]
    fn test_render_empty_line() {
        let Some(fonts) = try_fonts() else { return };

        let rendered = fonts.render_line("", 16.0, false);
        assert_eq!(rendered.width, 0);
        assert_eq!(rendered.height, 0);
    }

    #[test]
    fn test_wrap_respects_max_width() {
        let Some(fonts) = try_fonts() else { return };

        let text = "the quick brown fox jumps over the lazy dog";
        let max_width = 80.0;
        let lines = fonts.wrap(text, 14.0, false, max_width);
        assert!(lines.len() > 1);
        for line in &lines {
            // A single over-long word may exceed the limit; these do not
            assert!(fonts.measure(line, 14.0, false) <= max_width || !line.contains(' '));
        }

        // No words lost
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_preserves_explicit_newlines() {
        let Some(fonts) = try_fonts() else { return };

        let lines = fonts.wrap("one\ntwo", 14.0, false, 500.0);
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }
}
