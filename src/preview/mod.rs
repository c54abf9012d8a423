//! Preview surface rendering
//!
//! Renders the portfolio record into an RGBA document image. The same
//! surface backs the live preview (uploaded as an egui texture) and the
//! PDF export (rasterized at 2x). Height is content-driven: the surface
//! grows as sections are laid down and is cropped to the content afterward.

pub mod font;

use std::io::Cursor;

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::constants::layout;
use crate::model::{PortfolioRecord, Project, TemplateKind};
use font::{FontSet, RenderedText};

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const INK: Rgb = Rgb(31, 41, 55);
const MUTED: Rgb = Rgb(107, 114, 128);
const WHITE: Rgb = Rgb(255, 255, 255);
const CHIP_BG: Rgb = Rgb(229, 231, 235);
const STAR_OFF: Rgb = Rgb(209, 213, 219);

impl TemplateKind {
    /// Accent color driving headings, rules and chips
    fn accent(&self) -> Rgb {
        match self {
            TemplateKind::Modern => Rgb(37, 99, 235),
            TemplateKind::Classic => Rgb(17, 24, 39),
            TemplateKind::Creative => Rgb(147, 51, 234),
        }
    }
}

/// Growable opaque RGBA surface with a white background
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![255u8; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Drop alpha, yielding tightly packed RGB8 (the surface is opaque)
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Grow the surface with white rows until it is at least `height` tall
    fn ensure_height(&mut self, height: usize) {
        if height > self.height {
            self.data.resize(self.width * height * 4, 255u8);
            self.height = height;
        }
    }

    /// Crop trailing rows so the surface ends at `height`
    fn crop_height(&mut self, height: usize) {
        if height < self.height {
            self.data.truncate(self.width * height * 4);
            self.height = height;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        if w == 0 || h == 0 {
            return;
        }
        self.ensure_height(y + h);
        let x_end = (x + w).min(self.width);
        for row in y..y + h {
            let base = row * self.width;
            for col in x..x_end {
                let idx = (base + col) * 4;
                self.data[idx] = color.0;
                self.data[idx + 1] = color.1;
                self.data[idx + 2] = color.2;
                self.data[idx + 3] = 255;
            }
        }
    }

    /// Alpha-blend rendered text coverage in `color` at (x, y)
    pub fn draw_text(&mut self, text: &RenderedText, x: usize, y: usize, color: Rgb) {
        if text.width == 0 || text.height == 0 {
            return;
        }
        self.ensure_height(y + text.height);
        for ty in 0..text.height {
            for tx in 0..text.width {
                let sample = text.coverage[ty * text.width + tx];
                if sample == 0 {
                    continue;
                }
                let px = x + tx;
                let py = y + ty;
                if px >= self.width {
                    continue;
                }
                let idx = (py * self.width + px) * 4;
                let alpha = sample as u32;
                let inv = 255 - alpha;
                self.data[idx] = ((color.0 as u32 * alpha + self.data[idx] as u32 * inv) / 255) as u8;
                self.data[idx + 1] =
                    ((color.1 as u32 * alpha + self.data[idx + 1] as u32 * inv) / 255) as u8;
                self.data[idx + 2] =
                    ((color.2 as u32 * alpha + self.data[idx + 2] as u32 * inv) / 255) as u8;
            }
        }
    }

    /// Nearest-neighbor blit of an RGBA image scaled to (dw, dh),
    /// alpha-composited over the surface
    pub fn blit_rgba_scaled(
        &mut self,
        src: &[u8],
        src_w: usize,
        src_h: usize,
        dx: usize,
        dy: usize,
        dw: usize,
        dh: usize,
    ) {
        if src_w == 0 || src_h == 0 || dw == 0 || dh == 0 {
            return;
        }
        self.ensure_height(dy + dh);
        for oy in 0..dh {
            let sy = oy * src_h / dh;
            for ox in 0..dw {
                let px = dx + ox;
                if px >= self.width {
                    continue;
                }
                let sx = ox * src_w / dw;
                let sidx = (sy * src_w + sx) * 4;
                let alpha = src[sidx + 3] as u32;
                if alpha == 0 {
                    continue;
                }
                let inv = 255 - alpha;
                let didx = ((dy + oy) * self.width + px) * 4;
                for ch in 0..3 {
                    self.data[didx + ch] = ((src[sidx + ch] as u32 * alpha
                        + self.data[didx + ch] as u32 * inv)
                        / 255) as u8;
                }
            }
        }
    }
}

/// Decode an inline `data:image/png;base64,...` string into RGBA pixels
pub fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, usize, usize)> {
    let encoded = uri
        .strip_prefix("data:image/png;base64,")
        .ok_or_else(|| anyhow!("Unsupported data URI (expected inline PNG)"))?;
    let bytes = BASE64
        .decode(encoded)
        .context("Invalid base64 in profile picture data URI")?;
    decode_png_rgba(&bytes)
}

/// Validate PNG bytes and wrap them in an inline data URI
pub fn encode_data_uri(png_bytes: &[u8]) -> Result<String> {
    decode_png_rgba(png_bytes).context("Profile picture is not a decodable PNG")?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png_bytes)))
}

fn decode_png_rgba(bytes: &[u8]) -> Result<(Vec<u8>, usize, usize)> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().context("Failed to read PNG header")?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .context("Failed to decode PNG frame")?;
    let pixels = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
            for chunk in pixels.chunks_exact(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(0xFF);
            }
            rgba
        }
        other => {
            return Err(anyhow!(
                "Unsupported PNG color type {other:?} (expected RGB or RGBA)"
            ));
        }
    };
    Ok((rgba, info.width as usize, info.height as usize))
}

/// Renders the portfolio into a document image for a given template
pub struct TemplateRenderer {
    fonts: FontSet,
}

impl TemplateRenderer {
    pub fn new(fonts: FontSet) -> Self {
        Self { fonts }
    }

    /// Load system fonts and build a renderer
    pub fn from_system_fonts() -> Result<Self> {
        Ok(Self::new(FontSet::load()?))
    }

    /// Rasterize `record` at the given oversampling factor. The result is
    /// at least one A4 page tall and grows with content.
    pub fn render(&self, record: &PortfolioRecord, template: TemplateKind, scale: f32) -> Bitmap {
        let ctx = Metrics::at(scale);
        let mut bitmap = Bitmap::new(ctx.width, ctx.min_height);
        let accent = template.accent();

        let mut y = self.draw_header(&mut bitmap, record, template, &ctx);

        if !record.personal_info.summary.is_empty() {
            y = self.section(&mut bitmap, "Summary", y, accent, &ctx);
            y = self.wrapped(&mut bitmap, &record.personal_info.summary, ctx.body, false, INK, ctx.margin, ctx.content_w, y);
            y += ctx.gap;
        }

        if !record.skills.is_empty() {
            y = self.section(&mut bitmap, "Skills", y, accent, &ctx);
            for skill in &record.skills {
                let line_h = self.line(&mut bitmap, &skill.name, ctx.body, false, INK, ctx.margin, y);
                self.draw_stars(&mut bitmap, skill.level.star_count(), accent, &ctx, y, line_h);
                y += line_h + ctx.small_gap;
            }
            y += ctx.gap;
        }

        if !record.experience.is_empty() {
            y = self.section(&mut bitmap, "Experience", y, accent, &ctx);
            for exp in &record.experience {
                let heading = format!("{} • {}", exp.role, exp.company);
                y += self.line(&mut bitmap, &heading, ctx.subhead, true, INK, ctx.margin, y);
                let duration = if exp.current {
                    format!("{} (Current)", exp.duration)
                } else {
                    exp.duration.clone()
                };
                if !duration.trim().is_empty() {
                    y += self.line(&mut bitmap, &duration, ctx.small, false, MUTED, ctx.margin, y);
                }
                if !exp.description.is_empty() {
                    y = self.wrapped(&mut bitmap, &exp.description, ctx.body, false, INK, ctx.margin, ctx.content_w, y);
                }
                y += ctx.gap;
            }
        }

        if !record.projects.is_empty() {
            y = self.section(&mut bitmap, "Projects", y, accent, &ctx);
            for project in &record.projects {
                y = self.draw_project(&mut bitmap, project, accent, &ctx, y);
            }
        }

        if !record.education.is_empty() {
            y = self.section(&mut bitmap, "Education", y, accent, &ctx);
            for edu in &record.education {
                y += self.line(&mut bitmap, &edu.degree, ctx.subhead, true, INK, ctx.margin, y);
                let detail = format!("{} • {}", edu.institute, edu.duration);
                y += self.line(&mut bitmap, &detail, ctx.small, false, MUTED, ctx.margin, y);
                if let Some(description) = &edu.description {
                    y = self.wrapped(&mut bitmap, description, ctx.body, false, INK, ctx.margin, ctx.content_w, y);
                }
                y += ctx.gap;
            }
        }

        if !record.achievements.is_empty() {
            y = self.section(&mut bitmap, "Achievements", y, accent, &ctx);
            for achievement in &record.achievements {
                y += self.line(&mut bitmap, &achievement.title, ctx.subhead, true, INK, ctx.margin, y);
                let detail = format!("{} • {}", achievement.issuer, achievement.date);
                y += self.line(&mut bitmap, &detail, ctx.small, false, MUTED, ctx.margin, y);
                if let Some(description) = &achievement.description {
                    y = self.wrapped(&mut bitmap, description, ctx.body, false, INK, ctx.margin, ctx.content_w, y);
                }
                y += ctx.gap;
            }
        }

        let final_height = (y + ctx.margin).max(ctx.min_height);
        bitmap.ensure_height(final_height);
        bitmap.crop_height(final_height);
        bitmap
    }

    fn draw_header(
        &self,
        bitmap: &mut Bitmap,
        record: &PortfolioRecord,
        template: TemplateKind,
        ctx: &Metrics,
    ) -> usize {
        let info = &record.personal_info;
        let accent = template.accent();

        let name = if info.full_name.is_empty() {
            "Your Name"
        } else {
            &info.full_name
        };
        let contact = [&info.email, &info.phone, &info.location, &info.linkedin, &info.github]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" • ");

        // Header height: name + optional title + optional contact rows
        let mut band_h = ctx.margin + self.fonts.line_height(ctx.name, true);
        if !info.title.is_empty() {
            band_h += self.fonts.line_height(ctx.subhead, false);
        }
        if !contact.is_empty() {
            band_h += self.fonts.line_height(ctx.small, false) + ctx.small_gap;
        }
        band_h += ctx.margin / 2;
        band_h = band_h.max(ctx.margin + ctx.picture + ctx.margin / 2);

        // Template treatments: Modern fills an accent band, Creative draws
        // an accent spine, Classic stays plain with a rule below.
        let (fg, fg_muted) = match template {
            TemplateKind::Modern => {
                bitmap.fill_rect(0, 0, ctx.width, band_h, accent);
                (WHITE, Rgb(219, 234, 254))
            }
            TemplateKind::Creative => {
                bitmap.fill_rect(0, 0, ctx.spine, band_h, accent);
                (INK, MUTED)
            }
            TemplateKind::Classic => (INK, MUTED),
        };

        let mut y = ctx.margin;
        y += self.line(bitmap, name, ctx.name, true, fg, ctx.margin, y);
        if !info.title.is_empty() {
            let title_color = if template == TemplateKind::Modern { fg_muted } else { accent };
            y += self.line(bitmap, &info.title, ctx.subhead, false, title_color, ctx.margin, y);
        }
        if !contact.is_empty() {
            y += ctx.small_gap;
            y += self.line(bitmap, &contact, ctx.small, false, fg_muted, ctx.margin, y);
        }

        if !info.profile_picture.is_empty() {
            if let Ok((rgba, w, h)) = decode_data_uri(&info.profile_picture) {
                let size = ctx.picture;
                let dx = ctx.width - ctx.margin - size;
                bitmap.blit_rgba_scaled(&rgba, w, h, dx, ctx.margin, size, size);
            }
        }

        if template == TemplateKind::Classic {
            bitmap.fill_rect(ctx.margin, band_h - ctx.rule, ctx.content_w, ctx.rule, accent);
        }

        band_h + ctx.gap
    }

    fn draw_project(
        &self,
        bitmap: &mut Bitmap,
        project: &Project,
        accent: Rgb,
        ctx: &Metrics,
        mut y: usize,
    ) -> usize {
        let title_h = self.line(bitmap, &project.title, ctx.subhead, true, INK, ctx.margin, y);
        if project.featured {
            let title_w = self.fonts.measure(&project.title, ctx.subhead, true).ceil() as usize;
            let tag = self.fonts.render_line("Featured", ctx.small, true);
            let pad = ctx.small_gap;
            let tag_x = ctx.margin + title_w + ctx.gap;
            bitmap.fill_rect(tag_x, y, tag.width + pad * 2, tag.height + pad, accent);
            bitmap.draw_text(&tag, tag_x + pad, y + pad / 2, WHITE);
        }
        y += title_h;

        if !project.description.is_empty() {
            y = self.wrapped(bitmap, &project.description, ctx.body, false, INK, ctx.margin, ctx.content_w, y);
        }

        if !project.tech_stack.is_empty() {
            y += ctx.small_gap;
            let mut x = ctx.margin;
            let chip_h = self.fonts.line_height(ctx.small, false) + ctx.small_gap;
            for tech in &project.tech_stack {
                let text = self.fonts.render_line(tech, ctx.small, false);
                let chip_w = text.width + ctx.small_gap * 2;
                if x + chip_w > ctx.margin + ctx.content_w && x > ctx.margin {
                    x = ctx.margin;
                    y += chip_h + ctx.small_gap;
                }
                bitmap.fill_rect(x, y, chip_w, chip_h, CHIP_BG);
                bitmap.draw_text(&text, x + ctx.small_gap, y + ctx.small_gap / 2, INK);
                x += chip_w + ctx.small_gap;
            }
            y += chip_h;
        }

        for (label, link) in [("Source", &project.github_link), ("Live", &project.live_link)] {
            if !link.is_empty() {
                let line = format!("{label}: {link}");
                y += self.line(bitmap, &line, ctx.small, false, MUTED, ctx.margin, y);
            }
        }

        y + ctx.gap
    }

    fn draw_stars(
        &self,
        bitmap: &mut Bitmap,
        filled: usize,
        accent: Rgb,
        ctx: &Metrics,
        y: usize,
        line_h: usize,
    ) {
        let size = ctx.star;
        let total = 4;
        let spacing = size / 2;
        let x_start = ctx.margin + ctx.content_w - total * size - (total - 1) * spacing;
        let y_offset = y + line_h.saturating_sub(size) / 2;
        for i in 0..total {
            let color = if i < filled { accent } else { STAR_OFF };
            bitmap.fill_rect(x_start + i * (size + spacing), y_offset, size, size, color);
        }
    }

    /// Section heading with an accent rule, returns the next y
    fn section(&self, bitmap: &mut Bitmap, title: &str, mut y: usize, accent: Rgb, ctx: &Metrics) -> usize {
        y += self.line(bitmap, title, ctx.heading, true, accent, ctx.margin, y);
        bitmap.fill_rect(ctx.margin, y, ctx.content_w, ctx.rule, accent);
        y + ctx.rule + ctx.gap
    }

    /// Draw one unwrapped line, returning its line height
    fn line(&self, bitmap: &mut Bitmap, text: &str, px: f32, bold: bool, color: Rgb, x: usize, y: usize) -> usize {
        let rendered = self.fonts.render_line(text, px, bold);
        bitmap.draw_text(&rendered, x, y, color);
        self.fonts.line_height(px, bold)
    }

    /// Draw word-wrapped text, returning the next y
    fn wrapped(
        &self,
        bitmap: &mut Bitmap,
        text: &str,
        px: f32,
        bold: bool,
        color: Rgb,
        x: usize,
        max_w: usize,
        mut y: usize,
    ) -> usize {
        for line in self.fonts.wrap(text, px, bold, max_w as f32) {
            y += self.line(bitmap, &line, px, bold, color, x, y);
        }
        y
    }
}

/// Scaled layout metrics for one render pass
struct Metrics {
    width: usize,
    margin: usize,
    content_w: usize,
    min_height: usize,
    picture: usize,
    spine: usize,
    rule: usize,
    gap: usize,
    small_gap: usize,
    star: usize,
    name: f32,
    heading: f32,
    subhead: f32,
    body: f32,
    small: f32,
}

impl Metrics {
    fn at(scale: f32) -> Self {
        let px = |v: usize| (v as f32 * scale).round() as usize;
        let width = px(layout::SURFACE_WIDTH);
        let margin = px(layout::MARGIN);
        Self {
            width,
            margin,
            content_w: width - 2 * margin,
            // Keep at least one full A4 page of surface
            min_height: (width as f64 * 297.0 / 210.0).round() as usize,
            picture: px(layout::PROFILE_PICTURE_SIZE),
            spine: px(8).max(1),
            rule: px(2).max(1),
            gap: px(10),
            small_gap: px(4).max(1),
            star: px(9),
            name: 26.0 * scale,
            heading: 13.5 * scale,
            subhead: 12.0 * scale,
            body: 10.5 * scale,
            small: 9.5 * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_starts_white_and_opaque() {
        let bitmap = Bitmap::new(4, 2);
        assert!(bitmap.data().iter().all(|&b| b == 255));
        assert_eq!(bitmap.data().len(), 4 * 2 * 4);
    }

    #[test]
    fn test_fill_rect_grows_surface() {
        let mut bitmap = Bitmap::new(10, 5);
        bitmap.fill_rect(0, 8, 10, 4, Rgb(1, 2, 3));
        assert_eq!(bitmap.height(), 12);

        // Rows between old height and the rect stay white
        let idx = (6 * 10) * 4;
        assert_eq!(&bitmap.data()[idx..idx + 4], &[255, 255, 255, 255]);
        let idx = (9 * 10) * 4;
        assert_eq!(&bitmap.data()[idx..idx + 4], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_fill_rect_clips_horizontally() {
        let mut bitmap = Bitmap::new(4, 4);
        bitmap.fill_rect(2, 0, 10, 1, Rgb(9, 9, 9));
        let row: Vec<u8> = bitmap.data()[..16].to_vec();
        assert_eq!(row, vec![255, 255, 255, 255, 255, 255, 255, 255, 9, 9, 9, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn test_crop_height() {
        let mut bitmap = Bitmap::new(3, 10);
        bitmap.crop_height(4);
        assert_eq!(bitmap.height(), 4);
        assert_eq!(bitmap.data().len(), 3 * 4 * 4);
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let mut bitmap = Bitmap::new(1, 1);
        bitmap.fill_rect(0, 0, 1, 1, Rgb(10, 20, 30));
        assert_eq!(bitmap.to_rgb(), vec![10, 20, 30]);
    }

    #[test]
    fn test_blit_scales_and_composites() {
        let mut bitmap = Bitmap::new(4, 4);
        // 1x1 fully opaque red source scaled to 2x2
        let src = [255u8, 0, 0, 255];
        bitmap.blit_rgba_scaled(&src, 1, 1, 1, 1, 2, 2);
        let idx = (1 * 4 + 1) * 4;
        assert_eq!(&bitmap.data()[idx..idx + 3], &[255, 0, 0]);
        let idx = (2 * 4 + 2) * 4;
        assert_eq!(&bitmap.data()[idx..idx + 3], &[255, 0, 0]);
        // Outside the blit stays white
        assert_eq!(&bitmap.data()[..3], &[255, 255, 255]);
    }

    #[test]
    fn test_blit_transparent_pixels_leave_background() {
        let mut bitmap = Bitmap::new(2, 2);
        let src = [0u8, 0, 0, 0];
        bitmap.blit_rgba_scaled(&src, 1, 1, 0, 0, 2, 2);
        assert!(bitmap.data().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_encode_decode_data_uri_round_trip() {
        // Minimal 1x1 red PNG
        let png_bytes = one_pixel_png();
        let uri = encode_data_uri(&png_bytes).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let (rgba, w, h) = decode_data_uri(&uri).unwrap();
        assert_eq!((w, h), (1, 1));
        assert_eq!(&rgba[..3], &[255, 0, 0]);
    }

    #[test]
    fn test_decode_rejects_non_png_uri() {
        assert!(decode_data_uri("data:image/jpeg;base64,abcd").is_err());
        assert!(decode_data_uri("data:image/png;base64,!!!not-base64").is_err());
        assert!(encode_data_uri(b"plainly not a png").is_err());
    }

    #[test]
    fn test_render_produces_at_least_one_page() {
        let Ok(renderer) = TemplateRenderer::from_system_fonts() else {
            return;
        };
        let record = PortfolioRecord::default();
        let bitmap = renderer.render(&record, TemplateKind::Modern, 1.0);
        assert_eq!(bitmap.width(), layout::SURFACE_WIDTH);
        // Empty portfolio still yields a full A4-proportioned page
        let min = (layout::SURFACE_WIDTH as f64 * 297.0 / 210.0).round() as usize;
        assert_eq!(bitmap.height(), min);
    }

    #[test]
    fn test_render_grows_with_content() {
        let Ok(renderer) = TemplateRenderer::from_system_fonts() else {
            return;
        };
        let mut record = PortfolioRecord::default();
        record.personal_info.full_name = "Test Person".to_string();
        for i in 0..40 {
            record.experience.push(crate::model::Experience::new(
                format!("Role {i}"),
                "Somewhere",
                "2020 - 2021",
                "Did a lot of interesting things over a long period of time, \
                 described here at length so that the text wraps."
                    .to_string(),
                false,
            ));
        }
        let short = renderer.render(&record, TemplateKind::Modern, 1.0);
        record.experience.truncate(1);
        let shorter = renderer.render(&record, TemplateKind::Modern, 1.0);
        assert!(short.height() > shorter.height());
    }

    /// Hand-assembled 1x1 red RGB PNG for data-URI tests
    fn one_pixel_png() -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[255, 0, 0]).unwrap();
        }
        out
    }
}
