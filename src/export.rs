//! PDF export pipeline
//!
//! Rasterizes the preview surface at 2x, then slices the image into A4
//! portrait pages: every page draws the same full bitmap, shifted up by one
//! page height per page, so each page's visible window shows the next
//! vertical slice with no gap or overlap.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tracing::info;

use crate::constants::export::{DEFAULT_FILENAME, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, RASTER_SCALE};
use crate::model::{PortfolioRecord, TemplateKind};
use crate::preview::{Bitmap, TemplateRenderer};

/// Pagination arithmetic for a rasterized surface scaled to page width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Scaled image width, always the full page width
    pub pdf_width_mm: f64,
    /// Scaled image height preserving the bitmap's aspect ratio
    pub pdf_height_mm: f64,
    /// Number of pages needed to show the full height
    pub page_count: usize,
}

impl PageLayout {
    /// Compute the layout for a bitmap of the given pixel dimensions
    pub fn compute(bitmap_width_px: usize, bitmap_height_px: usize) -> Result<Self> {
        if bitmap_width_px == 0 || bitmap_height_px == 0 {
            return Err(anyhow!("Cannot paginate an empty surface"));
        }
        let aspect = bitmap_width_px as f64 / bitmap_height_px as f64;
        let pdf_height_mm = PAGE_WIDTH_MM / aspect;
        let page_count = (pdf_height_mm / PAGE_HEIGHT_MM).ceil().max(1.0) as usize;
        Ok(Self {
            pdf_width_mm: PAGE_WIDTH_MM,
            pdf_height_mm,
            page_count,
        })
    }

    /// Vertical draw offset of the full image on page `page` (0-based),
    /// measured in mm from the page top, negative past the first page
    pub fn offset_mm(&self, page: usize) -> f64 {
        -(page as f64) * PAGE_HEIGHT_MM
    }

    /// Height of the slice visible on page `page`
    pub fn visible_height_mm(&self, page: usize) -> f64 {
        let remaining = self.pdf_height_mm - page as f64 * PAGE_HEIGHT_MM;
        remaining.clamp(0.0, PAGE_HEIGHT_MM)
    }
}

/// Assemble the paginated PDF and save it under `path`.
/// Fails before any write when the surface is unusable.
pub fn write_pdf(bitmap: &Bitmap, path: &Path) -> Result<PageLayout> {
    let layout = PageLayout::compute(bitmap.width(), bitmap.height())?;

    let rgb = RgbImage::from_raw(
        bitmap.width() as u32,
        bitmap.height() as u32,
        bitmap.to_rgb(),
    )
    .ok_or_else(|| anyhow!("Rasterized surface has inconsistent dimensions"))?;
    let dynamic = DynamicImage::ImageRgb8(rgb);

    // Pick the dpi that maps the bitmap's pixel width to exactly 210mm
    let dpi = bitmap.width() as f64 * 25.4 / PAGE_WIDTH_MM;

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Portfolio",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Page 1",
    );

    for page_index in 0..layout.page_count {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM as f32),
                Mm(PAGE_HEIGHT_MM as f32),
                format!("Page {}", page_index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        // printpdf places images from the page's bottom-left corner; the
        // slicing offset is computed from the top, so convert.
        let translate_y = (page_index + 1) as f64 * PAGE_HEIGHT_MM - layout.pdf_height_mm;
        let image = Image::from_dynamic_image(&dynamic);
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(translate_y as f32)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("Failed to write PDF to {}", path.display()))?;

    info!(path = %path.display(), pages = layout.page_count, "Exported portfolio PDF");
    Ok(layout)
}

/// Render the record at export resolution and write the paginated PDF
pub fn export_portfolio(
    renderer: &TemplateRenderer,
    record: &PortfolioRecord,
    template: TemplateKind,
    path: &Path,
) -> Result<PageLayout> {
    let bitmap = renderer.render(record, template, RASTER_SCALE);
    write_pdf(&bitmap, path)
}

/// Derive the output filename from the person's full name, falling back to
/// a fixed default when absent
pub fn default_filename(full_name: &str) -> String {
    let cleaned = full_name.trim();
    if cleaned.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    let stem: String = cleaned
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}.pdf")
}

/// Outcome of a background export, reported over the channel
pub type ExportResult = Result<PathBuf>;

/// Run the export on a worker thread; the result arrives on the returned
/// receiver. The caller keeps its busy flag set until then and must clear
/// it on success and failure alike.
pub fn spawn_export(
    record: PortfolioRecord,
    template: TemplateKind,
    path: PathBuf,
) -> mpsc::Receiver<ExportResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = TemplateRenderer::from_system_fonts()
            .and_then(|renderer| export_portfolio(&renderer, &record, template, &path))
            .map(|_| path);
        // Receiver may be gone if the UI closed mid-export
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pixel height that scales to the given mm height at surface width 794
    fn px_height_for_mm(height_mm: f64) -> usize {
        (794.0 * height_mm / PAGE_WIDTH_MM).round() as usize
    }

    #[test]
    fn test_layout_shorter_than_one_page() {
        let layout = PageLayout::compute(794, px_height_for_mm(150.0)).unwrap();
        assert_eq!(layout.page_count, 1);
        assert!((layout.pdf_height_mm - 150.0).abs() < 0.5);
        assert_eq!(layout.offset_mm(0), 0.0);
    }

    #[test]
    fn test_layout_650mm_is_three_pages() {
        // 650mm at 297mm pages -> 297 + 297 + 56
        let layout = PageLayout::compute(794, px_height_for_mm(650.0)).unwrap();
        assert_eq!(layout.page_count, 3);
        assert!((layout.visible_height_mm(0) - 297.0).abs() < 0.5);
        assert!((layout.visible_height_mm(1) - 297.0).abs() < 0.5);
        assert!((layout.visible_height_mm(2) - 56.0).abs() < 0.5);
    }

    #[test]
    fn test_layout_just_past_one_page() {
        let layout = PageLayout::compute(794, px_height_for_mm(310.0)).unwrap();
        assert_eq!(layout.page_count, 2);
        assert!((layout.visible_height_mm(0) - 297.0).abs() < 0.5);
        assert!((layout.visible_height_mm(1) - 13.0).abs() < 0.5);
    }

    #[test]
    fn test_slices_tile_without_gap_or_overlap() {
        let layout = PageLayout::compute(1000, 4100).unwrap();
        // Each page's slice starts exactly where the previous ended
        for page in 1..layout.page_count {
            let prev_end = -layout.offset_mm(page - 1) + layout.visible_height_mm(page - 1);
            let this_start = -layout.offset_mm(page);
            assert!((prev_end - this_start).abs() < 1e-9);
        }
        // And together they cover the full scaled height
        let total: f64 = (0..layout.page_count)
            .map(|p| layout.visible_height_mm(p))
            .sum();
        assert!((total - layout.pdf_height_mm).abs() < 1e-9);
    }

    #[test]
    fn test_page_count_matches_ceil() {
        for (w_px, h_px) in [(100, 100), (794, 1123), (500, 3000), (640, 9000)] {
            let layout = PageLayout::compute(w_px, h_px).unwrap();
            let expected = (layout.pdf_height_mm / PAGE_HEIGHT_MM).ceil().max(1.0) as usize;
            assert_eq!(layout.page_count, expected);
        }
    }

    #[test]
    fn test_empty_surface_fails_fast() {
        assert!(PageLayout::compute(0, 100).is_err());
        assert!(PageLayout::compute(100, 0).is_err());
    }

    #[test]
    fn test_default_filename_from_name() {
        assert_eq!(default_filename("Ada Lovelace"), "Ada_Lovelace.pdf");
        assert_eq!(default_filename("  spaced  out  "), "spaced__out.pdf");
        assert_eq!(default_filename(""), "portfolio.pdf");
        assert_eq!(default_filename("   "), "portfolio.pdf");
    }

    #[test]
    fn test_write_pdf_produces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        // Tiny synthetic surface, two pages tall; no fonts needed
        let mut bitmap = crate::preview::Bitmap::new(210, 560);
        bitmap.fill_rect(0, 0, 210, 10, crate::preview::Rgb(0, 0, 0));

        let layout = write_pdf(&bitmap, &path).unwrap();
        assert_eq!(layout.page_count, 2);
        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
