//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Durable storage constants
pub mod storage {
    /// Subdirectory under the user config dir holding persisted data
    pub const APP_DIR: &str = "folio";

    /// Key under which the portfolio snapshot is persisted
    pub const SNAPSHOT_KEY: &str = "portfolio";
}

/// PDF export constants
pub mod export {
    /// A4 portrait page width in millimeters
    pub const PAGE_WIDTH_MM: f64 = 210.0;

    /// A4 portrait page height in millimeters
    pub const PAGE_HEIGHT_MM: f64 = 297.0;

    /// Oversampling factor applied when rasterizing the preview surface.
    /// 2x keeps text sharp at print resolution.
    pub const RASTER_SCALE: f32 = 2.0;

    /// Fallback output filename used when no full name is set
    pub const DEFAULT_FILENAME: &str = "portfolio.pdf";
}

/// Preview surface layout constants (at 1x scale, in pixels)
pub mod layout {
    /// Rendered document width, matching A4 at 96 dpi
    pub const SURFACE_WIDTH: usize = 794;

    /// Outer margin around the document content
    pub const MARGIN: usize = 48;

    /// Edge length of the square profile picture in the header
    pub const PROFILE_PICTURE_SIZE: usize = 96;
}

/// Form step constants
pub mod steps {
    /// Number of form steps (indices 0..COUNT)
    pub const COUNT: usize = 6;

    /// Display titles, indexed by step
    pub const TITLES: [&str; COUNT] = [
        "Personal Info",
        "Skills",
        "Experience",
        "Projects",
        "Education",
        "Achievements",
    ];
}
