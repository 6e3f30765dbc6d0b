mod condition;
mod debug;
mod error;
mod fields;
mod finding;
mod hazard;
mod html;
mod input;
mod layout;
mod model;
mod paginate;
mod photo;
mod style;
mod tally;
mod types;

pub use condition::{ConditionLabel, FallbackSignals, resolve_condition};
use debug::DebugLogger;
pub use error::SurveyPrintError;
pub use fields::{PLACEHOLDER, split_semicolon_list};
pub use finding::{Finding, RUST_STAIN_TAG, RecommendationField};
pub use hazard::HazardRow;
pub use html::{ROOT_ID, RenderStats, RenderedReport, render_dom};
pub use input::ReportInput;
pub use layout::{
    Block, BlockKind, BreakAfter, BreakBefore, BreakInside, Kpi, LayoutOptions, Pagination,
    PhotoCard, ReportLayout, build_layout,
};
pub use model::{AreaRating, FindingsTally, ReportMetadata, format_score};
pub use paginate::{
    KeyOrder, PHOTOS_PER_PAGE, PagedGroup, UNSPECIFIED_AREA, group_and_paginate,
    group_by_location, paginate,
};
pub use photo::{ImageFallback, NoPhotos, PhotoResolver, PhotoSource};
pub use tally::{ConditionCounts, count_conditions};
pub use types::{Margins, Pt, Size};

use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const ENV_PAGE_SIZE: &str = "SURVEYPRINT_PAGE_SIZE";
const ENV_DEBUG_LOG: &str = "SURVEYPRINT_DEBUG_LOG";
const DEFAULT_TITLE: &str = "Vessel Condition Survey";

/// Configured report printer. Build once, render many reports.
pub struct SurveyPrint {
    page_size: Size,
    margins: Margins,
    layout_options: LayoutOptions,
    stylesheet: String,
    debug: Option<Arc<DebugLogger>>,
}

#[derive(Clone)]
pub struct SurveyPrintBuilder {
    page_size: Size,
    margins: Margins,
    photos_per_page: usize,
    title: String,
    include_grouped_section: bool,
    include_appendix: bool,
    image_fallback: ImageFallback,
    extra_css: Vec<String>,
    debug_path: Option<PathBuf>,
}

impl SurveyPrint {
    pub fn builder() -> SurveyPrintBuilder {
        SurveyPrintBuilder::new()
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Minified print stylesheet inlined into every rendered report.
    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout_options
    }

    /// Layout tree only, for engines that consume blocks directly.
    pub fn layout<R>(&self, input: &ReportInput, resolver: &R) -> ReportLayout
    where
        R: PhotoResolver + ?Sized,
    {
        build_layout(input, resolver, &self.layout_options)
    }

    /// Layout plus DOM. Never fails: missing data degrades to placeholders.
    pub fn render<R>(&self, input: &ReportInput, resolver: &R) -> RenderedReport
    where
        R: PhotoResolver + ?Sized,
    {
        let layout = self.layout(input, resolver);
        let rendered = render_dom(&layout, &self.stylesheet);
        let stats = rendered.stats();
        info!(
            pages = stats.pages,
            images = stats.images,
            images_omitted = stats.images_omitted,
            placeholders = stats.placeholders,
            "rendered survey report"
        );
        if let Some(logger) = self.debug.as_deref() {
            logger.log_event(
                "render.layout",
                json!({
                    "findings": input.findings.len(),
                    "hazards": input.hazards.len(),
                    "areas": input.area_ratings.len(),
                    "fire_hazard": layout.counts.fire_hazard,
                    "trip_fall": layout.counts.trip_fall,
                    "none": layout.counts.none,
                }),
            );
            logger.increment("reports", 1);
            logger.increment("pages", stats.pages as u64);
            logger.increment("images", stats.images as u64);
            logger.increment("images_omitted", stats.images_omitted as u64);
            logger.increment("placeholders", stats.placeholders as u64);
        }
        self.emit_debug_summary("render");
        rendered
    }

    /// Parse a JSON report document and render it.
    pub fn render_json<R>(&self, raw: &str, resolver: &R) -> Result<RenderedReport, SurveyPrintError>
    where
        R: PhotoResolver + ?Sized,
    {
        let input = ReportInput::from_json_str(raw)?;
        Ok(self.render(&input, resolver))
    }

    fn emit_debug_summary(&self, context: &str) {
        if let Some(logger) = self.debug.as_deref() {
            logger.emit_summary(context);
            logger.flush();
        }
    }
}

impl SurveyPrintBuilder {
    pub fn new() -> Self {
        Self {
            page_size: Size::a4(),
            margins: Margins::all(36.0),
            photos_per_page: PHOTOS_PER_PAGE,
            title: DEFAULT_TITLE.to_string(),
            include_grouped_section: true,
            include_appendix: true,
            image_fallback: ImageFallback::Hide,
            extra_css: Vec::new(),
            debug_path: None,
        }
    }

    /// Defaults overlaid with `SURVEYPRINT_PAGE_SIZE` (`a4`, `letter`, or
    /// dimensions like `210x297mm`) and
    /// `SURVEYPRINT_DEBUG_LOG` (trace file path).
    pub fn from_env() -> Result<Self, SurveyPrintError> {
        let mut builder = Self::new();
        if let Ok(raw) = std::env::var(ENV_PAGE_SIZE) {
            let size = Size::from_name(&raw).ok_or_else(|| {
                SurveyPrintError::InvalidConfiguration(format!(
                    "{ENV_PAGE_SIZE}={raw:?} is not a known page size (a4, letter, WxHmm, WxHin)"
                ))
            })?;
            builder = builder.page_size(size);
        }
        if let Some(path) = std::env::var_os(ENV_DEBUG_LOG).filter(|p| !p.is_empty()) {
            builder = builder.debug_log(path);
        }
        Ok(builder)
    }

    pub fn page_size(mut self, size: Size) -> Self {
        self.page_size = size;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn margin_all(mut self, value: f32) -> Self {
        self.margins = Margins::all(value);
        self
    }

    pub fn photos_per_page(mut self, count: usize) -> Self {
        self.photos_per_page = count;
        self
    }

    pub fn report_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn include_grouped_section(mut self, enabled: bool) -> Self {
        self.include_grouped_section = enabled;
        self
    }

    pub fn include_appendix(mut self, enabled: bool) -> Self {
        self.include_appendix = enabled;
        self
    }

    pub fn image_fallback(mut self, fallback: ImageFallback) -> Self {
        self.image_fallback = fallback;
        self
    }

    // Appended after the base rules, in call order; validated in build().
    pub fn extra_css(mut self, css: impl Into<String>) -> Self {
        self.extra_css.push(css.into());
        self
    }

    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SurveyPrint, SurveyPrintError> {
        if self.photos_per_page == 0 {
            return Err(SurveyPrintError::InvalidConfiguration(
                "photos_per_page must be >= 1".to_string(),
            ));
        }
        if self.page_size.width.to_milli_i64() <= 0 || self.page_size.height.to_milli_i64() <= 0 {
            return Err(SurveyPrintError::InvalidConfiguration(
                "page size must be positive".to_string(),
            ));
        }
        let margins = self.margins;
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|edge| edge.is_negative())
        {
            return Err(SurveyPrintError::InvalidConfiguration(
                "margins must not be negative".to_string(),
            ));
        }
        if margins.horizontal() >= self.page_size.width || margins.vertical() >= self.page_size.height
        {
            return Err(SurveyPrintError::InvalidConfiguration(
                "margins leave no printable area".to_string(),
            ));
        }
        let title = self.title.trim();
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };

        let extra_css = self.extra_css.join("\n");
        let stylesheet = style::compile_stylesheet(
            self.page_size,
            self.margins,
            Some(extra_css.as_str()),
        )?;
        let debug = if let Some(path) = self.debug_path {
            Some(Arc::new(DebugLogger::new(path)?))
        } else {
            None
        };
        debug!(
            page_width = %self.page_size.width,
            page_height = %self.page_size.height,
            photos_per_page = self.photos_per_page,
            "survey printer configured"
        );

        Ok(SurveyPrint {
            page_size: self.page_size,
            margins: self.margins,
            layout_options: LayoutOptions {
                title: title.to_string(),
                photos_per_page: self.photos_per_page,
                include_grouped_section: self.include_grouped_section,
                include_appendix: self.include_appendix,
                image_fallback: self.image_fallback,
            },
            stylesheet,
            debug,
        })
    }
}

impl Default for SurveyPrintBuilder {
    fn default() -> Self {
        Self::new()
    }
}
