//! Report layout tree.
//!
//! The tree is engine-neutral: every block carries `Pagination` hints so the
//! paged renderer downstream can force a break before each printed page and
//! keep rows, cards and tables in one piece.

use crate::condition::{ConditionLabel, resolve_condition};
use crate::fields::{PLACEHOLDER, or_placeholder};
use crate::finding::Finding;
use crate::hazard::HazardRow;
use crate::input::ReportInput;
use crate::model::{AreaRating, format_score};
use crate::paginate::{KeyOrder, PHOTOS_PER_PAGE, PagedGroup, group_by_location, paginate};
use crate::photo::{ImageFallback, PhotoResolver};
use crate::tally::{ConditionCounts, count_conditions};
use std::collections::BTreeMap;
use tracing::debug;

pub const NO_SUMMARY: &str = "No summary provided.";
pub const NO_RATINGS: &str = "No area ratings recorded.";
pub const NO_DEFECTS: &str = "No defects recorded.";
pub const NO_PHOTOS: &str = "No photos recorded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakBefore {
    Auto,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakAfter {
    Auto,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakInside {
    Auto,
    Avoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub break_before: BreakBefore,
    pub break_after: BreakAfter,
    pub break_inside: BreakInside,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            break_before: BreakBefore::Auto,
            break_after: BreakAfter::Auto,
            break_inside: BreakInside::Auto,
        }
    }
}

impl Pagination {
    pub fn new_page() -> Self {
        Self {
            break_before: BreakBefore::Page,
            ..Self::default()
        }
    }

    pub fn keep_together() -> Self {
        Self {
            break_inside: BreakInside::Avoid,
            ..Self::default()
        }
    }

    /// CSS fragmentation declarations for this block, empty when all auto.
    pub fn css_declarations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.break_before == BreakBefore::Page {
            out.push("break-before: page");
        }
        if self.break_after == BreakAfter::Page {
            out.push("break-after: page");
        }
        if self.break_inside == BreakInside::Avoid {
            out.push("break-inside: avoid");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: String,
    pub value: usize,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCard {
    pub photo_id: String,
    pub src: Option<String>,
    pub fallback: ImageFallback,
    pub location: String,
    pub condition: ConditionLabel,
    pub comment: String,
    pub severity: String,
    pub priority: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Section,
    Page { label: String },
    Heading { level: u8, text: String },
    Paragraph(String),
    Fields(Vec<(String, String)>),
    Kpis(Vec<Kpi>),
    Table { columns: Vec<String> },
    TableRow(Vec<String>),
    PhotoGrid,
    Photo(PhotoCard),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub class: &'static str,
    pub pagination: Pagination,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind, class: &'static str) -> Self {
        Self {
            kind,
            class,
            pagination: Pagination::default(),
            children: Vec::new(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Block) {
        self.children.push(child);
    }

    fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::new(
            BlockKind::Heading {
                level,
                text: text.into(),
            },
            "heading",
        )
        .with_pagination(Pagination::keep_together())
    }

    fn placeholder(text: &str) -> Self {
        Block::new(BlockKind::Placeholder(text.to_string()), "placeholder")
            .with_pagination(Pagination::keep_together())
    }

    /// Depth-first walk, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Block)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub title: String,
    pub photos_per_page: usize,
    pub include_grouped_section: bool,
    pub include_appendix: bool,
    pub image_fallback: ImageFallback,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title: "Vessel Condition Survey".to_string(),
            photos_per_page: PHOTOS_PER_PAGE,
            include_grouped_section: true,
            include_appendix: true,
            image_fallback: ImageFallback::Hide,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub counts: ConditionCounts,
    pub sections: Vec<Block>,
}

impl ReportLayout {
    fn count_kind(&self, pred: impl Fn(&BlockKind) -> bool) -> usize {
        let mut count = 0usize;
        for section in &self.sections {
            section.walk(&mut |block| {
                if pred(&block.kind) {
                    count += 1;
                }
            });
        }
        count
    }

    /// Printed pages, assuming the title page fits on one sheet.
    pub fn page_count(&self) -> usize {
        self.count_kind(|kind| matches!(kind, BlockKind::Page { .. }))
    }

    pub fn placeholder_count(&self) -> usize {
        self.count_kind(|kind| matches!(kind, BlockKind::Placeholder(_)))
    }

    pub fn photo_count(&self) -> usize {
        self.count_kind(|kind| matches!(kind, BlockKind::Photo(_)))
    }

    pub fn section(&self, class: &str) -> Option<&Block> {
        self.sections.iter().find(|section| section.class == class)
    }
}

pub fn build_layout<R>(input: &ReportInput, resolver: &R, options: &LayoutOptions) -> ReportLayout
where
    R: PhotoResolver + ?Sized,
{
    let order = KeyOrder::new();
    let counts = count_conditions(&input.findings);
    let mut sections = vec![title_section(input, counts, &order, options)];

    if options.include_grouped_section {
        let groups = group_by_location(&input.findings, &order, options.photos_per_page);
        debug!(groups = groups.len(), "grouped findings by location");
        sections.push(grouped_section(&groups, resolver, options));
    }
    if options.include_appendix {
        let pages = paginate(&input.findings, options.photos_per_page);
        sections.push(appendix_section(&pages, resolver, options));
    }

    let layout = ReportLayout {
        title: options.title.clone(),
        counts,
        sections,
    };
    debug!(
        findings = input.findings.len(),
        hazards = input.hazards.len(),
        pages = layout.page_count(),
        placeholders = layout.placeholder_count(),
        "built report layout"
    );
    layout
}

fn title_section(
    input: &ReportInput,
    counts: ConditionCounts,
    order: &KeyOrder,
    options: &LayoutOptions,
) -> Block {
    let meta = &input.metadata;
    let mut page = Block::new(
        BlockKind::Page {
            label: "Title".to_string(),
        },
        "title-page",
    );

    page.push(Block::heading(1, options.title.clone()));
    if let Some(name) = meta.vessel_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        page.push(Block::new(BlockKind::Paragraph(name.to_string()), "vessel-name"));
    }
    page.push(
        Block::new(
            BlockKind::Fields(
                meta.particulars()
                    .into_iter()
                    .map(|(label, value)| (label.to_string(), value))
                    .collect(),
            ),
            "particulars",
        )
        .with_pagination(Pagination::keep_together()),
    );
    page.push(
        Block::new(
            BlockKind::Fields(vec![
                (
                    "Overall rating".to_string(),
                    or_placeholder(meta.overall_rating.as_deref()),
                ),
                ("Score".to_string(), format_score(meta.score)),
            ]),
            "overall",
        )
        .with_pagination(Pagination::keep_together()),
    );

    page.push(Block::heading(2, "Summary"));
    match meta.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(summary) => page.push(Block::new(BlockKind::Paragraph(summary.to_string()), "summary")),
        None => page.push(Block::placeholder(NO_SUMMARY)),
    }

    page.push(Block::heading(2, "Key findings"));
    page.push(kpi_block(counts));

    page.push(Block::heading(2, "Findings tally"));
    page.push(table(
        &["Category", "Count"],
        input
            .tally
            .rows()
            .iter()
            .map(|(label, count)| vec![(*label).to_string(), count.to_string()])
            .collect(),
        "tally",
    ));

    page.push(Block::heading(2, "Area scorecard"));
    page.push(scorecard_block(&input.area_ratings, input.average_score, order));

    page.push(Block::heading(2, "Defects"));
    page.push(defects_block(&input.hazards));

    Block::new(BlockKind::Section, "title").with_children(vec![page])
}

fn kpi_block(counts: ConditionCounts) -> Block {
    let kpis = vec![
        Kpi {
            label: ConditionLabel::FireHazard.display_name().to_string(),
            value: counts.fire_hazard,
            class: ConditionLabel::FireHazard.css_class(),
        },
        Kpi {
            label: ConditionLabel::TripFall.display_name().to_string(),
            value: counts.trip_fall,
            class: ConditionLabel::TripFall.css_class(),
        },
        Kpi {
            label: ConditionLabel::None.display_name().to_string(),
            value: counts.none,
            class: ConditionLabel::None.css_class(),
        },
    ];
    Block::new(BlockKind::Kpis(kpis), "kpis").with_pagination(Pagination::keep_together())
}

fn table(columns: &[&str], rows: Vec<Vec<String>>, class: &'static str) -> Block {
    let rows = rows
        .into_iter()
        .map(|cells| {
            Block::new(BlockKind::TableRow(cells), "row")
                .with_pagination(Pagination::keep_together())
        })
        .collect();
    Block::new(
        BlockKind::Table {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        },
        class,
    )
    .with_children(rows)
}

fn scorecard_block(
    ratings: &BTreeMap<String, AreaRating>,
    average: Option<f64>,
    order: &KeyOrder,
) -> Block {
    if ratings.is_empty() {
        return Block::placeholder(NO_RATINGS);
    }
    let mut areas: Vec<(&String, &AreaRating)> = ratings.iter().collect();
    areas.sort_by(|a, b| order.compare(a.0, b.0));
    let mut rows: Vec<Vec<String>> = areas
        .into_iter()
        .map(|(area, rating)| {
            vec![
                or_placeholder(Some(area.as_str())),
                format_score(rating.score),
                or_placeholder(rating.rating.as_deref()),
                or_placeholder(rating.remarks.as_deref()),
            ]
        })
        .collect();
    rows.push(vec![
        "Average".to_string(),
        format_score(average),
        PLACEHOLDER.to_string(),
        PLACEHOLDER.to_string(),
    ]);
    table(&["Area", "Score", "Rating", "Remarks"], rows, "scorecard")
}

fn defects_block(hazards: &[HazardRow]) -> Block {
    if hazards.is_empty() {
        return Block::placeholder(NO_DEFECTS);
    }
    let rows = hazards
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            vec![
                (idx + 1).to_string(),
                or_placeholder(row.photo_ref()),
                or_placeholder(row.area.as_deref()),
                row.condition_label()
                    .map(|label| label.display_name().to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                row.recommendation_text(),
                or_placeholder(row.assigned_to.as_deref()),
                or_placeholder(row.deadline.as_deref()),
            ]
        })
        .collect();
    table(
        &[
            "#",
            "Photo",
            "Area",
            "Condition",
            "Recommendation",
            "Assigned to",
            "Deadline",
        ],
        rows,
        "defects",
    )
}

fn photo_card<R>(finding: &Finding, resolver: &R, fallback: ImageFallback) -> PhotoCard
where
    R: PhotoResolver + ?Sized,
{
    let photo_id = finding.photo_id();
    let src = photo_id.and_then(|id| resolver.resolve(id).to_src());
    if src.is_none() {
        debug!(photo_id = photo_id.unwrap_or(PLACEHOLDER), "no image source; image omitted");
    }
    PhotoCard {
        photo_id: or_placeholder(photo_id),
        src,
        fallback,
        location: or_placeholder(finding.location_text()),
        condition: resolve_condition(finding),
        comment: or_placeholder(finding.comment_text()),
        severity: or_placeholder(finding.severity_text()),
        priority: or_placeholder(finding.priority_text()),
        recommendations: finding.recommendation_lines(),
    }
}

fn photo_grid<R>(page: &[&Finding], resolver: &R, fallback: ImageFallback) -> Block
where
    R: PhotoResolver + ?Sized,
{
    let cards = page
        .iter()
        .map(|finding| {
            let card = photo_card(finding, resolver, fallback);
            let class = card.condition.css_class();
            Block::new(BlockKind::Photo(card), class).with_pagination(Pagination::keep_together())
        })
        .collect();
    Block::new(BlockKind::PhotoGrid, "photo-grid").with_children(cards)
}

fn empty_photo_page(heading: &str, class: &'static str) -> Block {
    Block::new(
        BlockKind::Page {
            label: heading.to_string(),
        },
        class,
    )
    .with_pagination(Pagination::new_page())
    .with_children(vec![Block::heading(2, heading), Block::placeholder(NO_PHOTOS)])
}

fn grouped_section<R>(
    groups: &[PagedGroup<'_, Finding>],
    resolver: &R,
    options: &LayoutOptions,
) -> Block
where
    R: PhotoResolver + ?Sized,
{
    const HEADING: &str = "Photos by location";
    let mut pages = Vec::new();
    for group in groups {
        let total = group.pages.len();
        for (idx, members) in group.pages.iter().enumerate() {
            let mut page = Block::new(
                BlockKind::Page {
                    label: format!("{} ({}/{})", group.key, idx + 1, total),
                },
                "location-page",
            )
            .with_pagination(Pagination::new_page());
            if pages.is_empty() {
                page.push(Block::heading(2, HEADING));
            }
            page.push(Block::heading(3, group.key.clone()));
            page.push(Block::new(
                BlockKind::Paragraph(format!("Page {} of {}", idx + 1, total)),
                "page-of",
            ));
            page.push(photo_grid(members, resolver, options.image_fallback));
            pages.push(page);
        }
    }
    if pages.is_empty() {
        pages.push(empty_photo_page(HEADING, "location-page"));
    }
    Block::new(BlockKind::Section, "photos-by-location").with_children(pages)
}

fn appendix_section<R>(pages: &[Vec<&Finding>], resolver: &R, options: &LayoutOptions) -> Block
where
    R: PhotoResolver + ?Sized,
{
    const HEADING: &str = "Photo appendix";
    let total = pages.len();
    let mut blocks: Vec<Block> = pages
        .iter()
        .enumerate()
        .map(|(idx, members)| {
            Block::new(
                BlockKind::Page {
                    label: format!("Appendix ({}/{})", idx + 1, total),
                },
                "appendix-page",
            )
            .with_pagination(Pagination::new_page())
            .with_children(vec![
                Block::heading(2, HEADING),
                Block::new(
                    BlockKind::Paragraph(format!("Page {} of {}", idx + 1, total)),
                    "page-of",
                ),
                photo_grid(members, resolver, options.image_fallback),
            ])
        })
        .collect();
    if blocks.is_empty() {
        blocks.push(empty_photo_page(HEADING, "appendix-page"));
    }
    Block::new(BlockKind::Section, "photo-appendix").with_children(blocks)
}
