use crate::fields::PLACEHOLDER;
use crate::layout::{Block, BlockKind, BreakAfter, BreakBefore, BreakInside, PhotoCard, ReportLayout};
use html5ever::{LocalName, QualName, namespace_url, ns};
use kuchiki::{Attribute, ExpandedName, NodeRef};
use sha2::{Digest, Sha256};

/// Id of the element handed to the export engine.
pub const ROOT_ID: &str = "survey-report-root";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pages: usize,
    pub images: usize,
    pub images_omitted: usize,
    pub placeholders: usize,
}

/// Rendered report DOM with a handle on the export root.
pub struct RenderedReport {
    document: NodeRef,
    root: NodeRef,
    stats: RenderStats,
}

impl RenderedReport {
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// The `#survey-report-root` element to capture for export.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn into_root(self) -> NodeRef {
        self.root
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn page_count(&self) -> usize {
        self.stats.pages
    }

    pub fn to_html(&self) -> String {
        self.document.to_string()
    }

    /// SHA-256 of the serialized document, lowercase hex.
    pub fn fingerprint_sha256(&self) -> String {
        hex_sha256(self.to_html().as_bytes())
    }
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn element(tag: &str, attrs: Vec<(&str, String)>) -> NodeRef {
    NodeRef::new_element(
        QualName::new(None, ns!(html), LocalName::from(tag)),
        attrs.into_iter().map(|(name, value)| {
            (
                ExpandedName::new(ns!(), LocalName::from(name)),
                Attribute {
                    prefix: None,
                    value,
                },
            )
        }),
    )
}

fn text_element(tag: &str, class: &str, text: &str) -> NodeRef {
    let attrs = if class.is_empty() {
        Vec::new()
    } else {
        vec![("class", class.to_string())]
    };
    let node = element(tag, attrs);
    node.append(NodeRef::new_text(text));
    node
}

struct DomBuilder {
    stats: RenderStats,
}

impl DomBuilder {
    fn block_attrs(&self, block: &Block, base_class: &str) -> Vec<(&'static str, String)> {
        let mut classes: Vec<&str> = Vec::new();
        if !base_class.is_empty() {
            classes.push(base_class);
        }
        if !block.class.is_empty() && block.class != base_class {
            classes.push(block.class);
        }
        if block.pagination.break_before == BreakBefore::Page {
            classes.push("break-before-page");
        }
        if block.pagination.break_after == BreakAfter::Page {
            classes.push("break-after-page");
        }
        if block.pagination.break_inside == BreakInside::Avoid {
            classes.push("avoid-break");
        }
        let mut attrs = Vec::new();
        if !classes.is_empty() {
            attrs.push(("class", classes.join(" ")));
        }
        let declarations = block.pagination.css_declarations();
        if !declarations.is_empty() {
            attrs.push(("style", declarations.join("; ")));
        }
        attrs
    }

    fn render(&mut self, block: &Block) -> NodeRef {
        match &block.kind {
            BlockKind::Section => {
                let node = element("section", self.block_attrs(block, "section"));
                self.append_children(&node, block);
                node
            }
            BlockKind::Page { label } => {
                self.stats.pages += 1;
                let mut attrs = self.block_attrs(block, "page");
                attrs.push(("data-page-label", label.clone()));
                let node = element("div", attrs);
                self.append_children(&node, block);
                node
            }
            BlockKind::Heading { level, text } => {
                let tag = format!("h{}", (*level).clamp(1, 6));
                let node = element(&tag, self.block_attrs(block, ""));
                node.append(NodeRef::new_text(text.as_str()));
                node
            }
            BlockKind::Paragraph(text) => {
                let node = element("p", self.block_attrs(block, ""));
                node.append(NodeRef::new_text(text.as_str()));
                node
            }
            BlockKind::Fields(pairs) => {
                let node = element("dl", self.block_attrs(block, "fields"));
                for (label, value) in pairs {
                    node.append(text_element("dt", "", label));
                    node.append(text_element("dd", "", value));
                }
                node
            }
            BlockKind::Kpis(kpis) => {
                let node = element("div", self.block_attrs(block, "kpis"));
                for kpi in kpis {
                    let card = element("div", vec![("class", format!("kpi {}", kpi.class))]);
                    card.append(text_element("div", "kpi-value", &kpi.value.to_string()));
                    card.append(text_element("div", "kpi-label", &kpi.label));
                    node.append(card);
                }
                node
            }
            BlockKind::Table { columns } => {
                let node = element("table", self.block_attrs(block, ""));
                let head = element("thead", Vec::new());
                let head_row = element("tr", Vec::new());
                for column in columns {
                    head_row.append(text_element("th", "", column));
                }
                head.append(head_row);
                node.append(head);
                let body = element("tbody", Vec::new());
                self.append_children(&body, block);
                node.append(body);
                node
            }
            BlockKind::TableRow(cells) => {
                let node = element("tr", self.block_attrs(block, ""));
                for cell in cells {
                    node.append(text_element("td", "", cell));
                }
                node
            }
            BlockKind::PhotoGrid => {
                let node = element("div", self.block_attrs(block, "photo-grid"));
                self.append_children(&node, block);
                node
            }
            BlockKind::Photo(card) => self.photo(block, card),
            BlockKind::Placeholder(text) => {
                self.stats.placeholders += 1;
                let node = element("p", self.block_attrs(block, "placeholder"));
                node.append(NodeRef::new_text(text.as_str()));
                node
            }
        }
    }

    fn append_children(&mut self, node: &NodeRef, block: &Block) {
        for child in &block.children {
            node.append(self.render(child));
        }
    }

    fn photo(&mut self, block: &Block, card: &PhotoCard) -> NodeRef {
        let mut attrs = self.block_attrs(block, "photo-card");
        attrs.push(("data-photo-id", card.photo_id.clone()));
        attrs.push(("data-condition", card.condition.as_str().to_string()));
        let figure = element("figure", attrs);

        match &card.src {
            Some(src) => {
                self.stats.images += 1;
                let mut img_attrs = vec![
                    ("src", src.clone()),
                    ("alt", format!("Photo {}", card.photo_id)),
                ];
                if let Some(script) = card.fallback.onerror_script() {
                    img_attrs.push(("class", "hide-on-error".to_string()));
                    img_attrs.push(("onerror", script.to_string()));
                }
                figure.append(element("img", img_attrs));
            }
            None => self.stats.images_omitted += 1,
        }

        let caption = element("figcaption", vec![("class", "photo-caption".to_string())]);
        let badge = match card.condition.display_name() {
            name if name.trim().is_empty() => PLACEHOLDER,
            name => name,
        };
        caption.append(text_element(
            "span",
            &format!("badge {}", card.condition.css_class()),
            badge,
        ));
        let fields = element("dl", vec![("class", "fields photo-fields".to_string())]);
        for (label, value) in [
            ("Photo", &card.photo_id),
            ("Location", &card.location),
            ("Comment", &card.comment),
            ("Severity", &card.severity),
            ("Priority", &card.priority),
        ] {
            fields.append(text_element("dt", "", label));
            fields.append(text_element("dd", "", value));
        }
        caption.append(fields);
        if card.recommendations.is_empty() {
            caption.append(text_element("p", "recommendations", PLACEHOLDER));
        } else {
            let list = element("ul", vec![("class", "recommendations".to_string())]);
            for line in &card.recommendations {
                list.append(text_element("li", "", line));
            }
            caption.append(list);
        }
        figure.append(caption);
        figure
    }
}

/// Build the printable DOM for `layout` with `stylesheet` inlined in `<head>`.
pub fn render_dom(layout: &ReportLayout, stylesheet: &str) -> RenderedReport {
    let document = NodeRef::new_document();
    document.append(NodeRef::new_doctype("html", "", ""));

    let html = element("html", vec![("lang", "en".to_string())]);
    let head = element("head", Vec::new());
    head.append(element("meta", vec![("charset", "utf-8".to_string())]));
    head.append(text_element("title", "", &layout.title));
    let style = element("style", Vec::new());
    style.append(NodeRef::new_text(stylesheet));
    head.append(style);
    html.append(head);

    let body = element("body", Vec::new());
    let root = element(
        "main",
        vec![
            ("id", ROOT_ID.to_string()),
            ("class", "survey-report".to_string()),
        ],
    );
    let mut builder = DomBuilder {
        stats: RenderStats::default(),
    };
    for section in &layout.sections {
        root.append(builder.render(section));
    }
    body.append(root.clone());
    html.append(body);
    document.append(html);

    RenderedReport {
        document,
        root,
        stats: builder.stats,
    }
}
