use kuchiki::NodeRef;
use surveyprint::{NoPhotos, PLACEHOLDER, ROOT_ID, ReportInput, SurveyPrint};

const SURVEY: &str = r#"{
    "metadata": {
        "vesselName": "MV Northern Star",
        "imo": "9321483",
        "summary": "General condition fair.",
        "score": 7.84
    },
    "findings": [
        { "id": "P1", "location": "Deck", "condition": "fire_hazard", "comment": "Oily rags near exhaust" },
        { "photoId": "P2", "location": " Deck ", "condition_type": "trip_fall" },
        { "id": "P3", "location": "Bridge", "tags": { "rust_stains": true } },
        { "id": "P4", "condition": "None" },
        { "id": "P5", "location": "Bridge", "condition": "none" },
        { "id": "P6", "location": "Deck", "condition": "fire_hazard" },
        { "id": "P7", "location": "Deck", "condition": "fire_hazard" },
        { "id": "P8", "location": "Deck", "condition": "trip_fall" }
    ],
    "hazards": [
        { "photoId": "P1", "area": "Deck", "condition": "fire_hazard", "manual": true,
          "combined": "Area: Deck\nRecs: Remove rags; fit metal bin" },
        { "rawId": "P2", "area": "Deck", "recommendations": ["Secure cable", "Mark edge"] }
    ],
    "areaRatings": {
        "deck": { "score": 6.5, "rating": "Fair" },
        "Bridge": { "score": 8.0, "rating": "Good" }
    },
    "averageScore": 7.25,
    "findingsTally": { "fire": 3, "trip": 2, "rust": 1, "attention": 0 }
}"#;

fn printer() -> SurveyPrint {
    SurveyPrint::builder().build().expect("default printer")
}

fn texts(root: &NodeRef, selector: &str) -> Vec<String> {
    root.select(selector)
        .expect("valid selector")
        .map(|node| node.as_node().text_contents().trim().to_string())
        .collect()
}

fn page_labels(root: &NodeRef, section: &str) -> Vec<String> {
    root.select(&format!("section.{section} div.page"))
        .expect("valid selector")
        .filter_map(|node| {
            node.attributes
                .borrow()
                .get("data-page-label")
                .map(str::to_string)
        })
        .collect()
}

#[test]
fn kpis_count_only_fire_trip_and_none() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let values = texts(rendered.root(), ".kpi .kpi-value");
    // P4's "None" is an explicit label of its own, not the `none` bucket
    assert_eq!(values, vec!["3", "2", "1"]);
}

#[test]
fn explicit_conditions_print_verbatim() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let p4 = rendered
        .root()
        .select_first("section.photo-appendix figure[data-photo-id=\"P4\"]")
        .expect("P4 card");
    assert_eq!(p4.attributes.borrow().get("data-condition"), Some("None"));
}

#[test]
fn root_is_addressable_by_id() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let found = rendered
        .document()
        .select_first(&format!("#{ROOT_ID}"))
        .expect("root element present");
    assert!(found.as_node() == rendered.root());
}

#[test]
fn location_pages_are_sorted_and_capped_at_four() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let labels = page_labels(rendered.root(), "photos-by-location");
    assert_eq!(
        labels,
        vec![
            "Bridge (1/1)",
            "Deck (1/2)",
            "Deck (2/2)",
            "Unspecified area (1/1)"
        ]
    );
    for page in rendered
        .root()
        .select("section.photos-by-location div.page")
        .expect("valid selector")
    {
        let cards = page
            .as_node()
            .select("figure.photo-card")
            .expect("valid selector")
            .count();
        assert!((1..=4).contains(&cards));
    }
}

#[test]
fn appendix_keeps_input_order() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let ids: Vec<String> = rendered
        .root()
        .select("section.photo-appendix figure.photo-card")
        .expect("valid selector")
        .filter_map(|node| {
            node.attributes
                .borrow()
                .get("data-photo-id")
                .map(str::to_string)
        })
        .collect();
    assert_eq!(ids, vec!["P1", "P2", "P3", "P4", "P5", "P6", "P7", "P8"]);
    assert_eq!(
        page_labels(rendered.root(), "photo-appendix"),
        vec!["Appendix (1/2)", "Appendix (2/2)"]
    );
}

#[test]
fn defect_recommendations_drop_prefix_and_join_lists() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let cells = texts(rendered.root(), "table.defects tbody td");
    assert!(cells.contains(&"Remove rags; fit metal bin".to_string()));
    assert!(cells.contains(&"Secure cable; Mark edge".to_string()));
}

#[test]
fn missing_fields_print_placeholders() {
    let rendered = printer()
        .render_json(SURVEY, &NoPhotos)
        .expect("render survey");
    let particulars = texts(rendered.root(), "dl.particulars dd");
    assert!(particulars.contains(&"MV Northern Star".to_string()));
    assert!(particulars.contains(&PLACEHOLDER.to_string()));
    assert_eq!(rendered.stats().images, 0);
    assert_eq!(rendered.stats().images_omitted, 16);
}

#[test]
fn urls_render_images_that_hide_on_error() {
    let resolver = |id: &str| format!("https://photos.example/{id}.jpg");
    let rendered = printer()
        .render_json(SURVEY, &resolver)
        .expect("render survey");
    let images: Vec<_> = rendered
        .root()
        .select("img.hide-on-error")
        .expect("valid selector")
        .collect();
    assert_eq!(images.len(), 16);
    let attrs = images[0].attributes.borrow();
    assert_eq!(attrs.get("src"), Some("https://photos.example/P3.jpg"));
    assert!(attrs.get("onerror").is_some());
}

#[test]
fn empty_input_still_renders_every_section() {
    let rendered = printer().render(&ReportInput::default(), &NoPhotos);
    assert_eq!(texts(rendered.root(), ".kpi .kpi-value"), vec!["0", "0", "0"]);
    let html = rendered.to_html();
    assert!(html.contains("No summary provided."));
    assert!(html.contains("No photos recorded."));
    // title, empty location page, empty appendix page
    assert_eq!(rendered.page_count(), 3);
}

#[test]
fn rendering_is_deterministic() {
    let printer = printer();
    let first = printer.render_json(SURVEY, &NoPhotos).expect("first");
    let second = printer.render_json(SURVEY, &NoPhotos).expect("second");
    assert_eq!(first.fingerprint_sha256(), second.fingerprint_sha256());
    assert_eq!(first.fingerprint_sha256().len(), 64);
}
