//! End-to-end coverage of the extraction pipeline on fixture data: rendered
//! snapshot → link discovery → segmentation → matching → report export.

use async_trait::async_trait;
use clausecrawl::{
    extract_pdf_links, segment, ExportOptions, MatchResult, RenderError, RenderedPage, Renderer,
    RunReport, TriggerVocabulary,
};
use pretty_assertions::assert_eq;
use url::Url;

const LISTING_HTML: &str = include_str!("fixtures/html/listing.html");

/// Renderer double standing in for either rendering strategy.
struct FixtureRenderer {
    html: &'static str,
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        Ok(RenderedPage {
            base: url.clone(),
            html: self.html.to_string(),
        })
    }
}

fn listing_url() -> Url {
    Url::parse("https://sede.example.org/licitaciones/2024-017").expect("listing url")
}

#[tokio::test]
async fn discovery_through_a_renderer_double() {
    let renderer = FixtureRenderer {
        html: LISTING_HTML,
    };
    let page = renderer.render(&listing_url()).await.expect("render");
    let links = extract_pdf_links(&page.html, &page.base, 64).expect("extract links");

    let urls: Vec<String> = links.into_iter().map(String::from).collect();
    assert_eq!(
        urls,
        vec![
            "https://sede.example.org/docs/anuncio.pdf",
            "https://sede.example.org/docs/pliego-administrativo.pdf",
            "https://sede.example.org/docs/pliego-tecnico.PDF",
            "https://sede.example.org/licitaciones/docs/pliego-administrativo.pdf",
        ]
    );
}

#[test]
fn a_dated_extension_clause_matches_exactly_once() {
    let text = "La empresa podrá solicitar la prórroga antes del 01/01/2025.";
    let blocks = segment(text);
    let matches = TriggerVocabulary::default().matching_blocks(&blocks);
    assert_eq!(matches.len(), 1);
    assert!(matches[0].text.contains("prórroga"));
}

#[test]
fn document_text_flows_into_a_reportable_result() {
    let text = "CLÁUSULA PRIMERA\n\nEl contrato tendrá una duración de dos años. \
                La prórroga se acordará antes del 01/01/2025.\n\n\
                CLÁUSULA SEGUNDA\n\nEl pago se realizará por mensualidades.";
    let vocabulary = TriggerVocabulary::default();
    let matches = vocabulary.matching_blocks(&segment(text));
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].text,
        "La prórroga se acordará antes del 01/01/2025."
    );

    let report = RunReport::new(
        String::from("https://sede.example.org/licitaciones/2024-017"),
        vec![MatchResult::ok(
            String::from("https://sede.example.org/docs/pliego-administrativo.pdf"),
            matches,
        )],
    );
    let csv = report.to_csv(&ExportOptions::default());
    assert_eq!(
        csv.lines().nth(1),
        Some(
            "https://sede.example.org/docs/pliego-administrativo.pdf,ok,\
             La prórroga se acordará antes del 01/01/2025."
        )
    );
}

#[test]
fn rebuilding_the_report_from_the_same_inputs_is_idempotent() {
    let build = || {
        let links =
            extract_pdf_links(LISTING_HTML, &listing_url(), 64).expect("extract links");
        let results = links
            .into_iter()
            .map(|link| MatchResult::ok(link.to_string(), Vec::new()))
            .collect();
        RunReport::new(listing_url().to_string(), results)
    };

    let first = build().to_csv(&ExportOptions::default());
    let second = build().to_csv(&ExportOptions::default());
    assert_eq!(first, second);

    // Reversed completion order normalizes to the same report.
    let links = extract_pdf_links(LISTING_HTML, &listing_url(), 64).expect("extract links");
    let reversed: Vec<MatchResult> = links
        .into_iter()
        .rev()
        .map(|link| MatchResult::ok(link.to_string(), Vec::new()))
        .collect();
    let shuffled = RunReport::new(listing_url().to_string(), reversed);
    assert_eq!(shuffled.to_csv(&ExportOptions::default()), first);
}
