//! Batch orchestration.
//!
//! A batch opens the template once, applies its items strictly in the
//! caller-supplied order, and serializes once. Ordering matters: an image
//! replacement swaps a node in the shape tree, and a later item resolving
//! the same slide must see the post-mutation tree.
//!
//! Failure policy: one item's error is recorded against that item and the
//! batch continues; the document is never left in an unserializable state,
//! so the output always reflects every item that did succeed. Only a
//! template that cannot be opened (or a package that cannot be serialized)
//! fails the batch as a whole.

use crate::content::{SlideContent, SlideKind};
use crate::fetch::ImageFetcher;
use crate::mutate::{self, MutationError};
use crate::pptx::document::Document;
use crate::pptx::error::Result;
use log::{debug, warn};

/// Applies ordered batches of content descriptors to template documents.
///
/// Dependencies are injected at construction; the orchestrator itself is
/// stateless between runs and never shares an open document across
/// requests.
pub struct BatchOrchestrator {
    fetcher: Box<dyn ImageFetcher>,
}

/// The result of one batch run.
pub struct BatchOutcome {
    /// The serialized document, reflecting every successful item
    pub bytes: Vec<u8>,
    /// Per-item outcomes, in request order
    pub results: Vec<ItemResult>,
}

/// Outcome of a single batch item.
#[derive(Debug)]
pub struct ItemResult {
    /// Position of the item in the request
    pub index: usize,
    pub kind: SlideKind,
    /// The failure, when the item did not apply
    pub error: Option<MutationError>,
}

impl ItemResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl BatchOrchestrator {
    pub fn new(fetcher: Box<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Open `template`, apply `items` in order, serialize.
    pub fn run(&self, template: &[u8], items: &[SlideContent]) -> Result<BatchOutcome> {
        let mut doc = Document::open(template)?;
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let outcome = mutate::apply_content(&mut doc, item, self.fetcher.as_ref());
            match &outcome {
                Ok(()) => debug!("batch item {index} ({}) applied", item.kind()),
                Err(e) => warn!("batch item {index} ({}) failed: {e}", item.kind()),
            }
            results.push(ItemResult {
                index,
                kind: item.kind(),
                error: outcome.err(),
            });
        }

        let bytes = doc.save()?;
        Ok(BatchOutcome { bytes, results })
    }

    /// Apply a single item against an already open document.
    ///
    /// Unlike [`run`](Self::run), the error is returned to the caller:
    /// single-slide mode treats a failed mutation as fatal.
    pub fn apply(
        &self,
        doc: &mut Document,
        item: &SlideContent,
    ) -> std::result::Result<(), MutationError> {
        mutate::apply_content(doc, item, self.fetcher.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stubs::MapFetcher;
    use crate::opc::packuri::PackURI;
    use crate::pptx::fixtures;

    fn points_item(slide_number: u32) -> SlideContent {
        serde_json::from_str(&format!(
            r#"{{"kind": "points", "slideNumber": {slide_number}, "header": "Overview",
                "description": "Key points", "points": [{{"text": "A"}}, {{"text": "B"}}]}}"#
        ))
        .unwrap()
    }

    fn points_template() -> Vec<u8> {
        fixtures::PackageBuilder::new()
            .slide(fixtures::slide_xml(&[
                fixtures::text_shape(2, "Header1", "old header"),
                fixtures::text_shape(3, "Description1", "old description"),
                fixtures::text_shape(4, "Points", "old points"),
            ]))
            .build()
    }

    fn slide_part_text(bytes: &[u8], part: &str) -> String {
        let doc = Document::open(bytes).unwrap();
        let partname = PackURI::new(part).unwrap();
        String::from_utf8(
            doc.package()
                .get_part(&partname)
                .unwrap()
                .blob()
                .to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn test_points_end_to_end() {
        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&points_template(), &[points_item(1)]).unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert!(outcome.results[0].is_ok());

        let doc = Document::open(&outcome.bytes).unwrap();
        let slide = doc.load_slide(0).unwrap();
        let texts: Vec<(String, String)> = slide
            .shapes()
            .map(|(_, s)| {
                let body = s.text_body().unwrap().unwrap();
                (s.name().to_string(), body.text())
            })
            .collect();

        assert_eq!(
            texts,
            vec![
                ("Header1".to_string(), "Overview".to_string()),
                ("Description1".to_string(), "Key points".to_string()),
                ("Points".to_string(), "• A\n• B".to_string()),
            ]
        );
    }

    #[test]
    fn test_batch_isolation_middle_item_fails() {
        let template = fixtures::PackageBuilder::new()
            .slide(fixtures::slide_xml(&[
                fixtures::text_shape(2, "Header1", "one"),
                fixtures::text_shape(3, "Description1", "one"),
            ]))
            .slide(fixtures::slide_xml(&[
                fixtures::text_shape(2, "Header1", "two"),
                fixtures::text_shape(3, "Description1", "two"),
            ]))
            .build();

        let items = [points_item(1), points_item(99), points_item(2)];
        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&template, &items).unwrap();

        assert!(outcome.results[0].is_ok());
        assert!(matches!(
            outcome.results[1].error,
            Some(MutationError::SlideOutOfRange {
                requested: 99,
                count: 2
            })
        ));
        assert!(outcome.results[2].is_ok());

        // Output reflects the two items that succeeded
        let doc = Document::open(&outcome.bytes).unwrap();
        for index in 0..2 {
            let slide = doc.load_slide(index).unwrap();
            let (_, header) = slide.shapes().next().unwrap();
            assert_eq!(header.text_body().unwrap().unwrap().text(), "Overview");
        }
    }

    #[test]
    fn test_slide_number_zero_is_out_of_range() {
        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&points_template(), &[points_item(0)]).unwrap();
        assert!(matches!(
            outcome.results[0].error,
            Some(MutationError::SlideOutOfRange {
                requested: 0,
                count: 1
            })
        ));
    }

    #[test]
    fn test_slot_absence_completes_without_error() {
        // Template with no matching slots at all
        let template = fixtures::PackageBuilder::new()
            .slide(fixtures::slide_xml(&[fixtures::text_shape(
                2, "Unrelated", "keep me",
            )]))
            .build();

        // Descriptor whose header/description keywords match nothing
        let item: SlideContent = serde_json::from_str(
            r#"{"kind": "statistics", "slideNumber": 1, "title": "T",
                "stats": [{"label": "L", "value": "V"}]}"#,
        )
        .unwrap();

        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&template, &[item]).unwrap();
        assert!(outcome.results[0].is_ok());

        // Nothing changed: not the slide, not its bytes
        let slide_xml = slide_part_text(&outcome.bytes, "/ppt/slides/slide1.xml");
        assert!(slide_xml.contains("<a:t>keep me</a:t>"));
    }

    #[test]
    fn test_mutation_is_idempotent() {
        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));

        let once = engine.run(&points_template(), &[points_item(1)]).unwrap();
        let twice = engine
            .run(&points_template(), &[points_item(1), points_item(1)])
            .unwrap();

        assert_eq!(
            slide_part_text(&once.bytes, "/ppt/slides/slide1.xml"),
            slide_part_text(&twice.bytes, "/ppt/slides/slide1.xml"),
        );
    }

    #[test]
    fn test_unfetchable_image_keeps_template_picture() {
        let template = fixtures::PackageBuilder::new()
            .slide_with_images(
                fixtures::slide_xml(&[
                    fixtures::text_shape(2, "Header1", "old"),
                    fixtures::text_shape(3, "Description1", "old"),
                    fixtures::picture_shape(4, "Image", "rId1"),
                ]),
                vec![("rId1".to_string(), "image1.png".to_string())],
            )
            .media("image1.png", fixtures::png_bytes())
            .build();

        let item: SlideContent = serde_json::from_str(
            r#"{"kind": "points", "slideNumber": 1, "header": "New header",
                "description": "New description",
                "imageUrl": "https://unreachable.invalid/logo.png"}"#,
        )
        .unwrap();

        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&template, &[item]).unwrap();
        assert!(outcome.results[0].is_ok());

        let doc = Document::open(&outcome.bytes).unwrap();
        let slide = doc.load_slide(0).unwrap();

        // Text slots updated
        let (_, header) = slide.shapes().next().unwrap();
        assert_eq!(header.text_body().unwrap().unwrap().text(), "New header");

        // Picture node untouched, still pointing at the template media
        let picture = slide
            .shapes()
            .find(|(_, s)| s.name() == "Image")
            .map(|(_, s)| s)
            .unwrap();
        assert_eq!(picture.blip_rid().as_deref(), Some("rId1"));

        // And the template media part survived as-is
        let media = doc
            .package()
            .get_part(&PackURI::new("/ppt/media/image1.png").unwrap())
            .unwrap();
        assert_eq!(media.blob(), fixtures::png_bytes().as_slice());
    }

    #[test]
    fn test_successful_image_swap_preserves_geometry_and_position() {
        let template = fixtures::PackageBuilder::new()
            .slide_with_images(
                fixtures::slide_xml(&[
                    fixtures::text_shape(2, "Header1", "old"),
                    fixtures::text_shape(3, "Description1", "old"),
                    fixtures::picture_shape(4, "Image", "rId1"),
                    fixtures::text_shape(5, "Footer", "still here"),
                ]),
                vec![("rId1".to_string(), "image1.png".to_string())],
            )
            .media("image1.png", fixtures::png_bytes())
            .build();

        let url = "https://cdn.example.com/new.png";
        let fetcher = MapFetcher::new([(url.to_string(), fixtures::other_png_bytes())]);

        let item: SlideContent = serde_json::from_str(&format!(
            r#"{{"kind": "points", "slideNumber": 1, "header": "H",
                "description": "D", "imageUrl": "{url}"}}"#
        ))
        .unwrap();

        let engine = BatchOrchestrator::new(Box::new(fetcher));
        let outcome = engine.run(&template, &[item]).unwrap();
        assert!(outcome.results[0].is_ok());

        let doc = Document::open(&outcome.bytes).unwrap();
        let slide = doc.load_slide(0).unwrap();

        // Same tree position, same name, same bounding box, new media
        let shapes: Vec<&str> = slide.shapes().map(|(_, s)| s.name()).collect();
        assert_eq!(shapes, vec!["Header1", "Description1", "Image", "Footer"]);

        let picture = slide
            .shapes()
            .find(|(_, s)| s.name() == "Image")
            .map(|(_, s)| s)
            .unwrap();
        let geometry = picture.geometry();
        assert_eq!(
            (geometry.x, geometry.y, geometry.cx, geometry.cy),
            (914400, 685800, 1828800, 1371600)
        );

        let rid = picture.blip_rid().unwrap();
        assert_ne!(rid, "rId1");

        // New media part holds the fetched bytes
        let media = doc
            .package()
            .get_part(&PackURI::new("/ppt/media/image2.png").unwrap())
            .unwrap();
        assert_eq!(media.blob(), fixtures::other_png_bytes().as_slice());
    }

    #[test]
    fn test_table_clips_to_template_grid() {
        let template = fixtures::PackageBuilder::new()
            .slide(fixtures::slide_xml(&[
                fixtures::text_shape(2, "Title", "old"),
                fixtures::table_shape(3, "Table 1", 3, 3),
            ]))
            .build();

        // 5x3 input into a 3x3 template: rows 3 and 4 dropped
        let item: SlideContent = serde_json::from_str(
            r#"{"kind": "table", "slideNumber": 1, "title": "Grid",
                "tableData": [["a0", "b0", "c0"], ["a1", "b1", "c1"], ["a2", "b2", "c2"],
                              ["a3", "b3", "c3"], ["a4", "b4", "c4"]]}"#,
        )
        .unwrap();

        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        let outcome = engine.run(&template, &[item]).unwrap();
        assert!(outcome.results[0].is_ok());

        let xml = slide_part_text(&outcome.bytes, "/ppt/slides/slide1.xml");
        for wrote in ["a0", "c0", "a2", "c2"] {
            assert!(xml.contains(&format!("<a:t>{wrote}</a:t>")), "missing {wrote}");
        }
        for dropped in ["a3", "c3", "a4", "c4"] {
            assert!(!xml.contains(dropped), "should have dropped {dropped}");
        }
    }

    #[test]
    fn test_invalid_template_fails_batch() {
        let engine = BatchOrchestrator::new(Box::new(MapFetcher::empty()));
        assert!(engine.run(b"not a zip archive", &[points_item(1)]).is_err());
    }
}
