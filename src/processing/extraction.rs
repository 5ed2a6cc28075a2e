//! PDF text extraction.
//!
//! Extraction is split in two: a [`PdfTextExtractor`] turns bytes into per-page text, where a page
//! that yields nothing is `None`, and [`join_pages`] stitches those pages into one string. Only a
//! document that cannot be opened at all is an error; a bad page contributes an empty string.

use crate::config::PageJoin;
use lopdf::Document;
use std::sync::Arc;

use super::types::ExtractionError;

/// Ordered concatenation of every page's text for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Joined document text.
    pub text: String,
    /// Number of pages the document reported.
    pub page_count: usize,
}

/// Converts raw PDF bytes into per-page text, in document order.
pub trait PdfTextExtractor: Send + Sync {
    /// Return one entry per page. `None` marks a page whose text could not be extracted.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, ExtractionError>;
}

/// Pure-Rust extractor backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfTextExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
        let document =
            Document::load_mem(bytes).map_err(|error| ExtractionError::Parse(error.to_string()))?;

        let pages = document
            .get_pages()
            .into_keys()
            .map(|page_number| match document.extract_text(&[page_number]) {
                // lopdf terminates every text object with a newline; keep page bodies bare.
                Ok(text) => Some(text.trim_end().to_string()),
                Err(error) => {
                    tracing::debug!(page = page_number, error = %error, "Page yielded no text");
                    None
                }
            })
            .collect();

        Ok(pages)
    }
}

/// Join per-page text with `join`, treating missing pages as empty strings.
pub fn join_pages<I>(pages: I, join: PageJoin) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    pages
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>()
        .join(join.separator())
}

/// Run `extractor` on a blocking worker and join the resulting pages.
pub async fn extract_text(
    extractor: Arc<dyn PdfTextExtractor>,
    bytes: Vec<u8>,
    join: PageJoin,
) -> Result<ExtractedText, ExtractionError> {
    let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
        .await
        .map_err(|error| ExtractionError::Worker(error.to_string()))??;

    let page_count = pages.len();
    let missing = pages.iter().filter(|page| page.is_none()).count();
    if missing > 0 {
        tracing::warn!(page_count, missing, "Some pages yielded no text");
    }

    Ok(ExtractedText {
        text: join_pages(pages, join),
        page_count,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build an in-memory PDF with one page per entry; `None` produces a page without content.
    pub(crate) fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for page in pages {
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            };
            if let Some(text) = page {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page_dict.set("Contents", content_id);
            }
            kids.push(Object::from(doc.add_object(page_dict)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn join_pages_substitutes_empty_for_missing_pages() {
        let pages = vec![Some("Hello".to_string()), None, Some("World".to_string())];
        assert_eq!(join_pages(pages, PageJoin::Newline), "Hello\n\nWorld");
    }

    #[test]
    fn join_pages_can_concatenate_directly() {
        let pages = vec![Some("Hello".to_string()), None, Some("World".to_string())];
        assert_eq!(join_pages(pages, PageJoin::Concat), "HelloWorld");
    }

    #[test]
    fn join_pages_handles_empty_document() {
        assert_eq!(join_pages(Vec::new(), PageJoin::Newline), "");
    }

    #[test]
    fn lopdf_extractor_reads_pages_in_order() {
        let bytes = build_pdf(&[Some("Hello"), None, Some("World")]);
        let pages = LopdfExtractor.extract_pages(&bytes).expect("pages");

        assert_eq!(pages.len(), 3);
        assert!(pages[0].as_deref().unwrap_or_default().contains("Hello"));
        assert!(pages[1].as_deref().unwrap_or_default().is_empty());
        assert!(pages[2].as_deref().unwrap_or_default().contains("World"));
    }

    #[test]
    fn lopdf_extractor_rejects_corrupt_bytes() {
        let error = LopdfExtractor
            .extract_pages(b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(error, ExtractionError::Parse(_)));
    }

    #[tokio::test]
    async fn extract_text_reports_page_count() {
        let bytes = build_pdf(&[Some("Alpha"), Some("Beta")]);
        let extracted = extract_text(Arc::new(LopdfExtractor), bytes, PageJoin::Newline)
            .await
            .expect("extracted");

        assert_eq!(extracted.page_count, 2);
        let alpha = extracted.text.find("Alpha").expect("alpha present");
        let beta = extracted.text.find("Beta").expect("beta present");
        assert!(alpha < beta);
    }
}
