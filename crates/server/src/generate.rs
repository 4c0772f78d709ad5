//! Script to package conversion.

use crate::error::AppError;
use deck_core::{split_documents, ImageFetcher, Renderer};
use deck_pptx::PptxWriter;

/// File name offered for the downloaded deck.
pub const DOWNLOAD_NAME: &str = "output.pptx";

/// Render every document of a script and package each one.
///
/// Runs synchronously; image downloads happen one after another on the
/// calling thread. The first failure aborts the whole request.
pub fn build_packages(fetcher: &dyn ImageFetcher, script: &str) -> Result<Vec<Vec<u8>>, AppError> {
    let renderer = Renderer::new(fetcher);
    let writer = PptxWriter::new();

    let documents = split_documents(script);
    let mut packages = Vec::with_capacity(documents.len());

    for (index, document) in documents.iter().enumerate() {
        let deck = renderer.render_script(document)?;
        log::info!(
            "Document {}/{}: {} slides",
            index + 1,
            documents.len(),
            deck.len()
        );
        packages.push(writer.to_bytes(&deck)?);
    }

    Ok(packages)
}
