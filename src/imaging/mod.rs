mod doc_type;
mod ocr;
mod regions;

pub use doc_type::{DEFAULT_NOISE_THRESHOLD, DocumentDetection, DocumentType, detect_document_type};
pub use ocr::{OcrEngine, PageRegions, RegionReader, TesseractCli};
pub use regions::Region;
