//! roomrank-caption
//!
//! Everything between the image bucket and the catalog CSV: downloading
//! the room photos, describing each one through a vision model and writing
//! the resulting records.
pub mod cached;
pub mod download;
pub mod openai;
pub mod pipeline;

pub use cached::CachedCaptioner;
pub use download::{download_images, image_urls, DownloadSummary};
pub use openai::{OpenAiCaptioner, CAPTION_PROMPT};
pub use pipeline::{build_records, list_images, write_catalog};
