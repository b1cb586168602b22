use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::InventoryArgs;
use crate::model::{PageInventoryEntry, PageInventoryManifest};
use crate::pages::discover_pages;
use crate::pipeline::PageDeduplicator;
use crate::util::{now_utc_string, sha256_bytes, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_dir)?;

    for entry in manifest.pages.iter().filter(|entry| entry.duplicate_of.is_some()) {
        info!(
            page = entry.page_number,
            duplicate_of = entry.duplicate_of.unwrap_or_default(),
            "duplicate page"
        );
    }

    if args.dry_run {
        info!(
            page_count = manifest.page_count,
            distinct_page_count = manifest.distinct_page_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(default_manifest_path);

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(
        page_count = manifest.page_count,
        distinct_page_count = manifest.distinct_page_count,
        "inventory completed"
    );

    Ok(())
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("manifests").join("page_inventory.json")
}

pub fn build_manifest(input_dir: &Path) -> Result<PageInventoryManifest> {
    let pages = discover_pages(input_dir)?;

    let mut dedup = PageDeduplicator::default();
    let mut entries = Vec::with_capacity(pages.len());
    let mut skipped = Vec::new();

    for page in pages {
        let bytes = match page.read_bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(file = %page.filename, error = %error, "page unreadable, left out of inventory");
                skipped.push(page.filename);
                continue;
            }
        };

        let sha256 = sha256_bytes(&bytes);
        let duplicate_of = dedup.first_seen(&sha256, page.number);
        entries.push(PageInventoryEntry {
            page_number: page.number,
            filename: page.filename,
            byte_len: bytes.len() as u64,
            sha256,
            duplicate_of,
        });
    }

    Ok(PageInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_dir.display().to_string(),
        page_count: entries.len(),
        distinct_page_count: dedup.distinct(),
        pages: entries,
        skipped,
    })
}
