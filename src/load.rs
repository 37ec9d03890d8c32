use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, OnceLock,
    },
};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use image::ImageReader;
use log::{debug, warn};
use thiserror::Error;

use crate::catalog::{asset_path, AssetVariant, CATALOG};

/* ───────────────────────── channel types / caps ─────────────────── */

/// Identity of a texture slot: catalog index + requested variant.
pub type TileKey = (usize, AssetVariant);

/// Decoded RGBA frame ready for texture upload on the UI thread.
pub struct ImgMsg {
    pub key: TileKey,
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// (generation, key) — workers drop jobs whose generation is stale.
pub type JobMsg = (u64, TileKey);

// The catalog is small; caps only guard against a reload storm.
pub const IMG_CHAN_CAP: usize = 64;
pub const MAX_ENQUEUED_JOBS: usize = 128;

/* ───────────────────────── errors ───────────────────────────────── */

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/* ───────────────────────── queue state (dedupe) ─────────────────── */

/// Tracks which tile keys are already uploaded (seen) or in flight.
#[derive(Default)]
pub struct QueueState {
    pub seen: HashSet<TileKey>,
    pub enqueued: HashSet<TileKey>,
}

impl QueueState {
    pub fn clear(&mut self) {
        self.seen.clear();
        self.enqueued.clear();
    }

    /// Mark a decoded key as seen (after texture upload).
    pub fn mark_seen(&mut self, key: TileKey) {
        self.seen.insert(key);
        self.enqueued.remove(&key);
    }

    /// Enqueue `key` unless it is seen or already in flight.
    /// Returns true if a job was sent.
    pub fn try_enqueue_unique(&mut self, job_tx: &Sender<JobMsg>, gen_id: u64, key: TileKey) -> bool {
        if self.seen.contains(&key) || self.enqueued.contains(&key) {
            return false;
        }
        if job_tx.try_send((gen_id, key)).is_ok() {
            self.enqueued.insert(key);
            true
        } else {
            false
        }
    }
}

/* ───────────────────────── decoding ─────────────────────────────── */

/// Paths to try for a tile, in order. A missing `-small` rendition
/// falls back to the full asset once; the full rendition has no
/// fallback (the tile keeps its placeholder).
pub fn candidate_paths(root: &Path, name: &str, variant: AssetVariant) -> Vec<PathBuf> {
    match variant {
        AssetVariant::Small => vec![
            asset_path(root, name, AssetVariant::Small),
            asset_path(root, name, AssetVariant::Full),
        ],
        AssetVariant::Full => vec![asset_path(root, name, AssetVariant::Full)],
    }
}

fn decode_rgba(path: &Path) -> Result<(usize, usize, Vec<u8>), LoadError> {
    let img = ImageReader::open(path)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    Ok((w, h, rgba.into_raw()))
}

fn decode_tile(root: &Path, key: TileKey) -> Result<ImgMsg, LoadError> {
    let name = CATALOG[key.0].name;
    let paths = candidate_paths(root, name, key.1);
    let (last, fallbacks) = paths.split_last().expect("at least one candidate");

    for path in fallbacks {
        match decode_rgba(path) {
            Ok((width, height, rgba)) => {
                return Ok(ImgMsg { key, width, height, rgba });
            }
            // Missing rendition: fall through to the full asset.
            Err(LoadError::Io { path, source }) => {
                debug!("{} unavailable ({source}), trying full asset", path.display());
            }
            Err(err) => return Err(err),
        }
    }

    let (width, height, rgba) = decode_rgba(last)?;
    Ok(ImgMsg { key, width, height, rgba })
}

/* ───────────────────────── workers ──────────────────────────────── */

#[inline]
fn suggested_decoder_threads() -> usize {
    // The catalog is tiny; a couple of workers hide decode latency
    // without starving the UI thread.
    let logical = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (logical / 2).clamp(2, 4)
}

/* Global Rayon decoder pool (one-time init) */
static DECODER_POOL_INIT: OnceLock<()> = OnceLock::new();

#[inline]
fn init_decoder_pool(threads: usize) {
    DECODER_POOL_INIT.get_or_init(|| {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(2))
            .thread_name(|i| format!("decoder-{i}"))
            .build_global();
    });
}

/// Spawn long-lived decode workers on the global pool. Workers pull
/// jobs, drop stale generations, and push decoded frames back for the
/// UI thread to upload.
pub fn start_decoder_workers(
    assets_root: PathBuf,
    job_rx: Receiver<JobMsg>,
    img_tx: Sender<ImgMsg>,
    egui_ctx: egui::Context,
    current_gen: Arc<AtomicU64>,
) {
    use std::time::Duration;

    let threads = suggested_decoder_threads();
    init_decoder_pool(threads);

    for _ in 0..threads {
        let root = assets_root.clone();
        let rx = job_rx.clone();
        let tx = img_tx.clone();
        let ctx = egui_ctx.clone();
        let gen = current_gen.clone();

        rayon::spawn(move || {
            while let Ok((job_gen, key)) = rx.recv() {
                // Drop stale work (generation bumped on reload)
                if job_gen != gen.load(Ordering::Relaxed) {
                    continue;
                }

                match decode_tile(&root, key) {
                    Ok(msg) => {
                        if job_gen != gen.load(Ordering::Relaxed) {
                            continue;
                        }
                        let _ = tx.send(msg);
                        // Gentle nudge for prompt rendering without spamming
                        ctx.request_repaint_after(Duration::from_millis(8));
                    }
                    Err(err) => {
                        warn!("{err}");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_variant_falls_back_to_full_exactly_once() {
        let root = Path::new("/assets");
        let paths = candidate_paths(root, "rolex", AssetVariant::Small);
        assert_eq!(
            paths,
            [
                PathBuf::from("/assets/rolex-small.webp"),
                PathBuf::from("/assets/rolex.webp"),
            ]
        );
    }

    #[test]
    fn full_variant_has_no_fallback() {
        let root = Path::new("/assets");
        let paths = candidate_paths(root, "rolex", AssetVariant::Full);
        assert_eq!(paths, [PathBuf::from("/assets/rolex.webp")]);
    }

    #[test]
    fn queue_state_dedupes_by_key() {
        let (tx, rx) = crossbeam_channel::bounded::<JobMsg>(8);
        let mut q = QueueState::default();
        let key = (3, AssetVariant::Small);

        assert!(q.try_enqueue_unique(&tx, 1, key));
        assert!(!q.try_enqueue_unique(&tx, 1, key), "already in flight");
        assert_eq!(rx.len(), 1);

        q.mark_seen(key);
        assert!(!q.try_enqueue_unique(&tx, 1, key), "already seen");
        assert!(q.enqueued.is_empty());
    }

    #[test]
    fn decode_reports_missing_file_as_io_error() {
        let err = decode_rgba(Path::new("/nonexistent/beach.webp")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
