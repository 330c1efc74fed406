//! Filesystem image store rooted at the media directory.
//!
//! All access goes through a `cap_std` directory handle, so stored paths can
//! never escape the media root.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::fs::{Dir, OpenOptions};
use cap_std::ambient_authority;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::debug;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{POST_IMAGE_DIR, PostImage, ValidImage};

const FALLBACK_STEM: &str = "image";
const SUFFIX_LEN: usize = 7;
const MAX_ATTEMPTS: usize = 100;
/// Longest stored name, in characters.
const MAX_NAME_CHARS: usize = 100;
/// Longest stored name, in bytes; leaves room for the collision suffix below
/// the usual 255-byte file-name limit.
const MAX_NAME_BYTES: usize = 200;
/// Longer trailing parts are treated as part of the stem.
const MAX_EXTENSION_BYTES: usize = 16;

/// Stores uploads under `<media_root>/posts/`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    media_root: PathBuf,
}

impl LocalImageStore {
    /// Create a store writing below `media_root`. The directory is created
    /// on first write.
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Root directory of stored media.
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    fn store_blocking(&self, file_name: &str, bytes: &[u8]) -> io::Result<PostImage> {
        let images_root = self.media_root.join(POST_IMAGE_DIR);
        Dir::create_ambient_dir_all(&images_root, ambient_authority())?;
        let directory = Dir::open_ambient_dir(&images_root, ambient_authority())?;

        let base = sanitise_file_name(file_name);
        let mut candidate = base.clone();
        for _ in 0..MAX_ATTEMPTS {
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            match directory.open_with(&candidate, &options) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    file.sync_all()?;
                    return PostImage::new(format!("{POST_IMAGE_DIR}/{candidate}"))
                        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err));
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = alternative_name(&base);
                }
                Err(error) => return Err(error),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free file name for {base} after {MAX_ATTEMPTS} attempts"),
        ))
    }

    fn remove_blocking(&self, path: &str) -> io::Result<()> {
        let directory = match Dir::open_ambient_dir(&self.media_root, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(error),
        };
        match directory.remove_file(path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, image: &ValidImage) -> Result<PostImage, ImageStoreError> {
        let store = self.clone();
        let file_name = image.file_name().to_owned();
        let bytes = image.bytes().to_vec();
        let stored = tokio::task::spawn_blocking(move || store.store_blocking(&file_name, &bytes))
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        debug!(path = stored.path(), media_type = image.media_type(), "stored upload");
        Ok(stored)
    }

    async fn remove(&self, image: &PostImage) -> Result<(), ImageStoreError> {
        let store = self.clone();
        let path = image.path().to_owned();
        tokio::task::spawn_blocking(move || store.remove_blocking(&path))
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        debug!(path = image.path(), "removed upload");
        Ok(())
    }
}

/// Reduce an uploaded name to a safe single path component.
///
/// Directory parts are dropped, spaces become underscores, anything other
/// than alphanumerics, `-`, `_` and `.` is removed, and the stem is cut so the
/// name fits [`MAX_NAME_CHARS`] and [`MAX_NAME_BYTES`].
fn sanitise_file_name(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = last
        .chars()
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        limit_length(trimmed)
    }
}

fn limit_length(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && extension.len() <= MAX_EXTENSION_BYTES => {
            (stem, Some(extension))
        }
        _ => (name, None),
    };
    let reserved_chars = extension.map_or(0, |extension| extension.chars().count() + 1);
    let reserved_bytes = extension.map_or(0, |extension| extension.len() + 1);
    let stem = char_prefix(
        stem,
        MAX_NAME_CHARS - reserved_chars,
        MAX_NAME_BYTES - reserved_bytes,
    );
    match extension {
        Some(extension) => format!("{stem}.{extension}"),
        None => stem.to_owned(),
    }
}

/// Longest prefix of `value` within both limits, cut on a char boundary.
fn char_prefix(value: &str, max_chars: usize, max_bytes: usize) -> &str {
    let end = value
        .char_indices()
        .take(max_chars)
        .map(|(index, ch)| index + ch.len_utf8())
        .take_while(|end| *end <= max_bytes)
        .last()
        .unwrap_or(0);
    value.get(..end).unwrap_or_default()
}

/// Insert a short random suffix before the extension: `cat.png` becomes
/// `cat_Ab3dE9x.png`.
fn alternative_name(base: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    match base.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}_{suffix}.{extension}"),
        _ => format!("{base}_{suffix}"),
    }
}
