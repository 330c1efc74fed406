//! Session cookie settings derived from [`AppSettings`].
//!
//! Release builds refuse to start without a readable session key of at
//! least [`SESSION_KEY_MIN_LEN`] bytes unless ephemeral keys are explicitly
//! allowed; debug builds fall back to a generated key with a warning.

use std::io;
use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

/// Minimum session key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing keys are replaced by a generated one.
    Debug,
    /// Keys must be present and long enough.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Session settings ready for the session middleware.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while preparing session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Prepare session settings for `mode`.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when the key file is unreadable (and no
/// fallback is permitted) or too short.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.allow_ephemeral_session_key,
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure: settings.cookie_secure(),
    })
}

fn read_key_file(path: &Path) -> io::Result<Vec<u8>> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "key path names no file"))?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(file_name)
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match read_key_file(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            // `Key::derive_from` needs 32 bytes even in debug builds.
            let min_len = match mode {
                BuildMode::Release => SESSION_KEY_MIN_LEN,
                BuildMode::Debug => 32,
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session key; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cap_fs;
    use rstest::rstest;
    use tempfile::TempDir;

    fn key_file(length: usize) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("session_key");
        let directory = Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open dir");
        directory
            .write("session_key", vec![b'k'; length])
            .expect("write key");
        assert!(cap_fs::path_exists(&path));
        (dir, path)
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn reads_long_enough_keys(#[case] mode: BuildMode) {
        let (_dir, path) = key_file(SESSION_KEY_MIN_LEN);
        assert!(session_key(&path, mode, false).is_ok());
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let (_dir, path) = key_file(40);
        let Err(err) = session_key(&path, BuildMode::Release, false) else {
            panic!("a 40-byte key must be rejected in release builds");
        };
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 40, .. }));
    }

    #[rstest]
    fn debug_accepts_shorter_keys() {
        let (_dir, path) = key_file(40);
        assert!(session_key(&path, BuildMode::Debug, false).is_ok());
    }

    #[rstest]
    #[case(BuildMode::Debug, false, true)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Release, false, false)]
    fn missing_keys_fall_back_only_when_permitted(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] succeeds: bool,
    ) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent");
        assert_eq!(session_key(&path, mode, allow_ephemeral).is_ok(), succeeds);
    }
}
