//! Gzip page store on the local filesystem.
//!
//! Entries live at `<root>/<namespace>/<sha256(url)>.html.gz`. An entry is
//! written once and read back on every later lookup; nothing here expires or
//! evicts it.
//!
//! Writes go to a temporary file in the namespace directory that is renamed
//! over the entry once complete, so an entry is either absent or whole.

use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;

use super::hash::cache_file_name;
use crate::Error;

/// Sub-directory of the cache root that a page kind is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Storefront HTML pages.
    MainPage,
    /// Listing API responses.
    CategoryPages,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::MainPage, Namespace::CategoryPages];

    /// Directory name under the cache root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Namespace::MainPage => "main_page",
            Namespace::CategoryPages => "category_pages",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Namespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.dir_name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown cache namespace: {s}")))
    }
}

/// Handle to an on-disk page cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    /// Create a cache handle. Directories are created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one namespace's entries.
    pub fn dir(&self, namespace: Namespace) -> PathBuf {
        self.root.join(namespace.dir_name())
    }

    /// Path the body of `url` is (or would be) stored at.
    pub fn path_for(&self, namespace: Namespace, url: &str) -> PathBuf {
        self.dir(namespace).join(cache_file_name(url))
    }

    /// Whether an entry exists for `url`.
    pub fn contains(&self, namespace: Namespace, url: &str) -> bool {
        self.path_for(namespace, url).is_file()
    }

    /// Read and decompress the entry for `url`.
    ///
    /// Returns `Ok(None)` on a miss. Bytes that are not valid UTF-8 are
    /// replaced rather than rejected.
    pub fn get(&self, namespace: Namespace, url: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(namespace, url);
        if !path.is_file() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| cache_err("failed to open", &path, e))?;
        let mut decoder = GzDecoder::new(file);
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|e| cache_err("failed to decompress", &path, e))?;

        tracing::debug!("cache hit for {} ({})", url, path.display());

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Compress `body` and store it as the entry for `url`, replacing any
    /// existing entry.
    pub fn put(&self, namespace: Namespace, url: &str, body: &[u8]) -> Result<PathBuf, Error> {
        let dir = self.dir(namespace);
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|e| cache_err("failed to create", &dir, e))?;
            tracing::debug!("created cache directory {}", dir.display());
        }

        let path = dir.join(cache_file_name(url));
        write_atomic(&dir, &path, |file| {
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(body)?;
            encoder.finish()?;
            Ok(())
        })?;

        tracing::debug!("cached {} bytes for {} ({})", body.len(), url, path.display());

        Ok(path)
    }
}

/// Run `write` against a temporary file in `dir`, then move it to `path`.
///
/// On failure the temporary file is removed and `path` keeps its previous
/// contents, if any.
fn write_atomic<F>(dir: &Path, path: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| cache_err("failed to create temp file in", dir, e))?;
    write(tmp.as_file_mut()).map_err(|e| cache_err("failed to write", path, e))?;
    tmp.persist(path).map_err(|e| cache_err("failed to replace", path, e.error))?;
    Ok(())
}

fn cache_err(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::CacheError(format!("{action} {}: {err}", path.display()))
}
