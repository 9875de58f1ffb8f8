//! Aggregated JSON report of every category's products.
//!
//! The document is a JSON array of single-key objects, one per category, in
//! scrape order:
//!
//! ```json
//! [
//!     { "Hand Tools": [ { "Name": "...", "Price": 1, "Discounted Price": null, "Link": "..." } ] },
//!     { "Fasteners": [] }
//! ]
//! ```
//!
//! Output is pure ASCII: characters outside it are written as `\uXXXX`
//! escapes, with surrogate pairs above the Basic Multilingual Plane.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use stockroom_core::Error;

use crate::catalog::Product;

/// Products collected for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryListing {
    pub category: String,
    pub products: Vec<Product>,
}

impl Serialize for CategoryListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.category, &self.products)?;
        map.end()
    }
}

/// The full report, held in memory until the run finishes.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<CategoryListing>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category. Duplicate names are kept as separate entries.
    pub fn push(&mut self, category: impl Into<String>, products: Vec<Product>) {
        self.entries.push(CategoryListing { category: category.into(), products });
    }

    pub fn entries(&self) -> &[CategoryListing] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total products across all categories.
    pub fn product_count(&self) -> usize {
        self.entries.iter().map(|e| e.products.len()).sum()
    }

    /// Serialize with 4-space indentation and ASCII-only output.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new(b"    "));
        self.serialize(&mut serializer)
            .map_err(|e| Error::ReportError(format!("failed to serialize report: {}", e)))?;

        String::from_utf8(buf).map_err(|e| Error::ReportError(format!("report is not UTF-8: {}", e)))
    }

    /// Write the report to `path`, replacing any existing file.
    ///
    /// Missing parent directories are created. The write is not atomic.
    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        let json = self.to_json_pretty()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| Error::ReportError(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        fs::write(path, json).map_err(|e| Error::ReportError(format!("failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            categories = self.len(),
            products = self.product_count(),
            "report written"
        );

        Ok(())
    }
}

/// Pretty printer that escapes every non-ASCII character.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn new(indent: &'a [u8]) -> Self {
        Self { inner: PrettyFormatter::with_indent(indent) }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
