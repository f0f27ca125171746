//! JSON export.
//!
//! Writes products as a JSON array indented with four spaces. Non-ASCII
//! text (offer names, parameter labels) is written literally, not escaped.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::models::ProductRecord;

const INDENT: &[u8] = b"    ";

/// Serializes `products` into `writer`.
///
/// Returns the number of products written.
pub fn write_products_to<W: Write>(writer: W, products: &[ProductRecord]) -> Result<usize> {
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    products
        .serialize(&mut serializer)
        .context("Failed to serialize products")?;
    let mut writer = serializer.into_inner();
    writer.write_all(b"\n").context("Failed to write output")?;
    writer.flush().context("Failed to flush output")?;
    Ok(products.len())
}

/// Writes `products` to `path`, creating missing parent directories and
/// replacing an existing file.
///
/// Returns the number of products written.
pub fn write_products(path: &Path, products: &[ProductRecord]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    info!("Saving {} products to {}", products.len(), path.display());
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_products_to(BufWriter::new(file), products)
}
