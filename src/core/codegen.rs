//! TypeScript source generation.
//!
//! Output is streamed line by line through a buffered writer; each
//! `write_all` waits while the buffer is full, so the whole file never sits
//! in memory. Entries are ordered by raw key so regenerated files diff
//! cleanly.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

use crate::domain::{export_identifier, IconMap};

/// First line of a generated definitions file
pub const SOURCE_HEADER: &str = "// Auto-generated OSRS Icon definitions\n\n";

/// First line of a generated metadata file
pub const META_HEADER: &str = "// Auto-generated OSRS Icon metadata\n\n";

static EXPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^export const ([A-Za-z_$][A-Za-z0-9_$]*) = "(.*)";$"#).unwrap()
});

/// Assign a unique identifier to every raw key, in raw-key order.
///
/// A name already taken in this map gets `_1`, `_2`, … appended.
pub fn assign_identifiers<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, String)> {
    let mut used: HashSet<String> = HashSet::new();

    keys.into_iter()
        .map(|key| {
            let base = export_identifier(key);
            let mut name = base.clone();
            let mut counter = 1;
            while used.contains(&name) {
                name = format!("{}_{}", base, counter);
                counter += 1;
            }
            used.insert(name.clone());
            (key, name)
        })
        .collect()
}

/// Write `export const NAME = "VALUE";` for every entry in raw-key order.
///
/// Returns the final identifiers sorted lexicographically, ready for
/// [`emit_meta`].
pub async fn emit_icons(icons: &IconMap, output_path: &Path) -> Result<Vec<String>> {
    let file = File::create(output_path)
        .await
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    writer.write_all(SOURCE_HEADER.as_bytes()).await?;

    let mut names = Vec::with_capacity(icons.len());
    for (key, name) in assign_identifiers(icons.keys().map(String::as_str)) {
        let value = &icons[key];
        let line = format!("export const {} = \"{}\";\n", name, value);
        writer.write_all(line.as_bytes()).await?;
        names.push(name);
    }

    writer
        .flush()
        .await
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    names.sort_unstable();
    Ok(names)
}

/// Write the identifier list and its union type
pub async fn emit_meta(
    names: &[String],
    output_path: &Path,
    array_name: &str,
    type_name: &str,
) -> Result<()> {
    let file = File::create(output_path)
        .await
        .with_context(|| format!("Failed to create meta file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    writer.write_all(META_HEADER.as_bytes()).await?;
    writer
        .write_all(format!("export const {} = [\n", array_name).as_bytes())
        .await?;

    for name in names {
        writer
            .write_all(format!("  '{}',\n", name).as_bytes())
            .await?;
    }

    writer.write_all(b"] as const;\n\n").await?;
    writer
        .write_all(
            format!(
                "export type {} = (typeof {})[number];\n",
                type_name, array_name
            )
            .as_bytes(),
        )
        .await?;

    writer
        .flush()
        .await
        .with_context(|| format!("Failed to write meta file: {}", output_path.display()))?;
    Ok(())
}

/// Read `identifier → value` back from a generated definitions file.
///
/// A missing file means nothing has been published yet and yields an empty
/// map. Lines that are not exports are ignored.
pub async fn read_exports(path: &Path) -> Result<BTreeMap<String, String>> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open exports: {}", path.display()))
        }
    };

    let mut exports = BTreeMap::new();
    let mut lines = BufReader::new(file).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("Failed to read exports: {}", path.display()))?
    {
        if let Some(caps) = EXPORT_LINE.captures(&line) {
            exports.insert(caps[1].to_string(), caps[2].to_string());
        }
    }

    Ok(exports)
}
