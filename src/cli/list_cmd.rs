//! Listing commands: list, resolve

use anyhow::Result;

use super::output::Output;
use crate::storage::{modified, VersionedFile};

/// Lists the project's files grouped by lineage
pub fn list(output: &Output, file: &VersionedFile) -> Result<()> {
    let result = file.scan()?;

    if output.is_json() {
        let entries: Vec<_> = result
            .entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "indent": e.indent,
                    "published": e.published,
                    "current": e.current,
                    "version": e.chain,
                    "modified": modified(&file.dir().join(&e.name)),
                })
            })
            .collect();

        output.data(&serde_json::json!({
            "base_name": result.base_name,
            "directory": file.dir().display().to_string(),
            "current": result.current,
            "entries": entries,
        }));
        return Ok(());
    }

    if result.is_empty() {
        println!("No versions of '{}' found", result.base_name);
        return Ok(());
    }

    println!("Versions of '{}' in {}", result.base_name, file.dir().display());
    println!("{}", "-".repeat(50));

    for entry in &result.entries {
        let marker = if entry.current { "*" } else { " " };
        let tag = if entry.published { "  [published]" } else { "" };
        println!(
            "{} {}{}{}",
            marker,
            "  ".repeat(entry.indent),
            entry.name,
            tag
        );
    }

    output.blank();
    println!("{} file(s)", result.entries.len());

    Ok(())
}

/// Prints the path of a listed file
pub fn resolve(output: &Output, file: &VersionedFile, name: &str) -> Result<()> {
    let path = file.resolve(name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "path": path.display().to_string(),
        }));
    } else {
        println!("{}", path.display());
    }

    Ok(())
}
