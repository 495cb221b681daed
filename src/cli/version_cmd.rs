//! Version commands: next, increment, publish

use anyhow::Result;
use tracing::debug;

use super::output::Output;
use crate::domain::IncrementKind;
use crate::storage::VersionedFile;

fn describe(kind: IncrementKind) -> &'static str {
    match kind {
        IncrementKind::First => "first version",
        IncrementKind::Advanced => "next version",
        IncrementKind::Branched => "new branch",
        IncrementKind::Unchanged => "current version",
    }
}

/// Prints the name the next version would get
pub fn next(output: &Output, file: &VersionedFile) -> Result<()> {
    let increment = file.next_version()?;
    let name = format!("{}.{}", increment.stem(), file.config().extension);

    if output.is_json() {
        output.data(&serde_json::json!({
            "file": name,
            "path": file.dir().join(&name).display().to_string(),
            "base_name": increment.base_name,
            "suffix": increment.suffix_text,
            "version": increment.chain,
            "kind": increment.kind,
        }));
    } else {
        println!("{}", name);
    }

    Ok(())
}

/// Copies the file to its next version
pub fn increment(output: &Output, file: &VersionedFile, dry_run: bool) -> Result<()> {
    if dry_run {
        let increment = file.next_version()?;
        let path = file
            .dir()
            .join(format!("{}.{}", increment.stem(), file.config().extension));
        debug!(path = %path.display(), "dry run, nothing written");

        if output.is_json() {
            output.data(&serde_json::json!({
                "dry_run": true,
                "path": path.display().to_string(),
                "kind": increment.kind,
            }));
        } else {
            println!("Would save {} ({})", path.display(), describe(increment.kind));
        }
        return Ok(());
    }

    let saved = file.save_increment()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "dry_run": false,
            "path": saved.path.display().to_string(),
            "kind": saved.increment.kind,
            "version": saved.increment.chain,
        }));
    } else {
        output.success(&format!(
            "Saved {} ({})",
            saved.path.display(),
            describe(saved.increment.kind)
        ));
    }

    Ok(())
}

/// Copies the file to its published name
pub fn publish(output: &Output, file: &VersionedFile, dry_run: bool) -> Result<()> {
    if dry_run {
        let plan = file.publish_plan()?;
        let ext = &file.config().extension;
        let published = file.dir().join(format!("{}.{}", plan.published_stem, ext));
        let version = file.dir().join(format!("{}.{}", plan.version.stem(), ext));

        if output.is_json() {
            output.data(&serde_json::json!({
                "dry_run": true,
                "published_path": published.display().to_string(),
                "version_path": version.display().to_string(),
            }));
        } else {
            println!("Would publish {}", published.display());
            if plan.version.stem() != file.stem() {
                println!("Would save {} ({})", version.display(), describe(plan.version.kind));
            }
        }
        return Ok(());
    }

    let published = file.publish()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "dry_run": false,
            "published_path": published.published_path.display().to_string(),
            "version_path": published.version_path.display().to_string(),
            "version_created": published.version_created,
        }));
    } else {
        output.success(&format!("Published {}", published.published_path.display()));
        if published.version_created {
            output.success(&format!("Saved {}", published.version_path.display()));
        }
    }

    Ok(())
}
