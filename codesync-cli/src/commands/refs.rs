//! Refs command implementation.
//!
//! Lists the documentation pages embedding a source file.

use std::path::PathBuf;

use codesync::errors::Result;
use codesync::interface::Context;

/// Options for the refs command.
#[derive(Debug, Clone)]
pub struct RefsOptions {
    /// Source file, relative to the working directory or absolute.
    pub source: PathBuf,
    /// Print JSON instead of one path per line.
    pub json: bool,
}

/// Returns the referencing documents, relative to the documentation project.
pub fn find_refs(ctx: &Context, options: &RefsOptions) -> Result<Vec<String>> {
    let found = ctx.find_referencing(&options.source)?;
    Ok(found
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect())
}

/// Executes the refs command.
pub fn refs(ctx: &Context, options: RefsOptions) -> Result<()> {
    let docs = find_refs(ctx, &options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
    } else if docs.is_empty() {
        eprintln!("No document embeds {}", options.source.display());
    } else {
        for doc in docs {
            println!("{}", doc);
        }
    }

    Ok(())
}
