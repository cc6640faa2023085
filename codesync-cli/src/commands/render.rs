//! Render command implementation.
//!
//! Runs the embedding transform on one document and prints the result.

use std::path::PathBuf;

use codesync::embed::{RenderTarget, TransformReport};
use codesync::errors::Result;
use codesync::interface::Context;
use codesync::readers::parse_document;

/// Options for the render command.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Document to render.
    pub document: PathBuf,
    /// Replace directives with raw markup instead of markdown nodes.
    pub markup: bool,
}

/// Renders a document, returning the output and the transform report.
pub fn render_document(ctx: &Context, options: &RenderOptions) -> Result<(String, TransformReport)> {
    let path = ctx.resolve_path(&options.document);
    let mut content = ctx.file_cache.read(&path)?;
    let transform = ctx.embed_transform();

    if options.markup {
        let report = transform.run(RenderTarget::Markup(&mut content))?;
        Ok((content, report))
    } else {
        let mut tree = parse_document(&content, Some(options.document.as_path()));
        let report = transform.run(RenderTarget::Tree(&mut tree))?;
        Ok((tree.to_markdown(), report))
    }
}

/// Executes the render command.
pub fn render(ctx: &Context, options: RenderOptions) -> Result<()> {
    let (output, report) = render_document(ctx, &options)?;
    print!("{}", output);

    tracing::debug!(
        "Embedded {} files, {} errors",
        report.embedded,
        report.errors.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn project() -> (tempfile::TempDir, Context) {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::create_dir_all(dir.path().join("website/docs")).unwrap();
        fs::write(
            dir.path().join("lib/calc.py"),
            "def add(a, b):\n    return a + b\n\n**Design Rationale:**\nKeep it small.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("website/docs/calc.md"),
            "# Calc\n\n<Embed filePath=\"lib/calc.py\" />\n",
        )
        .unwrap();
        let ctx = Context::default_for_dir(dir.path().to_path_buf());
        (dir, ctx)
    }

    #[test]
    fn test_render_tree() {
        let (_dir, ctx) = project();
        let options = RenderOptions {
            document: PathBuf::from("website/docs/calc.md"),
            markup: false,
        };

        let (output, report) = render_document(&ctx, &options).unwrap();
        assert_eq!(report.embedded, 1);
        assert!(output.starts_with("# Calc\n"));
        assert!(output.contains(":::info[Design Rationale]\n\nKeep it small.\n\n:::\n"));
        assert!(output.contains("```python\ndef add(a, b):\n    return a + b\n```\n"));
        assert!(!output.contains("<Embed"));
    }

    #[test]
    fn test_render_markup() {
        let (_dir, ctx) = project();
        let options = RenderOptions {
            document: PathBuf::from("website/docs/calc.md"),
            markup: true,
        };

        let (output, _) = render_document(&ctx, &options).unwrap();
        assert!(output.contains("<pre><code class=\"language-python\">def add(a, b):"));
        assert!(!output.contains("<Embed"));
    }

    #[test]
    fn test_render_missing_document() {
        let (_dir, ctx) = project();
        let options = RenderOptions {
            document: PathBuf::from("website/docs/missing.md"),
            markup: false,
        };
        assert!(render(&ctx, options).is_err());
    }
}
