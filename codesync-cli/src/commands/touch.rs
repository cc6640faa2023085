//! Touch command implementation.
//!
//! Propagates a source change once, without watching.

use std::path::PathBuf;
use std::sync::Arc;

use codesync::errors::Result;
use codesync::interface::Context;
use codesync::sync::{HostHandles, PropagationReport, Propagator};

/// Options for the touch command.
#[derive(Debug, Clone)]
pub struct TouchOptions {
    /// Changed source file, relative to the working directory or absolute.
    pub source: PathBuf,
    /// Print the report as JSON.
    pub json: bool,
}

/// Executes the touch command.
pub fn touch(ctx: Arc<Context>, options: TouchOptions) -> Result<PropagationReport> {
    let source = ctx.resolve_path(&options.source);
    let propagator = Propagator::new(ctx, &HostHandles::none())?;
    let report = propagator.propagate(&source)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.documents {
            match &outcome.accepted_by {
                Some(strategy) => println!("{} ({})", outcome.document.display(), strategy),
                None => println!("{} (not refreshed)", outcome.document.display()),
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_touch_stamps_document() {
        let dir = tempdir().unwrap();
        let ctx = Arc::new(Context::default_for_dir(dir.path().to_path_buf()));

        fs::create_dir_all(dir.path().join("code_library")).unwrap();
        fs::create_dir_all(dir.path().join("website/docs")).unwrap();
        fs::write(dir.path().join("code_library/calc.py"), "x = 1\n").unwrap();
        fs::write(
            dir.path().join("website/docs/calc.md"),
            "# Calc\n\n<Embed filePath=\"code_library/calc.py\" />\n",
        )
        .unwrap();

        let options = TouchOptions {
            source: PathBuf::from("code_library/calc.py"),
            json: true,
        };
        let report = touch(ctx, options).unwrap();

        assert_eq!(report.accepted(), 1);
        let doc = fs::read_to_string(dir.path().join("website/docs/calc.md")).unwrap();
        assert!(doc.contains("<!-- Code updated: "));
    }
}
