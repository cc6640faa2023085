//! Propagation of a source change to the documents that embed it.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::Result;
use crate::interface::Context;

use super::debounce::JobRunner;
use super::host::HostHandles;
use super::strategies::{AffectedDocument, DocumentOutcome, StrategyChain};

/// Result of propagating one source change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    /// Library-relative path of the changed source file.
    pub source: String,
    /// One entry per affected document, in scan order.
    pub documents: Vec<DocumentOutcome>,
}

impl PropagationReport {
    /// Returns true if no document embeds the source.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents some strategy accepted.
    pub fn accepted(&self) -> usize {
        self.documents.iter().filter(|d| d.is_accepted()).count()
    }
}

/// Forces the host to re-render documents embedding a changed source file.
#[derive(Debug)]
pub struct Propagator {
    ctx: Arc<Context>,
    chain: StrategyChain,
}

impl Propagator {
    /// Creates a propagator with the configured strategy chain.
    pub fn new(ctx: Arc<Context>, hosts: &HostHandles) -> Result<Self> {
        let chain = StrategyChain::from_config(&ctx.config.propagation, hosts)?;
        tracing::debug!("Propagation strategies: {:?}", chain.names());
        Ok(Self { ctx, chain })
    }

    /// Creates a propagator with an explicit chain.
    pub fn with_chain(ctx: Arc<Context>, chain: StrategyChain) -> Self {
        Self { ctx, chain }
    }

    /// Returns the installed strategy chain.
    pub fn chain(&self) -> &StrategyChain {
        &self.chain
    }

    /// Propagates a change of `source` to every document embedding it.
    ///
    /// A failure on one document never stops the others.
    pub fn propagate(&self, source: &Path) -> Result<PropagationReport> {
        let relative = self.ctx.relative_source(source)?;
        let affected = self.ctx.scanner().find_referencing_relative(&relative)?;

        let mut report = PropagationReport {
            source: relative,
            documents: Vec::with_capacity(affected.len()),
        };

        if affected.is_empty() {
            tracing::warn!("No document embeds {}", report.source);
            return Ok(report);
        }

        let docs_root = self.ctx.docs_root();
        for relative_doc in affected {
            let document = AffectedDocument::new(&docs_root, relative_doc);
            let outcome = self.chain.apply(&document);

            match &outcome.accepted_by {
                Some(strategy) => {
                    tracing::debug!("{} refreshed via {}", document.relative.display(), strategy)
                }
                None => tracing::warn!(
                    "No strategy could refresh {}",
                    document.relative.display()
                ),
            }
            report.documents.push(outcome);
        }

        tracing::info!(
            "{} changed: refreshed {}/{} documents",
            report.source,
            report.accepted(),
            report.documents.len()
        );
        Ok(report)
    }
}

impl JobRunner for Propagator {
    fn run(&self, source: &Path) -> Result<()> {
        self.propagate(source).map(|_| ())
    }
}
