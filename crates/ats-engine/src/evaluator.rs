//! Rule evaluation state machine
//!
//! `Init -> Evaluated -> Aggregated -> Report`. Each step consumes the
//! previous state, so a report can only be produced from a completed,
//! aggregated run.

use crate::aggregate;
use crate::config::EngineConfig;
use crate::document::Document;
use crate::error::{InputError, ValidationError};
use crate::registry::Registry;
use crate::report::Report;
use crate::rules::Rule;
use ats_types::{Finding, Severity, SeverityCounts, Status};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared cancellation signal, checked between rule applications
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Document loaded, suppressions resolved, no rule applied yet
#[derive(Debug)]
pub struct Init;

/// Every active rule applied
#[derive(Debug)]
pub struct Evaluated {
    findings: Vec<Finding>,
    advisories: Vec<String>,
}

/// Findings ordered and counted, status decided
#[derive(Debug)]
pub struct Aggregated {
    findings: Vec<Finding>,
    counts: SeverityCounts,
    status: Status,
    recommendations: Vec<String>,
}

/// One validation run over one document
#[derive(Debug)]
pub struct Evaluation<'r, S> {
    config: &'r EngineConfig,
    document: Document,
    active: Vec<&'r Rule>,
    state: S,
}

impl<'r> Evaluation<'r, Init> {
    /// Resolve suppressions and pick the rules that apply to this document
    ///
    /// Suppressed ids are the union of the configured ids and `suppressed`.
    /// An id the registry does not know is an input error.
    pub fn init(
        registry: &'r Registry,
        config: &'r EngineConfig,
        document: Document,
        suppressed: &[String],
    ) -> Result<Self, ValidationError> {
        let suppressed: BTreeSet<&str> = config
            .suppressed_rules
            .iter()
            .chain(suppressed)
            .map(String::as_str)
            .collect();
        if let Some(unknown) = suppressed.iter().find(|id| !registry.contains(id)) {
            return Err(InputError::UnknownRule(unknown.to_string()).into());
        }

        let active: Vec<&Rule> = registry
            .iter()
            .filter(|rule| rule.scope.applies_to(config.document_kind))
            .filter(|rule| !suppressed.contains(rule.id))
            .collect();

        debug!(
            filename = document.filename(),
            lines = document.line_count(),
            active = active.len(),
            suppressed = suppressed.len(),
            "Evaluation initialized"
        );

        Ok(Self {
            config,
            document,
            active,
            state: Init,
        })
    }

    /// Apply every active rule in registration order
    ///
    /// A matcher failure aborts the run. Cancellation is observed before
    /// each rule.
    pub fn evaluate(
        self,
        cancel: &CancelFlag,
    ) -> Result<Evaluation<'r, Evaluated>, ValidationError> {
        let mut findings = Vec::new();
        let mut advisories = Vec::new();

        for rule in &self.active {
            if cancel.is_cancelled() {
                debug!(rule = rule.id, "Evaluation cancelled");
                return Err(ValidationError::Cancelled(rule.id.to_string()));
            }

            let hits = rule
                .matches(&self.document, self.config)
                .map_err(|source| ValidationError::Internal {
                    rule_id: rule.id.to_string(),
                    source,
                })?;
            debug!(rule = rule.id, hits = hits.len(), "Rule evaluated");

            for hit in hits {
                let finding = rule.finding(hit);
                if finding.severity == Severity::Advisory {
                    advisories.push(format!("{} {}", finding.issue_text, finding.suggestion_text));
                } else {
                    findings.push(finding);
                }
            }
        }

        Ok(Evaluation {
            config: self.config,
            document: self.document,
            active: self.active,
            state: Evaluated {
                findings,
                advisories,
            },
        })
    }
}

impl<'r> Evaluation<'r, Evaluated> {
    /// Order findings, count them and decide the status
    pub fn aggregate(self) -> Evaluation<'r, Aggregated> {
        let Evaluated {
            mut findings,
            advisories,
        } = self.state;

        aggregate::order_findings(&mut findings);
        let counts = SeverityCounts::tally(&findings);
        let status = aggregate::decide_status(&counts);
        let recommendations = aggregate::recommendations(advisories, &findings);

        Evaluation {
            config: self.config,
            document: self.document,
            active: self.active,
            state: Aggregated {
                findings,
                counts,
                status,
                recommendations,
            },
        }
    }
}

impl Evaluation<'_, Aggregated> {
    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn counts(&self) -> &SeverityCounts {
        &self.state.counts
    }

    /// Emit the immutable report
    pub fn finish(self, timestamp: DateTime<Utc>) -> Report {
        let Aggregated {
            findings,
            counts,
            status,
            recommendations,
        } = self.state;

        info!(
            filename = self.document.filename(),
            status = %status,
            critical = counts.critical,
            high = counts.high,
            medium = counts.medium,
            low = counts.low,
            "Validation complete"
        );

        Report::assemble(
            self.document.fingerprint(),
            self.document.filename().to_string(),
            timestamp,
            status,
            counts,
            findings,
            recommendations,
        )
    }
}
