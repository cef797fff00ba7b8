// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bulk operations over every subject in the store.
//!
//! - [`Coordinator::backfill`] builds artifacts for subjects that have both
//!   facts but no artifact, typically records written before automatic
//!   creation existed.
//! - [`Coordinator::census`] classifies subjects for an admin overview.
//!
//! Backfill goes through the same per-subject lock and conditional write as
//! the event path, so it is safe to run while enrollment traffic continues.
//! With the `parallel` feature, subjects are processed on rayon's pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::enroll::coordinator::{ArtifactSummary, Coordinator};
use crate::enroll::error::EnrollError;
use crate::enroll::state::{EnrollmentState, SubjectId};
use crate::enroll::store::EnrollmentStore;

/// Outcome of [`Coordinator::backfill`].
#[derive(Debug, Default)]
pub struct BackfillReport {
    /// Subjects whose artifact this run created.
    pub built: Vec<(SubjectId, ArtifactSummary)>,
    /// Subjects that needed nothing (incomplete, or already built).
    pub skipped: usize,
    /// Subjects whose build failed; their state is unchanged.
    pub failed: Vec<(SubjectId, EnrollError)>,
}

/// Subjects grouped by enrollment progress.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrollmentCensus {
    /// Built and current.
    pub complete: Vec<SubjectId>,
    /// Built, but a fact changed afterwards.
    pub stale: Vec<SubjectId>,
    /// Both facts present, no artifact.
    pub pending: Vec<SubjectId>,
    /// Missing at least one fact, with the state they are in.
    pub incomplete: Vec<(SubjectId, EnrollmentState)>,
}

impl<S: EnrollmentStore> Coordinator<S> {
    /// Build every pending artifact.
    ///
    /// Per-subject failures are collected in the report, not returned.
    ///
    /// # Errors
    /// Returns [`EnrollError::Persistence`] only if the subject list itself
    /// cannot be read.
    pub fn backfill(&self) -> Result<BackfillReport, EnrollError> {
        let subjects = self.store.subjects()?;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<_> = subjects
            .into_par_iter()
            .map(|s| {
                let outcome = self.build_pending(&s);
                (s, outcome)
            })
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<_> = subjects
            .into_iter()
            .map(|s| {
                let outcome = self.build_pending(&s);
                (s, outcome)
            })
            .collect();

        let mut report = BackfillReport::default();
        for (subject, outcome) in outcomes {
            match outcome {
                Ok(Some(summary)) => report.built.push((subject, summary)),
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    warn!(subject = %subject, error = %e, "backfill failed for subject");
                    report.failed.push((subject, e));
                }
            }
        }

        info!(
            built = report.built.len(),
            skipped = report.skipped,
            failed = report.failed.len(),
            "backfill finished"
        );
        Ok(report)
    }

    /// Classify every subject.
    ///
    /// Each subject's facts are read in one store call, so each entry is
    /// consistent on its own; the census as a whole is not a snapshot.
    pub fn census(&self) -> Result<EnrollmentCensus, EnrollError> {
        let mut census = EnrollmentCensus::default();
        for subject in self.store.subjects()? {
            match EnrollmentState::from_facts(&self.store.facts(&subject)?) {
                EnrollmentState::Built { stale: false } => census.complete.push(subject),
                EnrollmentState::Built { stale: true } => census.stale.push(subject),
                EnrollmentState::ReadyUnbuilt => census.pending.push(subject),
                state => census.incomplete.push((subject, state)),
            }
        }
        Ok(census)
    }
}
