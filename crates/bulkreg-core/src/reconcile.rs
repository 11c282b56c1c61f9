//! Merging input candidates into the tracked records.

use tracing::{debug, warn};

use crate::{Candidate, Records, TrackingRecord};

/// A candidate whose owner differs from the one already tracked.
///
/// The tracked owner is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerConflict {
    pub domain: String,
    pub tracked_owner: String,
    pub input_owner: String,
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of newly tracked domains.
    pub added: usize,
    /// Known domains listed with a different owner.
    pub owner_conflicts: Vec<OwnerConflict>,
}

impl ReconcileReport {
    /// Whether any record was inserted, i.e. the store needs saving.
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Track every candidate whose domain is not in `records` yet.
///
/// Existing records are never modified.
pub fn reconcile<I>(records: &mut Records, candidates: I) -> ReconcileReport
where
    I: IntoIterator<Item = Candidate>,
{
    let mut report = ReconcileReport::default();

    for Candidate { domain, owner } in candidates {
        if let Some(existing) = records.get(&domain) {
            if existing.owner != owner {
                warn!(
                    domain = %domain,
                    tracked_owner = %existing.owner,
                    input_owner = %owner,
                    "Input lists a different owner for a tracked domain; keeping tracked owner"
                );
                report.owner_conflicts.push(OwnerConflict {
                    domain,
                    tracked_owner: existing.owner.clone(),
                    input_owner: owner,
                });
            }
            continue;
        }

        debug!(domain = %domain, owner = %owner, "Tracking new domain");
        records.insert(TrackingRecord::new(domain, owner));
        report.added += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainStatus;

    fn input() -> Vec<Candidate> {
        vec![Candidate::new("alice", "0xA"), Candidate::new("bob", "0xB")]
    }

    #[test]
    fn test_fresh_store_tracks_all() {
        let mut records = Records::new();
        let report = reconcile(&mut records, input());

        assert_eq!(report.added, 2);
        assert!(report.changed());
        assert_eq!(records.domains().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert!(records
            .iter()
            .all(|(_, r)| r.status == DomainStatus::NotStarted && r.error.is_none()));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut records = Records::new();
        reconcile(&mut records, input());
        let before = records.clone();

        let report = reconcile(&mut records, input());
        assert!(!report.changed());
        assert_eq!(records, before);
    }

    #[test]
    fn test_appended_domain_leaves_existing_untouched() {
        let mut records = Records::new();
        let mut alice = TrackingRecord::new("alice", "0xA");
        alice.succeed(None);
        records.insert(alice.clone());

        let report = reconcile(
            &mut records,
            vec![Candidate::new("alice", "0xA"), Candidate::new("carol", "0xC")],
        );

        assert_eq!(report.added, 1);
        assert_eq!(records.get("alice"), Some(&alice));
        assert_eq!(
            records.get("carol").unwrap().status,
            DomainStatus::NotStarted
        );
    }

    #[test]
    fn test_owner_conflict_is_reported_not_applied() {
        let mut records = Records::new();
        records.insert(TrackingRecord::new("alice", "0xA"));

        let report = reconcile(&mut records, vec![Candidate::new("alice", "0xZ")]);

        assert!(!report.changed());
        assert_eq!(report.owner_conflicts.len(), 1);
        assert_eq!(report.owner_conflicts[0].input_owner, "0xZ");
        assert_eq!(records.get("alice").unwrap().owner, "0xA");
    }

    #[test]
    fn test_duplicate_rows_first_wins() {
        let mut records = Records::new();
        let report = reconcile(
            &mut records,
            vec![Candidate::new("alice", "0xA"), Candidate::new("alice", "0xB")],
        );

        assert_eq!(report.added, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("alice").unwrap().owner, "0xA");
        assert_eq!(report.owner_conflicts.len(), 1);
    }
}
