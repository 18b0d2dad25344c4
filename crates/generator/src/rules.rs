use tracing::debug;
use types::{Constraint, ConstraintKind, ConstraintScope, GenerateOptions, GeneratedEntry};

/// Evaluates the active constraint set against a candidate entry. An
/// applicable hard constraint rejects the entry outright; applicable soft
/// constraints are noted and never block. Rule payloads are not interpreted
/// beyond scope/target applicability.
pub fn entry_is_valid(
    constraints: &[Constraint],
    options: &GenerateOptions,
    entry: &GeneratedEntry,
) -> bool {
    if !options.enforce_hard_constraints && !options.respect_soft_constraints {
        return true;
    }
    for constraint in constraints.iter().filter(|c| c.is_active) {
        let gated_in = match constraint.kind {
            ConstraintKind::Hard => options.enforce_hard_constraints,
            ConstraintKind::Soft => options.respect_soft_constraints,
        };
        if !gated_in || !applies_to(constraint, entry) {
            continue;
        }
        match constraint.kind {
            ConstraintKind::Hard => return false,
            ConstraintKind::Soft => {
                debug!(constraint = %constraint.id, "soft constraint applies, not blocking");
            }
        }
    }
    true
}

/// A scoped constraint with a target only applies when the target matches the
/// entry's corresponding id; without a target it covers its whole scope.
fn applies_to(constraint: &Constraint, entry: &GeneratedEntry) -> bool {
    let target = constraint.target_id.as_deref();
    match constraint.scope {
        ConstraintScope::Global => true,
        ConstraintScope::Teacher => target.map_or(true, |t| t == entry.teacher_id.0),
        ConstraintScope::Class => target.map_or(true, |t| t == entry.class_id.0),
        ConstraintScope::Subject => target.map_or(true, |t| t == entry.subject_id.0),
        ConstraintScope::Room => match (target, &entry.room_id) {
            (Some(t), Some(room)) => t == room.0,
            (Some(_), None) => false,
            (None, _) => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{
        ClassId, ConstraintId, ConstraintRule, PeriodId, RoomId, SubjectId, TeacherId,
    };

    fn entry() -> GeneratedEntry {
        GeneratedEntry {
            class_id: ClassId("c1".into()),
            subject_id: SubjectId("s1".into()),
            teacher_id: TeacherId("t1".into()),
            room_id: Some(RoomId("r1".into())),
            time_period_id: PeriodId("p1".into()),
            week_number: 1,
            is_generated: true,
        }
    }

    fn constraint(kind: ConstraintKind, scope: ConstraintScope, target: Option<&str>) -> Constraint {
        Constraint {
            id: ConstraintId("k1".into()),
            kind,
            scope,
            target_id: target.map(Into::into),
            rule: ConstraintRule::Note { text: "n/a".into() },
            priority: 0,
            is_active: true,
        }
    }

    fn enforce_all() -> GenerateOptions {
        GenerateOptions {
            enforce_hard_constraints: true,
            respect_soft_constraints: true,
            ..Default::default()
        }
    }

    #[test]
    fn validation_is_skipped_when_both_gates_are_off() {
        let hard = constraint(ConstraintKind::Hard, ConstraintScope::Global, None);
        assert!(entry_is_valid(&[hard], &GenerateOptions::default(), &entry()));
    }

    #[test]
    fn applicable_hard_constraint_rejects() {
        let hard = constraint(ConstraintKind::Hard, ConstraintScope::Teacher, Some("t1"));
        assert!(!entry_is_valid(&[hard], &enforce_all(), &entry()));
    }

    #[test]
    fn mismatched_target_does_not_apply() {
        let hard = constraint(ConstraintKind::Hard, ConstraintScope::Teacher, Some("t2"));
        assert!(entry_is_valid(&[hard], &enforce_all(), &entry()));
    }

    #[test]
    fn inactive_constraints_are_ignored() {
        let mut hard = constraint(ConstraintKind::Hard, ConstraintScope::Global, None);
        hard.is_active = false;
        assert!(entry_is_valid(&[hard], &enforce_all(), &entry()));
    }

    #[test]
    fn soft_constraints_never_block() {
        let soft = constraint(ConstraintKind::Soft, ConstraintScope::Teacher, Some("t1"));
        assert!(entry_is_valid(&[soft], &enforce_all(), &entry()));
    }

    #[test]
    fn hard_constraints_need_the_enforce_gate() {
        let hard = constraint(ConstraintKind::Hard, ConstraintScope::Teacher, Some("t1"));
        let options = GenerateOptions {
            respect_soft_constraints: true,
            ..Default::default()
        };
        assert!(entry_is_valid(&[hard], &options, &entry()));
    }

    #[test]
    fn room_scoped_target_never_applies_to_roomless_entries() {
        let hard = constraint(ConstraintKind::Hard, ConstraintScope::Room, Some("r1"));
        let mut e = entry();
        e.room_id = None;
        assert!(entry_is_valid(&[hard.clone()], &enforce_all(), &e));
        assert!(!entry_is_valid(&[hard], &enforce_all(), &entry()));
    }
}
