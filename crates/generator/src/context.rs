use std::collections::HashMap;
use types::{Catalog, DayOfWeek, GeneratedEntry, PeriodId, RoomId, Teacher, TeacherId};

/// State owned by a single generation run. A context is created fresh for
/// every call and dropped with it; concurrent runs share nothing.
pub struct RunContext {
    committed: Vec<GeneratedEntry>,
    workload: WorkloadLedger,
}

impl RunContext {
    pub fn new(catalog: &Catalog) -> Self {
        RunContext {
            committed: Vec::new(),
            workload: WorkloadLedger::seeded(catalog.teachers.iter().map(|t| t.id.clone())),
        }
    }

    pub fn entries(&self) -> &[GeneratedEntry] {
        &self.committed
    }

    pub fn within_caps(&self, teacher: &Teacher, day: DayOfWeek) -> bool {
        self.workload.within_caps(teacher, day)
    }

    pub fn room_booked(&self, room: &RoomId, period: &PeriodId) -> bool {
        self.committed
            .iter()
            .any(|e| e.time_period_id == *period && e.room_id.as_ref() == Some(room))
    }

    pub fn commit(&mut self, entry: GeneratedEntry, day: DayOfWeek) {
        self.workload.record(&entry.teacher_id, day);
        self.committed.push(entry);
    }

    pub fn into_entries(self) -> Vec<GeneratedEntry> {
        self.committed
    }
}

#[derive(Clone, Debug, Default)]
struct TeacherLoad {
    per_day: HashMap<DayOfWeek, u32>,
    week_total: u32,
}

/// Per-teacher counters against the daily/weekly caps. Counters move only
/// when an entry is committed.
pub struct WorkloadLedger {
    loads: HashMap<TeacherId, TeacherLoad>,
}

impl WorkloadLedger {
    pub fn seeded(teachers: impl Iterator<Item = TeacherId>) -> Self {
        WorkloadLedger {
            loads: teachers.map(|id| (id, TeacherLoad::default())).collect(),
        }
    }

    pub fn within_caps(&self, teacher: &Teacher, day: DayOfWeek) -> bool {
        let Some(load) = self.loads.get(&teacher.id) else {
            return false;
        };
        let today = load.per_day.get(&day).copied().unwrap_or(0);
        today < teacher.max_classes_per_day && load.week_total < teacher.max_classes_per_week
    }

    pub fn record(&mut self, teacher: &TeacherId, day: DayOfWeek) {
        let load = self.loads.entry(teacher.clone()).or_default();
        *load.per_day.entry(day).or_insert(0) += 1;
        load.week_total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(per_day: u32, per_week: u32) -> Teacher {
        Teacher {
            id: TeacherId("t1".into()),
            name: "Ada".into(),
            max_classes_per_day: per_day,
            max_classes_per_week: per_week,
            availability: None,
        }
    }

    #[test]
    fn daily_cap_blocks_same_day_only() {
        let t = teacher(1, 10);
        let mut ledger = WorkloadLedger::seeded(std::iter::once(t.id.clone()));
        assert!(ledger.within_caps(&t, DayOfWeek::Mon));
        ledger.record(&t.id, DayOfWeek::Mon);
        assert!(!ledger.within_caps(&t, DayOfWeek::Mon));
        assert!(ledger.within_caps(&t, DayOfWeek::Tue));
    }

    #[test]
    fn weekly_cap_blocks_every_day() {
        let t = teacher(5, 2);
        let mut ledger = WorkloadLedger::seeded(std::iter::once(t.id.clone()));
        ledger.record(&t.id, DayOfWeek::Mon);
        ledger.record(&t.id, DayOfWeek::Tue);
        assert!(!ledger.within_caps(&t, DayOfWeek::Wed));
    }

    #[test]
    fn unknown_teacher_is_never_assignable() {
        let ledger = WorkloadLedger::seeded(std::iter::empty());
        assert!(!ledger.within_caps(&teacher(5, 10), DayOfWeek::Mon));
    }
}
