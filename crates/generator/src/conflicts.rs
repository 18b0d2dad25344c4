use types::GeneratedEntry;

/// Which double-bookings a candidate entry would introduce.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConflictReport {
    pub teacher: bool,
    pub room: bool,
    pub class: bool,
}

impl ConflictReport {
    pub fn any(&self) -> bool {
        self.teacher || self.room || self.class
    }
}

/// Pure membership tests over the entries committed so far; only entries in
/// the same time period can collide.
pub fn detect(entry: &GeneratedEntry, committed: &[GeneratedEntry]) -> ConflictReport {
    let mut report = ConflictReport::default();
    for other in committed
        .iter()
        .filter(|e| e.time_period_id == entry.time_period_id)
    {
        report.teacher |= other.teacher_id == entry.teacher_id;
        report.class |= other.class_id == entry.class_id;
        if let (Some(a), Some(b)) = (&entry.room_id, &other.room_id) {
            report.room |= a == b;
        }
    }
    report
}
