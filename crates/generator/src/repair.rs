use crate::conflicts;
use crate::context::RunContext;
use crate::slots;
use tracing::debug;
use types::{Catalog, GeneratedEntry};

/// Local repair for a rejected candidate: try one alternate teacher, then one
/// alternate room. Caps are not re-checked here; the caller re-runs the full
/// acceptance check on whatever comes back.
pub fn resolve(
    catalog: &Catalog,
    ctx: &RunContext,
    entry: &GeneratedEntry,
) -> Option<GeneratedEntry> {
    let period = catalog.period(&entry.time_period_id)?;

    for teacher in slots::eligible_teachers(catalog, &entry.subject_id) {
        if teacher.id == entry.teacher_id || !slots::is_teacher_available(teacher, period) {
            continue;
        }
        let mut swapped = entry.clone();
        swapped.teacher_id = teacher.id.clone();
        let report = conflicts::detect(&swapped, ctx.entries());
        if !report.teacher && !report.class {
            debug!(teacher = %swapped.teacher_id, period = %period.id, "swapped in alternate teacher");
            return Some(swapped);
        }
    }

    if let Some(current) = &entry.room_id {
        for room in catalog
            .rooms
            .iter()
            .filter(|r| r.is_available && r.id != *current)
        {
            let mut swapped = entry.clone();
            swapped.room_id = Some(room.id.clone());
            if !conflicts::detect(&swapped, ctx.entries()).room {
                debug!(room = %room.id, period = %period.id, "swapped in alternate room");
                return Some(swapped);
            }
        }
    }

    None
}
