use crate::context::RunContext;
use types::{
    Catalog, ClassSubjectAssignment, GenerateOptions, PeriodId, RoomId, SubjectId, Teacher,
    TeacherId, TimePeriod,
};

#[derive(Clone, Debug)]
pub struct CandidateSlot {
    pub period_id: PeriodId,
    pub teacher_id: TeacherId,
    pub room_id: Option<RoomId>,
}

/// First-fit slot search for one class-subject pairing: walk the ordered
/// periods, take the first eligible teacher that is free and under its caps,
/// then attach a room. No lookahead, no revisiting of earlier periods.
pub fn find_slots(
    catalog: &Catalog,
    ctx: &RunContext,
    assignment: &ClassSubjectAssignment,
    periods_needed: usize,
    options: &GenerateOptions,
) -> Vec<CandidateSlot> {
    if periods_needed == 0 {
        return Vec::new();
    }
    let eligible = eligible_teachers(catalog, &assignment.subject_id);
    let mut found = Vec::with_capacity(periods_needed);
    for period in ordered_periods(catalog, options) {
        if found.len() == periods_needed {
            break;
        }
        let Some(teacher) = eligible
            .iter()
            .find(|t| is_teacher_available(t, period) && ctx.within_caps(t, period.day_of_week))
        else {
            continue;
        };
        found.push(CandidateSlot {
            period_id: period.id.clone(),
            teacher_id: teacher.id.clone(),
            room_id: pick_room(catalog, ctx, assignment.preferred_room_id.as_ref(), &period.id),
        });
    }
    found
}

/// Teachers qualified for a subject, in catalog order.
pub fn eligible_teachers<'a>(catalog: &'a Catalog, subject: &SubjectId) -> Vec<&'a Teacher> {
    catalog
        .teachers
        .iter()
        .filter(|t| {
            catalog
                .teacher_subjects
                .iter()
                .any(|ts| ts.subject_id == *subject && ts.teacher_id == t.id)
        })
        .collect()
}

fn ordered_periods<'a>(catalog: &'a Catalog, options: &GenerateOptions) -> Vec<&'a TimePeriod> {
    let mut periods: Vec<&TimePeriod> = catalog.periods.iter().filter(|p| !p.is_break).collect();
    if options.prioritize_morning_classes {
        periods.sort_by_key(|p| p.start_time.hour);
    } else {
        periods.sort_by_key(|p| p.order_index);
    }
    periods
}

/// Availability is hour-granular: some window on the period's day must start
/// no later and end no earlier than the period. No windows at all means the
/// teacher is free all week.
pub fn is_teacher_available(teacher: &Teacher, period: &TimePeriod) -> bool {
    let Some(availability) = &teacher.availability else {
        return true;
    };
    let Some(windows) = availability.get(&period.day_of_week) else {
        return false;
    };
    windows.iter().any(|w| {
        w.start.hour <= period.start_time.hour && w.end.hour >= period.end_time.hour
    })
}

fn pick_room(
    catalog: &Catalog,
    ctx: &RunContext,
    preferred: Option<&RoomId>,
    period: &PeriodId,
) -> Option<RoomId> {
    if let Some(room) = preferred.and_then(|id| catalog.room(id)) {
        if room.is_available && !ctx.room_booked(&room.id, period) {
            return Some(room.id.clone());
        }
    }
    catalog
        .rooms
        .iter()
        .find(|r| r.is_available && !ctx.room_booked(&r.id, period))
        .map(|r| r.id.clone())
}
