pub mod conflicts;
pub mod context;
pub mod repair;
pub mod rules;
pub mod slots;

use async_trait::async_trait;
use std::sync::Arc;
use timetable_core::{load_catalog, validate, CatalogSource, Generator};
use tracing::{debug, info, warn};
use types::{
    Catalog, ClassSubjectAssignment, GenerateOptions, GeneratedEntry, GenerationResult,
    GenerationStats,
};

use crate::context::RunContext;
use crate::slots::CandidateSlot;

/// Deterministic first-fit timetable generator. Walks the class-subject
/// assignments in catalog order and commits the first period/teacher/room
/// combination that clears every local check; earlier decisions are never
/// revisited.
pub struct GreedyGenerator;

impl GreedyGenerator {
    pub fn new() -> Self {
        GreedyGenerator
    }

    /// Synchronous core of a run, operating on an already-loaded snapshot.
    pub fn generate_catalog(
        &self,
        catalog: &Catalog,
        options: &GenerateOptions,
    ) -> GenerationResult {
        if catalog.class_subjects.is_empty() {
            return GenerationResult::failure("no class-subject assignments to schedule");
        }
        if let Err(e) = validate(catalog) {
            return GenerationResult::failure(e.to_string());
        }
        run(catalog, options)
    }
}

impl Default for GreedyGenerator {
    fn default() -> Self {
        GreedyGenerator::new()
    }
}

#[async_trait]
impl Generator for GreedyGenerator {
    async fn generate(
        &self,
        source: Arc<dyn CatalogSource>,
        options: GenerateOptions,
    ) -> anyhow::Result<GenerationResult> {
        let catalog = match load_catalog(source.as_ref()).await {
            Ok(catalog) => catalog,
            Err(e) => return Ok(GenerationResult::failure(format!("catalog load failed: {e}"))),
        };
        Ok(self.generate_catalog(&catalog, &options))
    }
}

fn run(catalog: &Catalog, options: &GenerateOptions) -> GenerationResult {
    info!(
        assignments = catalog.class_subjects.len(),
        teachers = catalog.teachers.len(),
        periods = catalog.periods.len(),
        "starting timetable generation"
    );

    let mut ctx = RunContext::new(catalog);
    let mut conflicts: Vec<String> = Vec::new();
    let mut resolved = 0usize;

    for assignment in &catalog.class_subjects {
        // Both ids resolve after validation.
        let Some(subject) = catalog.subject(&assignment.subject_id) else {
            continue;
        };
        let Some(class) = catalog.class(&assignment.class_id) else {
            continue;
        };

        let needed = subject.weekly_hours as usize;
        let found = slots::find_slots(catalog, &ctx, assignment, needed, options);
        if found.len() < needed {
            conflicts.push(format!(
                "{}: only {} of {} periods available for {}",
                class.name,
                found.len(),
                needed,
                subject.name
            ));
        }

        for slot in found {
            let entry = build_entry(assignment, &slot);
            match place(catalog, &mut ctx, entry, options) {
                Placement::Committed => {}
                Placement::Repaired => resolved += 1,
                Placement::Failed(entry) => {
                    let at = catalog
                        .period(&entry.time_period_id)
                        .map(|p| p.label())
                        .unwrap_or_else(|| entry.time_period_id.to_string());
                    warn!(
                        class = %entry.class_id,
                        subject = %entry.subject_id,
                        period = %entry.time_period_id,
                        "unresolved conflict"
                    );
                    conflicts.push(format!(
                        "could not place {} for {} at {}",
                        subject.name, class.name, at
                    ));
                }
            }
        }
    }

    let stats = GenerationStats {
        total_classes: catalog.classes.len(),
        total_entries: ctx.entries().len(),
        conflicts_resolved: resolved,
    };
    info!(
        entries = stats.total_entries,
        conflicts = conflicts.len(),
        resolved,
        "timetable generation finished"
    );

    GenerationResult {
        success: true,
        entries: ctx.into_entries(),
        stats,
        conflicts,
        errors: None,
    }
}

enum Placement {
    Committed,
    Repaired,
    Failed(GeneratedEntry),
}

/// Preferred teacher and room on the assignment override whatever the slot
/// search came up with.
fn build_entry(assignment: &ClassSubjectAssignment, slot: &CandidateSlot) -> GeneratedEntry {
    GeneratedEntry {
        class_id: assignment.class_id.clone(),
        subject_id: assignment.subject_id.clone(),
        teacher_id: assignment
            .teacher_id
            .clone()
            .unwrap_or_else(|| slot.teacher_id.clone()),
        room_id: assignment
            .preferred_room_id
            .clone()
            .or_else(|| slot.room_id.clone()),
        time_period_id: slot.period_id.clone(),
        week_number: 1,
        is_generated: true,
    }
}

fn place(
    catalog: &Catalog,
    ctx: &mut RunContext,
    entry: GeneratedEntry,
    options: &GenerateOptions,
) -> Placement {
    match try_commit(catalog, ctx, entry, options) {
        Ok(()) => Placement::Committed,
        Err(entry) => match repair::resolve(catalog, ctx, &entry) {
            Some(swapped) => match try_commit(catalog, ctx, swapped, options) {
                Ok(()) => Placement::Repaired,
                Err(_) => Placement::Failed(entry),
            },
            None => Placement::Failed(entry),
        },
    }
}

/// Full acceptance check: no double-booking, teacher under caps, constraints
/// satisfied. Repaired entries go through the same check before commit.
fn try_commit(
    catalog: &Catalog,
    ctx: &mut RunContext,
    entry: GeneratedEntry,
    options: &GenerateOptions,
) -> Result<(), GeneratedEntry> {
    let Some(teacher) = catalog.teacher(&entry.teacher_id) else {
        return Err(entry);
    };
    let Some(period) = catalog.period(&entry.time_period_id) else {
        return Err(entry);
    };
    if conflicts::detect(&entry, ctx.entries()).any()
        || !ctx.within_caps(teacher, period.day_of_week)
        || !rules::entry_is_valid(&catalog.constraints, options, &entry)
    {
        return Err(entry);
    }
    let day = period.day_of_week;
    debug!(
        class = %entry.class_id,
        subject = %entry.subject_id,
        teacher = %entry.teacher_id,
        period = %entry.time_period_id,
        "committed entry"
    );
    ctx.commit(entry, day);
    Ok(())
}
