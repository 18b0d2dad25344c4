use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use types::{
    Catalog, Class, ClassSubjectAssignment, Constraint, GenerateOptions, GeneratedEntry,
    GenerationResult, Room, Subject, Teacher, TeacherSubjectAssignment, TimePeriod,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Read side of the persistence collaborator. Each method is a fetch-all;
/// the engine calls every one of them exactly once per run.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn classes(&self) -> anyhow::Result<Vec<types::Class>>;
    async fn subjects(&self) -> anyhow::Result<Vec<types::Subject>>;
    async fn teachers(&self) -> anyhow::Result<Vec<types::Teacher>>;
    async fn rooms(&self) -> anyhow::Result<Vec<types::Room>>;
    async fn time_periods(&self) -> anyhow::Result<Vec<types::TimePeriod>>;
    async fn class_subject_assignments(&self)
        -> anyhow::Result<Vec<types::ClassSubjectAssignment>>;
    async fn teacher_subject_assignments(
        &self,
    ) -> anyhow::Result<Vec<types::TeacherSubjectAssignment>>;
    async fn active_constraints(&self) -> anyhow::Result<Vec<types::Constraint>>;
}

pub async fn load_catalog(source: &dyn CatalogSource) -> anyhow::Result<Catalog> {
    Ok(Catalog {
        classes: source.classes().await?,
        subjects: source.subjects().await?,
        teachers: source.teachers().await?,
        rooms: source.rooms().await?,
        periods: source.time_periods().await?,
        class_subjects: source.class_subject_assignments().await?,
        teacher_subjects: source.teacher_subject_assignments().await?,
        constraints: source.active_constraints().await?,
    })
}

pub fn validate(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("class", catalog.classes.iter().map(|x| &x.id.0), &mut errors);
    chk_unique(
        "subject",
        catalog.subjects.iter().map(|x| &x.id.0),
        &mut errors,
    );
    chk_unique(
        "teacher",
        catalog.teachers.iter().map(|x| &x.id.0),
        &mut errors,
    );
    chk_unique("room", catalog.rooms.iter().map(|x| &x.id.0), &mut errors);
    chk_unique(
        "time period",
        catalog.periods.iter().map(|x| &x.id.0),
        &mut errors,
    );
    chk_unique(
        "constraint",
        catalog.constraints.iter().map(|x| &x.id.0),
        &mut errors,
    );

    use std::collections::HashSet;
    let classes: HashSet<_> = catalog.classes.iter().map(|c| &c.id.0).collect();
    let subjects: HashSet<_> = catalog.subjects.iter().map(|s| &s.id.0).collect();
    let teachers: HashSet<_> = catalog.teachers.iter().map(|t| &t.id.0).collect();
    let rooms: HashSet<_> = catalog.rooms.iter().map(|r| &r.id.0).collect();

    for t in &catalog.teachers {
        let Some(availability) = &t.availability else {
            continue;
        };
        for (day, windows) in availability {
            for w in windows {
                if w.start >= w.end {
                    errors.push(format!(
                        "teacher {} has an empty availability window on {day}",
                        t.id.0
                    ));
                }
            }
        }
    }

    let mut pairs = HashSet::new();
    for a in &catalog.class_subjects {
        if !classes.contains(&a.class_id.0) {
            errors.push(format!(
                "class-subject assignment references missing class {}",
                a.class_id.0
            ));
        }
        if !subjects.contains(&a.subject_id.0) {
            errors.push(format!(
                "class-subject assignment references missing subject {}",
                a.subject_id.0
            ));
        }
        if let Some(t) = &a.teacher_id {
            if !teachers.contains(&t.0) {
                errors.push(format!(
                    "class-subject assignment references missing teacher {}",
                    t.0
                ));
            }
        }
        if let Some(r) = &a.preferred_room_id {
            if !rooms.contains(&r.0) {
                errors.push(format!(
                    "class-subject assignment references missing room {}",
                    r.0
                ));
            }
        }
        if !pairs.insert((a.class_id.0.clone(), a.subject_id.0.clone())) {
            errors.push(format!(
                "duplicate class-subject assignment: {} / {}",
                a.class_id.0, a.subject_id.0
            ));
        }
    }

    for a in &catalog.teacher_subjects {
        if !teachers.contains(&a.teacher_id.0) {
            errors.push(format!(
                "teacher-subject assignment references missing teacher {}",
                a.teacher_id.0
            ));
        }
        if !subjects.contains(&a.subject_id.0) {
            errors.push(format!(
                "teacher-subject assignment references missing subject {}",
                a.subject_id.0
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Invalid(errors.join("; ")))
    }
}

/// In-memory catalog, for tests and embedders that already hold a snapshot.
pub struct StaticCatalog(pub Catalog);

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn classes(&self) -> anyhow::Result<Vec<types::Class>> {
        Ok(self.0.classes.clone())
    }

    async fn subjects(&self) -> anyhow::Result<Vec<types::Subject>> {
        Ok(self.0.subjects.clone())
    }

    async fn teachers(&self) -> anyhow::Result<Vec<types::Teacher>> {
        Ok(self.0.teachers.clone())
    }

    async fn rooms(&self) -> anyhow::Result<Vec<types::Room>> {
        Ok(self.0.rooms.clone())
    }

    async fn time_periods(&self) -> anyhow::Result<Vec<types::TimePeriod>> {
        Ok(self.0.periods.clone())
    }

    async fn class_subject_assignments(
        &self,
    ) -> anyhow::Result<Vec<types::ClassSubjectAssignment>> {
        Ok(self.0.class_subjects.clone())
    }

    async fn teacher_subject_assignments(
        &self,
    ) -> anyhow::Result<Vec<types::TeacherSubjectAssignment>> {
        Ok(self.0.teacher_subjects.clone())
    }

    async fn active_constraints(&self) -> anyhow::Result<Vec<types::Constraint>> {
        Ok(self
            .0
            .constraints
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }
}

/// The one operation the request layer invokes.
#[async_trait]
pub trait Generator: Send + Sync + 'static {
    async fn generate(
        &self,
        source: Arc<dyn CatalogSource>,
        options: GenerateOptions,
    ) -> anyhow::Result<GenerationResult>;
}
