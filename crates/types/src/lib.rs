use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(ClassId);
id_newtype!(SubjectId);
id_newtype!(TeacherId);
id_newtype!(RoomId);
id_newtype!(PeriodId);
id_newtype!(ConstraintId);

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
            DayOfWeek::Sat => "sat",
            DayOfWeek::Sun => "sun",
        };
        f.write_str(s)
    }
}

/// Wall-clock time of day, carried as "HH:MM" on the wire.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid time of day: {s}"))?;
        let hour: u8 = h.parse().map_err(|_| format!("invalid hour: {s}"))?;
        let minute: u8 = m.parse().map_err(|_| format!("invalid minute: {s}"))?;
        if hour > 23 || minute > 59 {
            return Err(format!("time of day out of range: {s}"));
        }
        Ok(ClockTime { hour, minute })
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl JsonSchema for ClockTime {
    fn schema_name() -> String {
        "ClockTime".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Per-day availability windows; a day missing from the map has none.
pub type AvailabilityMap = BTreeMap<DayOfWeek, Vec<TimeWindow>>;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub level: String,
    pub section: String,
    pub max_students: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub weekly_hours: u32,
    #[serde(default)]
    pub requires_lab: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub max_classes_per_day: u32,
    pub max_classes_per_week: u32,
    /// `None` means the teacher is available all week.
    #[serde(default)]
    pub availability: Option<AvailabilityMap>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    #[default]
    Classroom,
    Lab,
    Auditorium,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(rename = "type", default)]
    pub kind: RoomKind,
    pub capacity: u32,
    pub is_available: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub id: PeriodId,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub is_break: bool,
    pub order_index: u32,
}

impl TimePeriod {
    pub fn label(&self) -> String {
        format!("{} {}", self.day_of_week, self.start_time)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSubjectAssignment {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub preferred_room_id: Option<RoomId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSubjectAssignment {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Hard,
    Soft,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintScope {
    Subject,
    Teacher,
    Class,
    Room,
    Global,
}

/// Declared rule payloads. Unrecognized shapes are kept verbatim in `Other`;
/// none of them are interpreted during placement, only scope/target gating is.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConstraintRule {
    ExcludeWindow {
        day: DayOfWeek,
        start: ClockTime,
        end: ClockTime,
    },
    #[serde(rename_all = "camelCase")]
    CapacityLimit { max_students: u32 },
    Note { text: String },
    Other(serde_json::Value),
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub id: ConstraintId,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub scope: ConstraintScope,
    #[serde(default)]
    pub target_id: Option<String>,
    pub rule: ConstraintRule,
    #[serde(default)]
    pub priority: i32,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEntry {
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    pub time_period_id: PeriodId,
    pub week_number: u32,
    pub is_generated: bool,
}

/// Read-only snapshot of everything one generation run consumes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub rooms: Vec<Room>,
    pub periods: Vec<TimePeriod>,
    pub class_subjects: Vec<ClassSubjectAssignment>,
    pub teacher_subjects: Vec<TeacherSubjectAssignment>,
    pub constraints: Vec<Constraint>,
}

impl Catalog {
    pub fn class(&self, id: &ClassId) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == *id)
    }

    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == *id)
    }

    pub fn teacher(&self, id: &TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == *id)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == *id)
    }

    pub fn period(&self, id: &PeriodId) -> Option<&TimePeriod> {
        self.periods.iter().find(|p| p.id == *id)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Recognized but not applied to candidate ranking yet.
    pub optimize_teacher_workload: bool,
    /// Recognized but not applied to candidate ranking yet.
    pub minimize_room_changes: bool,
    pub prioritize_morning_classes: bool,
    pub enforce_hard_constraints: bool,
    pub respect_soft_constraints: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub total_classes: usize,
    pub total_entries: usize,
    pub conflicts_resolved: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub entries: Vec<GeneratedEntry>,
    pub stats: GenerationStats,
    pub conflicts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl GenerationResult {
    /// Fatal outcome: no entries, no partial state, one error message.
    pub fn failure(message: impl Into<String>) -> Self {
        GenerationResult {
            success: false,
            entries: Vec::new(),
            stats: GenerationStats::default(),
            conflicts: Vec::new(),
            errors: Some(vec![message.into()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_parses_and_formats() {
        let t: ClockTime = "08:30".parse().unwrap();
        assert_eq!((t.hour, t.minute), (8, 30));
        assert_eq!(t.to_string(), "08:30");
        assert_eq!("9:05".parse::<ClockTime>().unwrap().to_string(), "09:05");
    }

    #[test]
    fn clock_time_rejects_garbage() {
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("08:61".parse::<ClockTime>().is_err());
        assert!("0800".parse::<ClockTime>().is_err());
        assert!("aa:bb".parse::<ClockTime>().is_err());
    }

    #[test]
    fn clock_time_orders_by_hour_then_minute() {
        let a: ClockTime = "08:00".parse().unwrap();
        let b: ClockTime = "08:30".parse().unwrap();
        let c: ClockTime = "09:15".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn constraint_rule_decodes_known_shapes() {
        let rule: ConstraintRule =
            serde_json::from_str(r#"{"day":"mon","start":"08:00","end":"10:00"}"#).unwrap();
        assert!(matches!(rule, ConstraintRule::ExcludeWindow { .. }));

        let rule: ConstraintRule = serde_json::from_str(r#"{"maxStudents":30}"#).unwrap();
        assert!(matches!(
            rule,
            ConstraintRule::CapacityLimit { max_students: 30 }
        ));

        let rule: ConstraintRule = serde_json::from_str(r#"{"text":"avoid fridays"}"#).unwrap();
        assert!(matches!(rule, ConstraintRule::Note { .. }));
    }

    #[test]
    fn constraint_rule_keeps_unknown_payloads() {
        let rule: ConstraintRule =
            serde_json::from_str(r#"{"someVendorField":[1,2,3]}"#).unwrap();
        match rule {
            ConstraintRule::Other(v) => assert!(v.get("someVendorField").is_some()),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn teacher_without_availability_deserializes_to_none() {
        let teacher: Teacher = serde_json::from_str(
            r#"{"id":"t1","name":"Ada","maxClassesPerDay":4,"maxClassesPerWeek":20}"#,
        )
        .unwrap();
        assert!(teacher.availability.is_none());
    }

    #[test]
    fn failure_result_is_empty_and_unsuccessful() {
        let r = GenerationResult::failure("boom");
        assert!(!r.success);
        assert!(r.entries.is_empty());
        assert_eq!(r.stats, GenerationStats::default());
        assert_eq!(r.errors.as_deref(), Some(&["boom".to_string()][..]));
    }
}
