#![allow(dead_code)]

use types::{
    AvailabilityMap, Class, ClassId, ClassSubjectAssignment, DayOfWeek, PeriodId, Room, RoomId,
    RoomKind, Subject, SubjectId, Teacher, TeacherId, TeacherSubjectAssignment, TimePeriod,
    TimeWindow,
};

pub fn class(id: &str, name: &str) -> Class {
    Class {
        id: ClassId(id.into()),
        name: name.into(),
        level: "7".into(),
        section: "A".into(),
        max_students: 30,
    }
}

pub fn subject(id: &str, name: &str, weekly_hours: u32) -> Subject {
    Subject {
        id: SubjectId(id.into()),
        name: name.into(),
        code: id.to_uppercase(),
        weekly_hours,
        requires_lab: false,
    }
}

pub fn teacher(id: &str, name: &str, per_day: u32, per_week: u32) -> Teacher {
    Teacher {
        id: TeacherId(id.into()),
        name: name.into(),
        max_classes_per_day: per_day,
        max_classes_per_week: per_week,
        availability: None,
    }
}

pub fn with_window(mut teacher: Teacher, day: DayOfWeek, from: &str, to: &str) -> Teacher {
    let window = TimeWindow {
        start: from.parse().unwrap(),
        end: to.parse().unwrap(),
    };
    teacher
        .availability
        .get_or_insert_with(AvailabilityMap::new)
        .entry(day)
        .or_default()
        .push(window);
    teacher
}

pub fn room(id: &str) -> Room {
    Room {
        id: RoomId(id.into()),
        kind: RoomKind::Classroom,
        capacity: 32,
        is_available: true,
    }
}

pub fn period(id: &str, day: DayOfWeek, from: &str, to: &str, order: u32) -> TimePeriod {
    TimePeriod {
        id: PeriodId(id.into()),
        start_time: from.parse().unwrap(),
        end_time: to.parse().unwrap(),
        day_of_week: day,
        is_break: false,
        order_index: order,
    }
}

pub fn break_period(id: &str, day: DayOfWeek, from: &str, to: &str, order: u32) -> TimePeriod {
    TimePeriod {
        is_break: true,
        ..period(id, day, from, to, order)
    }
}

pub fn pairing(class: &str, subject: &str) -> ClassSubjectAssignment {
    ClassSubjectAssignment {
        class_id: ClassId(class.into()),
        subject_id: SubjectId(subject.into()),
        teacher_id: None,
        preferred_room_id: None,
    }
}

pub fn teaches(teacher: &str, subject: &str) -> TeacherSubjectAssignment {
    TeacherSubjectAssignment {
        teacher_id: TeacherId(teacher.into()),
        subject_id: SubjectId(subject.into()),
    }
}
