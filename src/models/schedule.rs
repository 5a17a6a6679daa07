//! Day blocks and lesson entries extracted from schedule pages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day of the week, serialized with the upstream (Russian) names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Понедельник")]
    Monday,
    #[serde(rename = "Вторник")]
    Tuesday,
    #[serde(rename = "Среда")]
    Wednesday,
    #[serde(rename = "Четверг")]
    Thursday,
    #[serde(rename = "Пятница")]
    Friday,
    #[serde(rename = "Суббота")]
    Saturday,
    #[serde(rename = "Воскресенье")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical upstream name.
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Понедельник",
            Weekday::Tuesday => "Вторник",
            Weekday::Wednesday => "Среда",
            Weekday::Thursday => "Четверг",
            Weekday::Friday => "Пятница",
            Weekday::Saturday => "Суббота",
            Weekday::Sunday => "Воскресенье",
        }
    }

    /// Look up a weekday by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.name().to_lowercase() == lower)
    }
}

/// One dated day of a schedule with its lessons in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBlock {
    pub day_name: Weekday,

    /// Calendar date, serialized as `DD.MM.YYYY`
    #[serde(with = "date_format")]
    pub date: NaiveDate,

    /// Never empty in extractor output
    pub lessons: Vec<Lesson>,
}

/// A lesson as seen from either side of the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lesson {
    Group(GroupLesson),
    Teacher(TeacherLesson),
}

/// Lesson entry on a group's schedule.
///
/// `first*`/`second*` hold the two parallel sub-group sessions a single
/// timetable cell may carry. Absent values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLesson {
    /// `start-end`, or empty if either half is missing
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub first_teacher: String,
    pub first_classroom: String,
    pub first_group: String,
    pub second_teacher: String,
    pub second_classroom: String,
    pub second_group: String,
}

/// Lesson entry on a teacher's schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherLesson {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub group: String,
    pub classroom: String,
    pub additional_group: String,
    pub additional_classroom: String,
}

impl Lesson {
    pub fn time(&self) -> &str {
        match self {
            Lesson::Group(lesson) => &lesson.time,
            Lesson::Teacher(lesson) => &lesson.time,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Lesson::Group(lesson) => &lesson.subject,
            Lesson::Teacher(lesson) => &lesson.subject,
        }
    }
}

/// Serde adapter for the `DD.MM.YYYY` date form used by the upstream site.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%d.%m.%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_lookup_ignores_case() {
        assert_eq!(Weekday::from_name("Вторник"), Some(Weekday::Tuesday));
        assert_eq!(Weekday::from_name("вторник"), Some(Weekday::Tuesday));
        assert_eq!(Weekday::from_name("ВОСКРЕСЕНЬЕ"), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_name("Tuesday"), None);
    }

    #[test]
    fn day_block_serializes_upstream_shape() {
        let block = DayBlock {
            day_name: Weekday::Tuesday,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            lessons: vec![Lesson::Teacher(TeacherLesson {
                time: "08:30-10:00".into(),
                kind: "Лекция".into(),
                subject: "Физика".into(),
                group: "ИС-21".into(),
                ..TeacherLesson::default()
            })],
        };

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["dayName"], "Вторник");
        assert_eq!(json["date"], "05.03.2024");
        assert_eq!(json["lessons"][0]["type"], "Лекция");
        assert_eq!(json["lessons"][0]["additionalGroup"], "");
    }
}
