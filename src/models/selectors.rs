// src/models/selectors.rs

//! CSS selectors for scraping the schedule site.

use serde::{Deserialize, Serialize};

/// CSS selectors for every page fragment the extractors read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Item in the group list page
    #[serde(default = "defaults::group_item")]
    pub group_item: String,

    /// Item in the teacher list page
    #[serde(default = "defaults::teacher_item")]
    pub teacher_item: String,

    /// Attribute holding the upstream id of a list item
    #[serde(default = "defaults::id_attr")]
    pub id_attr: String,

    /// Marker rendered instead of day blocks when there is nothing scheduled
    #[serde(default = "defaults::empty_schedule")]
    pub empty_schedule: String,

    /// One dated day
    #[serde(default = "defaults::day_block")]
    pub day_block: String,

    /// Header holding `<Weekday>, DD.MM.YYYY` within a day block
    #[serde(default = "defaults::day_header")]
    pub day_header: String,

    /// One lesson within a day block
    #[serde(default = "defaults::lesson")]
    pub lesson: String,

    /// Time cell within a lesson
    #[serde(default = "defaults::time")]
    pub time: String,

    /// Start time within the time cell
    #[serde(default = "defaults::start_time")]
    pub start_time: String,

    /// End time within the time cell
    #[serde(default = "defaults::end_time")]
    pub end_time: String,

    /// Info cell within a lesson
    #[serde(default = "defaults::info")]
    pub info: String,

    /// Lesson type label within the info cell
    #[serde(default = "defaults::lesson_type")]
    pub lesson_type: String,

    /// Subject title within the info cell
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Teacher entries within the info cell
    #[serde(default = "defaults::teacher")]
    pub teacher: String,

    /// Classroom entries within the info cell
    #[serde(default = "defaults::classroom")]
    pub classroom: String,

    /// Sub-group labels within the info cell
    #[serde(default = "defaults::subgroup")]
    pub subgroup: String,

    /// Group links within a lesson on a teacher's page
    #[serde(default = "defaults::taught_group")]
    pub taught_group: String,

    /// Decorations dropped from subject and teacher text
    #[serde(default = "defaults::teacher_decorations")]
    pub teacher_decorations: String,

    /// Decorations dropped from classroom text
    #[serde(default = "defaults::classroom_decorations")]
    pub classroom_decorations: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            group_item: defaults::group_item(),
            teacher_item: defaults::teacher_item(),
            id_attr: defaults::id_attr(),
            empty_schedule: defaults::empty_schedule(),
            day_block: defaults::day_block(),
            day_header: defaults::day_header(),
            lesson: defaults::lesson(),
            time: defaults::time(),
            start_time: defaults::start_time(),
            end_time: defaults::end_time(),
            info: defaults::info(),
            lesson_type: defaults::lesson_type(),
            subject: defaults::subject(),
            teacher: defaults::teacher(),
            classroom: defaults::classroom(),
            subgroup: defaults::subgroup(),
            taught_group: defaults::taught_group(),
            teacher_decorations: defaults::teacher_decorations(),
            classroom_decorations: defaults::classroom_decorations(),
        }
    }
}

impl PageSelectors {
    /// Every selector string with its field name, for validation.
    pub fn all(&self) -> [(&'static str, &str); 18] {
        [
            ("group_item", &self.group_item),
            ("teacher_item", &self.teacher_item),
            ("empty_schedule", &self.empty_schedule),
            ("day_block", &self.day_block),
            ("day_header", &self.day_header),
            ("lesson", &self.lesson),
            ("time", &self.time),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("info", &self.info),
            ("lesson_type", &self.lesson_type),
            ("subject", &self.subject),
            ("teacher", &self.teacher),
            ("classroom", &self.classroom),
            ("subgroup", &self.subgroup),
            ("taught_group", &self.taught_group),
            ("teacher_decorations", &self.teacher_decorations),
            ("classroom_decorations", &self.classroom_decorations),
        ]
    }
}

mod defaults {
    pub fn group_item() -> String {
        r#"div[name="gr"]"#.into()
    }
    pub fn teacher_item() -> String {
        r#"div[name="prep"]"#.into()
    }
    pub fn id_attr() -> String {
        "data".into()
    }
    pub fn empty_schedule() -> String {
        ".no-schedule, .empty-schedule".into()
    }
    pub fn day_block() -> String {
        ".dateBlock".into()
    }
    pub fn day_header() -> String {
        ".dateToday".into()
    }
    pub fn lesson() -> String {
        ".disciplina_cont".into()
    }
    pub fn time() -> String {
        ".disciplina_time".into()
    }
    pub fn start_time() -> String {
        "p".into()
    }
    pub fn end_time() -> String {
        ".end-time".into()
    }
    pub fn info() -> String {
        ".disciplina_info".into()
    }
    pub fn lesson_type() -> String {
        ".predmet-type".into()
    }
    pub fn subject() -> String {
        "p".into()
    }
    pub fn teacher() -> String {
        ".prepod".into()
    }
    pub fn classroom() -> String {
        ".auditioria".into()
    }
    pub fn subgroup() -> String {
        ".subgroup span".into()
    }
    pub fn taught_group() -> String {
        ".allgroup a.view-link".into()
    }
    pub fn teacher_decorations() -> String {
        "i".into()
    }
    pub fn classroom_decorations() -> String {
        "i, .pg, .subgroup".into()
    }
}
