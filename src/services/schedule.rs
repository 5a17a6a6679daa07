// src/services/schedule.rs

//! Schedule page extraction.
//!
//! Group and teacher pages share the day/date layout and differ only in
//! which lists a lesson collects, so one extractor serves both, selected by
//! [`SubjectKind`].
//!
//! Extraction works by omission: a day without a recognizable header, a
//! lesson without its time or info cell, and a day left without lessons are
//! skipped rather than emitted with blank fields.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{
    DayBlock, GroupLesson, Lesson, PageSelectors, SubjectKind, TeacherLesson, Weekday,
    date_format,
};
use crate::services::Document;
use crate::utils::html::{first_text, parse_selector, text_without};
use crate::utils::{clean_entry, clean_text};

/// Compiled selectors shared by both variants.
struct Selectors {
    empty_schedule: Selector,
    day_block: Selector,
    day_header: Selector,
    lesson: Selector,
    time: Selector,
    start_time: Selector,
    end_time: Selector,
    info: Selector,
    lesson_type: Selector,
    subject: Selector,
    teacher: Selector,
    classroom: Selector,
    subgroup: Selector,
    taught_group: Selector,
    teacher_decorations: Selector,
    classroom_decorations: Selector,
}

impl Selectors {
    fn compile(s: &PageSelectors) -> Result<Self> {
        Ok(Self {
            empty_schedule: parse_selector(&s.empty_schedule)?,
            day_block: parse_selector(&s.day_block)?,
            day_header: parse_selector(&s.day_header)?,
            lesson: parse_selector(&s.lesson)?,
            time: parse_selector(&s.time)?,
            start_time: parse_selector(&s.start_time)?,
            end_time: parse_selector(&s.end_time)?,
            info: parse_selector(&s.info)?,
            lesson_type: parse_selector(&s.lesson_type)?,
            subject: parse_selector(&s.subject)?,
            teacher: parse_selector(&s.teacher)?,
            classroom: parse_selector(&s.classroom)?,
            subgroup: parse_selector(&s.subgroup)?,
            taught_group: parse_selector(&s.taught_group)?,
            teacher_decorations: parse_selector(&s.teacher_decorations)?,
            classroom_decorations: parse_selector(&s.classroom_decorations)?,
        })
    }
}

/// Where a variant reads its group list from.
#[derive(Clone, Copy)]
enum Scope {
    /// Inside the lesson's info cell
    Info,
    /// Anywhere inside the lesson
    Lesson,
}

/// The per-variant part of lesson extraction.
struct LessonLayout<'a> {
    groups: &'a Selector,
    groups_scope: Scope,
    teachers: Option<&'a Selector>,
}

/// Lists collected from one lesson, in document order.
#[derive(Default)]
struct LessonParts {
    time: String,
    kind: String,
    subject: String,
    teachers: Vec<String>,
    classrooms: Vec<String>,
    groups: Vec<String>,
}

/// Extracts dated day blocks from a group or teacher schedule page.
pub struct ScheduleExtractor {
    kind: SubjectKind,
    selectors: Selectors,
    header: Regex,
}

impl ScheduleExtractor {
    pub fn new(kind: SubjectKind, selectors: &PageSelectors) -> Result<Self> {
        let names: Vec<&str> = Weekday::ALL.iter().map(Weekday::name).collect();
        let header = Regex::new(&format!(
            r"(?i)({}),\s*([0-9]{{2}}\.[0-9]{{2}}\.[0-9]{{4}})",
            names.join("|")
        ))?;

        Ok(Self {
            kind,
            selectors: Selectors::compile(selectors)?,
            header,
        })
    }

    /// Parse a fetched schedule page.
    pub fn extract_page(&self, page: &Document) -> Vec<DayBlock> {
        self.extract(&page.html())
    }

    /// Day blocks in document order, each with at least one lesson.
    pub fn extract(&self, document: &Html) -> Vec<DayBlock> {
        if document.select(&self.selectors.empty_schedule).next().is_some() {
            log::debug!("Empty {} schedule marker found", self.kind);
            return Vec::new();
        }

        document
            .select(&self.selectors.day_block)
            .filter_map(|block| self.extract_day(block))
            .collect()
    }

    /// Match `<Weekday>, DD.MM.YYYY` anywhere in a header text.
    pub fn parse_header(&self, text: &str) -> Option<(Weekday, NaiveDate)> {
        let caps = self.header.captures(text)?;
        let day_name = Weekday::from_name(&caps[1])?;
        let date = NaiveDate::parse_from_str(&caps[2], date_format::FORMAT).ok()?;
        Some((day_name, date))
    }

    fn extract_day(&self, block: ElementRef<'_>) -> Option<DayBlock> {
        let header = block.select(&self.selectors.day_header).next()?;
        let header_text: String = header.text().collect();
        let Some((day_name, date)) = self.parse_header(&header_text) else {
            log::debug!("Skipping day block with header {:?}", header_text.trim());
            return None;
        };

        let lessons: Vec<Lesson> = block
            .select(&self.selectors.lesson)
            .filter_map(|lesson| self.extract_lesson(lesson))
            .collect();

        if lessons.is_empty() {
            return None;
        }

        Some(DayBlock {
            day_name,
            date,
            lessons,
        })
    }

    fn layout(&self) -> LessonLayout<'_> {
        match self.kind {
            SubjectKind::Group => LessonLayout {
                groups: &self.selectors.subgroup,
                groups_scope: Scope::Info,
                teachers: Some(&self.selectors.teacher),
            },
            SubjectKind::Teacher => LessonLayout {
                groups: &self.selectors.taught_group,
                groups_scope: Scope::Lesson,
                teachers: None,
            },
        }
    }

    fn extract_lesson(&self, lesson: ElementRef<'_>) -> Option<Lesson> {
        let s = &self.selectors;
        let time_cell = lesson.select(&s.time).next()?;
        let info = lesson.select(&s.info).next()?;
        let layout = self.layout();

        let start = first_text(time_cell, &s.start_time)
            .map(|t| clean_text(&t))
            .unwrap_or_default();
        let end = first_text(time_cell, &s.end_time)
            .map(|t| clean_text(&t))
            .unwrap_or_default();
        let time = if start.is_empty() || end.is_empty() {
            String::new()
        } else {
            format!("{start}-{end}")
        };

        let group_scope = match layout.groups_scope {
            Scope::Info => info,
            Scope::Lesson => lesson,
        };

        let parts = LessonParts {
            time,
            kind: first_text(info, &s.lesson_type)
                .map(|t| clean_text(&t))
                .unwrap_or_default(),
            subject: info
                .select(&s.subject)
                .next()
                .map(|el| clean_entry(&text_without(el, Some(&s.teacher_decorations))))
                .unwrap_or_default(),
            teachers: layout
                .teachers
                .map(|sel| collect(info, sel, Some(&s.teacher_decorations)))
                .unwrap_or_default(),
            classrooms: collect(info, &s.classroom, Some(&s.classroom_decorations)),
            groups: collect(group_scope, layout.groups, None),
        };

        Some(self.assemble(parts))
    }

    /// Build the variant's lesson; entries beyond the second are dropped.
    fn assemble(&self, parts: LessonParts) -> Lesson {
        match self.kind {
            SubjectKind::Group => Lesson::Group(GroupLesson {
                first_teacher: slot(&parts.teachers, 0),
                first_classroom: slot(&parts.classrooms, 0),
                first_group: slot(&parts.groups, 0),
                second_teacher: slot(&parts.teachers, 1),
                second_classroom: slot(&parts.classrooms, 1),
                second_group: slot(&parts.groups, 1),
                time: parts.time,
                kind: parts.kind,
                subject: parts.subject,
            }),
            SubjectKind::Teacher => Lesson::Teacher(TeacherLesson {
                group: slot(&parts.groups, 0),
                classroom: slot(&parts.classrooms, 0),
                additional_group: slot(&parts.groups, 1),
                additional_classroom: slot(&parts.classrooms, 1),
                time: parts.time,
                kind: parts.kind,
                subject: parts.subject,
            }),
        }
    }
}

fn collect(scope: ElementRef<'_>, selector: &Selector, strip: Option<&Selector>) -> Vec<String> {
    scope
        .select(selector)
        .map(|el| clean_entry(&text_without(el, strip)))
        .collect()
}

fn slot(entries: &[String], index: usize) -> String {
    entries.get(index).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP_PAGE: &str = r#"
        <html><body>
          <div class="dateBlock">
            <div class="dateToday">Вторник, 05.03.2024</div>
            <div class="disciplina_cont">
              <div class="disciplina_time"><p>08:30</p><span class="end-time">10:00</span></div>
              <div class="disciplina_info">
                <span class="predmet-type">Лабораторная</span>
                <p>Базы данных</p>
                <div class="prepod"><i class="fa fa-graduation-cap"></i> Иванов И.И.?</div>
                <div class="prepod"><i class="fa fa-graduation-cap"></i> Петров П.П.</div>
                <div class="auditioria"><i class="fa fa-university"></i> 3-101
                  <span class="pg">ПГ</span><span class="subgroup"><span>1 п/г</span></span></div>
              </div>
            </div>
          </div>
          <div class="dateBlock">
            <div class="dateToday">среда, 06.03.2024</div>
            <div class="disciplina_cont">
              <div class="disciplina_time"><p>10:10</p></div>
              <div class="disciplina_info"><p>Философия</p></div>
            </div>
            <div class="disciplina_cont">
              <div class="disciplina_info"><p>Без времени</p></div>
            </div>
          </div>
          <div class="dateBlock">
            <div class="dateToday">Четверг, 07.03.2024</div>
          </div>
          <div class="dateBlock">
            <div class="dateToday">Пятница 08.03.2024</div>
            <div class="disciplina_cont">
              <div class="disciplina_time"><p>08:30</p><span class="end-time">10:00</span></div>
              <div class="disciplina_info"><p>Без даты</p></div>
            </div>
          </div>
          <div class="dateBlock">
            <div class="disciplina_cont">
              <div class="disciplina_time"><p>08:30</p><span class="end-time">10:00</span></div>
              <div class="disciplina_info"><p>Без заголовка</p></div>
            </div>
          </div>
        </body></html>
    "#;

    const TEACHER_PAGE: &str = r#"
        <html><body>
          <div class="dateBlock">
            <div class="dateToday">Понедельник, 04.03.2024</div>
            <div class="disciplina_cont">
              <div class="disciplina_time"><p>12:00</p><span class="end-time">13:30</span></div>
              <div class="disciplina_info">
                <span class="predmet-type">Лекция</span>
                <p>Физика</p>
                <div class="auditioria"><i class="fa fa-university"></i> 2-205</div>
              </div>
              <div class="allgroup">
                <a class="view-link" href="?v_gru=4949">ИС-21</a>
                <a class="view-link" href="?v_gru=4950">ИС-22</a>
                <a class="view-link" href="?v_gru=4951">ИС-23</a>
              </div>
            </div>
          </div>
        </body></html>
    "#;

    fn extractor(kind: SubjectKind) -> ScheduleExtractor {
        ScheduleExtractor::new(kind, &PageSelectors::default()).unwrap()
    }

    fn group_lesson(lesson: &Lesson) -> &GroupLesson {
        match lesson {
            Lesson::Group(lesson) => lesson,
            Lesson::Teacher(_) => panic!("expected group lesson"),
        }
    }

    #[test]
    fn extracts_split_group_lesson() {
        let days = extractor(SubjectKind::Group).extract(&Html::parse_document(GROUP_PAGE));

        let tuesday = &days[0];
        assert_eq!(tuesday.day_name, Weekday::Tuesday);
        assert_eq!(tuesday.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(tuesday.lessons.len(), 1);

        let lesson = group_lesson(&tuesday.lessons[0]);
        assert_eq!(lesson.time, "08:30-10:00");
        assert_eq!(lesson.kind, "Лабораторная");
        assert_eq!(lesson.subject, "Базы данных");
        assert_eq!(lesson.first_teacher, "Иванов И.И.");
        assert_eq!(lesson.second_teacher, "Петров П.П.");
        assert_eq!(lesson.first_classroom, "3-101");
        assert_eq!(lesson.second_classroom, "");
        assert_eq!(lesson.first_group, "1 п/г");
        assert_eq!(lesson.second_group, "");
    }

    #[test]
    fn half_missing_time_is_emptied() {
        let days = extractor(SubjectKind::Group).extract(&Html::parse_document(GROUP_PAGE));

        let wednesday = &days[1];
        assert_eq!(wednesday.day_name, Weekday::Wednesday);
        assert_eq!(wednesday.lessons.len(), 1, "lesson without time cell is skipped");
        assert_eq!(wednesday.lessons[0].time(), "");
        assert_eq!(wednesday.lessons[0].subject(), "Философия");
    }

    #[test]
    fn unusable_blocks_are_skipped() {
        let days = extractor(SubjectKind::Group).extract(&Html::parse_document(GROUP_PAGE));

        // Thursday has no lessons, Friday's header lacks the comma, the last
        // block has no header at all.
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|day| !day.lessons.is_empty()));
    }

    #[test]
    fn teacher_variant_collects_taught_groups() {
        let days = extractor(SubjectKind::Teacher).extract(&Html::parse_document(TEACHER_PAGE));

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_name, Weekday::Monday);
        let Lesson::Teacher(lesson) = &days[0].lessons[0] else {
            panic!("expected teacher lesson");
        };
        assert_eq!(lesson.time, "12:00-13:30");
        assert_eq!(lesson.kind, "Лекция");
        assert_eq!(lesson.subject, "Физика");
        assert_eq!(lesson.group, "ИС-21");
        assert_eq!(lesson.additional_group, "ИС-22");
        assert_eq!(lesson.classroom, "2-205");
        assert_eq!(lesson.additional_classroom, "");
    }

    #[test]
    fn subject_drops_trailing_question_mark() {
        let html = r#"
            <div class="dateBlock">
              <div class="dateToday">Вторник, 05.03.2024</div>
              <div class="disciplina_cont">
                <div class="disciplina_time"><p>08:30</p><span class="end-time">10:00</span></div>
                <div class="disciplina_info"><p>Базы  данных ?</p></div>
              </div>
            </div>
        "#;
        let page = Html::parse_document(html);

        for kind in [SubjectKind::Group, SubjectKind::Teacher] {
            let days = extractor(kind).extract(&page);
            assert_eq!(days[0].lessons[0].subject(), "Базы данных");
        }
    }

    #[test]
    fn empty_schedule_marker_short_circuits() {
        let html = format!(
            r#"<div class="no-schedule">Занятий нет</div>{}"#,
            GROUP_PAGE
        );
        let days = extractor(SubjectKind::Group).extract(&Html::parse_document(&html));
        assert!(days.is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        let extractor = extractor(SubjectKind::Group);
        let page = Document::new("https://example.com/?v_gru=1", GROUP_PAGE);
        assert_eq!(extractor.extract_page(&page), extractor.extract_page(&page));
    }

    #[test]
    fn header_parsing() {
        let extractor = extractor(SubjectKind::Group);
        assert_eq!(
            extractor.parse_header("  Суббота, 09.03.2024 "),
            Some((Weekday::Saturday, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()))
        );
        assert_eq!(
            extractor.parse_header("ПОНЕДЕЛЬНИК,11.03.2024"),
            Some((Weekday::Monday, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()))
        );
        assert_eq!(extractor.parse_header("Monday, 11.03.2024"), None);
        assert_eq!(extractor.parse_header("Вторник, 5.03.2024"), None);
        assert_eq!(extractor.parse_header("Вторник, 31.02.2024"), None);
    }

    #[test]
    fn garbage_document_yields_nothing() {
        let days = extractor(SubjectKind::Teacher)
            .extract(&Html::parse_document("<html><body><p>503</p></body></html>"));
        assert!(days.is_empty());
    }
}
