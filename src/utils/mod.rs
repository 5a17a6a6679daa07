//! Utility functions and helpers.

pub mod fs;
pub mod html;
pub mod http;

use url::Url;

use crate::error::Result;
use crate::models::SubjectKind;

/// Build the schedule page URL for a group or teacher id.
pub fn schedule_url(base_url: &str, kind: SubjectKind, id: &str) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut().append_pair(kind.schedule_param(), id);
    Ok(url.to_string())
}

/// Collapse runs of whitespace and trim.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a subject or teacher/classroom/group entry, dropping the trailing `?` the
/// upstream renderer leaves behind.
pub fn clean_entry(raw: &str) -> String {
    let text = clean_text(raw);
    match text.strip_suffix('?') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_url() {
        assert_eq!(
            schedule_url("https://old.rsvpu.ru/mobile/", SubjectKind::Group, "4949").unwrap(),
            "https://old.rsvpu.ru/mobile/?v_gru=4949"
        );
        assert_eq!(
            schedule_url("https://old.rsvpu.ru/mobile/", SubjectKind::Teacher, "17").unwrap(),
            "https://old.rsvpu.ru/mobile/?v_prep=17"
        );
    }

    #[test]
    fn test_schedule_url_encodes_id() {
        let url = schedule_url("https://example.com/", SubjectKind::Group, "a&b").unwrap();
        assert_eq!(url, "https://example.com/?v_gru=a%26b");
    }

    #[test]
    fn test_schedule_url_rejects_bad_base() {
        assert!(schedule_url("not a url", SubjectKind::Group, "1").is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Иванов\n   И.И.  "), "Иванов И.И.");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_clean_entry_drops_trailing_question_mark() {
        assert_eq!(clean_entry(" Иванов И.И.? "), "Иванов И.И.");
        assert_eq!(clean_entry("Иванов И.И. ?"), "Иванов И.И.");
        assert_eq!(clean_entry("ауд. 101"), "ауд. 101");
        assert_eq!(clean_entry("?"), "");
    }
}
