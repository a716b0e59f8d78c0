//! Post-import cleanup removing empty pages, chapters, and works.

use crate::types::{Chapter, Page, Work};

/// Drop empty text pages, then chapters without pages, then works without
/// chapters. Applied after every import path; idempotent.
pub fn sanitize_works(works: Vec<Work>) -> Vec<Work> {
    works.into_iter().filter_map(sanitize_work).collect()
}

fn sanitize_work(work: Work) -> Option<Work> {
    let chapters: Vec<Chapter> =
        work.chapters.into_iter().filter_map(sanitize_chapter).collect();
    if chapters.is_empty() {
        return None;
    }
    Some(Work { chapters, ..work })
}

fn sanitize_chapter(chapter: Chapter) -> Option<Chapter> {
    let pages: Vec<Page> =
        chapter.pages.into_iter().filter(|page| !page.as_text().is_empty()).collect();
    if pages.is_empty() {
        return None;
    }
    Some(Chapter { pages, ..chapter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn work(chapters: Vec<Chapter>) -> Work {
        Work {
            id: Uuid::new_v4(),
            title: "w".to_string(),
            author: "a".to_string(),
            chapters,
        }
    }

    fn chapter(pages: &[&str]) -> Chapter {
        Chapter {
            id: Uuid::new_v4(),
            title: "ch".to_string(),
            pages: pages.iter().map(|text| Page::text(*text)).collect(),
        }
    }

    #[test]
    fn removes_empty_pages_chapters_and_works() {
        let input = vec![
            work(vec![chapter(&["keep", ""]), chapter(&["", ""])]),
            work(vec![chapter(&[""])]),
        ];

        let cleaned = sanitize_works(input);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].chapters.len(), 1);
        assert_eq!(cleaned[0].chapters[0].pages, vec![Page::text("keep")]);
    }

    #[test]
    fn is_idempotent() {
        let input = vec![
            work(vec![chapter(&["a", ""]), chapter(&[])]),
            work(vec![chapter(&["b"])]),
        ];

        let once = sanitize_works(input);
        let twice = sanitize_works(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn keeps_already_clean_input_unchanged() {
        let input = vec![work(vec![chapter(&["a"])])];
        let cleaned = sanitize_works(input.clone());
        assert_eq!(cleaned, input);
    }
}
