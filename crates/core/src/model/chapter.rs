use thiserror::Error;

use crate::model::ids::{BookId, ChapterId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter number must be >= 1")]
    InvalidNumber,

    #[error("chapter must contain at least one verse")]
    NoVerses,
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// One chapter of a book, carrying its fixed verse count.
///
/// The verse count is what bounds a reader's range selection; it is part of
/// the reference data and never derived at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    book_id: BookId,
    chapter_number: u32,
    verse_count: u32,
}

impl Chapter {
    /// Creates a chapter entry.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::InvalidNumber` for a zero chapter number and
    /// `ChapterError::NoVerses` for a zero verse count.
    pub fn new(
        id: ChapterId,
        book_id: BookId,
        chapter_number: u32,
        verse_count: u32,
    ) -> Result<Self, ChapterError> {
        if chapter_number == 0 {
            return Err(ChapterError::InvalidNumber);
        }
        if verse_count == 0 {
            return Err(ChapterError::NoVerses);
        }
        Ok(Self {
            id,
            book_id,
            chapter_number,
            verse_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    #[must_use]
    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    #[must_use]
    pub fn verse_count(&self) -> u32 {
        self.verse_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_valid_chapter() {
        let chapter = Chapter::new(ChapterId::new(10), BookId::new(1), 3, 24).unwrap();
        assert_eq!(chapter.chapter_number(), 3);
        assert_eq!(chapter.verse_count(), 24);
    }

    #[test]
    fn rejects_zero_chapter_number() {
        let err = Chapter::new(ChapterId::new(10), BookId::new(1), 0, 24).unwrap_err();
        assert_eq!(err, ChapterError::InvalidNumber);
    }

    #[test]
    fn rejects_empty_chapter() {
        let err = Chapter::new(ChapterId::new(10), BookId::new(1), 3, 0).unwrap_err();
        assert_eq!(err, ChapterError::NoVerses);
    }
}
