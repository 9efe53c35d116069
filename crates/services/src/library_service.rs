use std::sync::Arc;

use lectio_core::model::{Book, BookId, Chapter, VerseId, VerseRange};
use storage::repository::ScriptureRepository;

use crate::error::{LibraryError, SelectionError};

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// A reader's in-progress pick of book / chapter / verse range, with the
/// not-yet-chosen parts still open.
///
/// Validation happens here, before any storage call: a draft with no book or
/// chapter never reaches the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionDraft {
    pub book: Option<BookId>,
    pub chapter_number: Option<u32>,
    pub from_verse: u32,
    pub to_verse: u32,
}

impl SelectionDraft {
    /// Validates the draft into a complete selection.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoBook` / `NoChapter` for missing picks and
    /// a range error for a zero or inverted verse range.
    pub fn validate(self) -> Result<Selection, SelectionError> {
        let book = self.book.ok_or(SelectionError::NoBook)?;
        let chapter_number = self.chapter_number.ok_or(SelectionError::NoChapter)?;
        let range = VerseRange::new(self.from_verse, self.to_verse)?;
        Ok(Selection {
            book,
            chapter_number,
            range,
        })
    }
}

/// A complete, structurally valid selection. Whether the range fits the
/// chapter is checked against reference data by `LibraryService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub book: BookId,
    pub chapter_number: u32,
    pub range: VerseRange,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Read-only access to the scripture hierarchy for browsing and for turning
/// a selection into the verse ids the recorder needs.
pub struct LibraryService {
    scripture: Arc<dyn ScriptureRepository>,
}

impl LibraryService {
    #[must_use]
    pub fn new(scripture: Arc<dyn ScriptureRepository>) -> Self {
        Self { scripture }
    }

    /// All books in canon order.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` when the store cannot be read.
    pub async fn books(&self) -> Result<Vec<Book>, LibraryError> {
        Ok(self.scripture.list_books().await?)
    }

    /// Chapters of one book in order.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` when the store cannot be read.
    pub async fn chapters(&self, book: BookId) -> Result<Vec<Chapter>, LibraryError> {
        Ok(self.scripture.list_chapters(book).await?)
    }

    /// Resolves a selection to verse ids, ordered by verse number with both
    /// endpoints included.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownChapter` when the book has no such
    /// chapter and `LibraryError::RangeOutOfBounds` when the range reaches
    /// past the chapter's verse count.
    pub async fn resolve_selection(
        &self,
        selection: &Selection,
    ) -> Result<Vec<VerseId>, LibraryError> {
        let chapters = self.scripture.list_chapters(selection.book).await?;
        let chapter = chapters
            .iter()
            .find(|chapter| chapter.chapter_number() == selection.chapter_number)
            .ok_or(LibraryError::UnknownChapter {
                book: selection.book.value(),
                chapter_number: selection.chapter_number,
            })?;

        if !selection.range.fits_within(chapter.verse_count()) {
            return Err(LibraryError::RangeOutOfBounds {
                to: selection.range.to(),
                verse_count: chapter.verse_count(),
            });
        }

        Ok(self
            .scripture
            .verse_ids_in_range(selection.book, selection.chapter_number, selection.range)
            .await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_without_book_is_rejected() {
        let draft = SelectionDraft {
            book: None,
            chapter_number: Some(3),
            from_verse: 1,
            to_verse: 4,
        };
        assert!(matches!(draft.validate(), Err(SelectionError::NoBook)));
    }

    #[test]
    fn draft_without_chapter_is_rejected() {
        let draft = SelectionDraft {
            book: Some(BookId::new(1)),
            chapter_number: None,
            from_verse: 1,
            to_verse: 4,
        };
        assert!(matches!(draft.validate(), Err(SelectionError::NoChapter)));
    }

    #[test]
    fn draft_with_inverted_range_is_rejected() {
        let draft = SelectionDraft {
            book: Some(BookId::new(1)),
            chapter_number: Some(1),
            from_verse: 7,
            to_verse: 3,
        };
        assert!(matches!(draft.validate(), Err(SelectionError::Range(_))));
    }

    #[test]
    fn complete_draft_validates() {
        let draft = SelectionDraft {
            book: Some(BookId::new(1)),
            chapter_number: Some(1),
            from_verse: 3,
            to_verse: 7,
        };
        let selection = draft.validate().unwrap();
        assert_eq!(selection.range.len(), 5);
    }
}
