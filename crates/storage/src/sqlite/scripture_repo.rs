use lectio_core::model::{Book, BookId, Chapter, Verse, VerseId, VerseRange};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{id_i64, map_book_row, map_chapter_row, ser, verse_id_from_i64};
use crate::repository::{ScriptureRepository, StorageError};

#[async_trait::async_trait]
impl ScriptureRepository for SqliteRepository {
    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, book_number, name
            FROM books
            ORDER BY book_number
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(map_book_row(&row)?);
        }
        Ok(books)
    }

    async fn list_chapters(&self, book_id: BookId) -> Result<Vec<Chapter>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, book_id, chapter_number, verse_count
            FROM chapters
            WHERE book_id = ?1
            ORDER BY chapter_number
            ",
        )
        .bind(id_i64("book_id", book_id.value())?)
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut chapters = Vec::with_capacity(rows.len());
        for row in rows {
            chapters.push(map_chapter_row(&row)?);
        }
        Ok(chapters)
    }

    async fn verse_ids_in_range(
        &self,
        book_id: BookId,
        chapter_number: u32,
        range: VerseRange,
    ) -> Result<Vec<VerseId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id
            FROM verses
            WHERE book_id = ?1
              AND chapter_number = ?2
              AND verse_number >= ?3
              AND verse_number <= ?4
            ORDER BY verse_number
            ",
        )
        .bind(id_i64("book_id", book_id.value())?)
        .bind(i64::from(chapter_number))
        .bind(i64::from(range.from()))
        .bind(i64::from(range.to()))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(verse_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?);
        }
        Ok(ids)
    }

    async fn count_verses(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM verses")
            .fetch_one(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }
}

/// Reference data is immutable to the application, so loading it lives on the
/// concrete repository rather than in the `ScriptureRepository` contract.
/// Used by the `seed` binary and integration tests.
impl SqliteRepository {
    /// Inserts a book row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the book number is taken.
    pub async fn insert_book(&self, book: &Book) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO books (id, book_number, name)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(book_number) DO NOTHING
            ",
        )
        .bind(id_i64("book_id", book.id().value())?)
        .bind(i64::from(book.book_number()))
        .bind(book.name().to_owned())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    /// Inserts a chapter row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the chapter already exists.
    pub async fn insert_chapter(&self, chapter: &Chapter) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO chapters (id, book_id, chapter_number, verse_count)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(book_id, chapter_number) DO NOTHING
            ",
        )
        .bind(id_i64("chapter_id", chapter.id().value())?)
        .bind(id_i64("book_id", chapter.book_id().value())?)
        .bind(i64::from(chapter.chapter_number()))
        .bind(i64::from(chapter.verse_count()))
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    /// Inserts a verse row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the verse already exists.
    pub async fn insert_verse(&self, verse: &Verse) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO verses (id, book_id, chapter_number, verse_number)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(book_id, chapter_number, verse_number) DO NOTHING
            ",
        )
        .bind(id_i64("verse_id", verse.id().value())?)
        .bind(id_i64("book_id", verse.book_id().value())?)
        .bind(i64::from(verse.chapter_number()))
        .bind(i64::from(verse.verse_number()))
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }
}
