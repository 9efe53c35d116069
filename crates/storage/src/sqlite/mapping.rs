use lectio_core::model::{
    Book, BookId, Chapter, ChapterId, DailyReading, PlanId, ReadingPlan, UserId, VerseId,
};
use sqlx::Row;

use crate::repository::{StorageError, UserRecord};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn book_id_from_i64(v: i64) -> Result<BookId, StorageError> {
    Ok(BookId::new(i64_to_u64("book_id", v)?))
}

pub(crate) fn chapter_id_from_i64(v: i64) -> Result<ChapterId, StorageError> {
    Ok(ChapterId::new(i64_to_u64("chapter_id", v)?))
}

pub(crate) fn verse_id_from_i64(v: i64) -> Result<VerseId, StorageError> {
    Ok(VerseId::new(i64_to_u64("verse_id", v)?))
}

pub(crate) fn plan_id_from_i64(v: i64) -> Result<PlanId, StorageError> {
    Ok(PlanId::new(i64_to_u64("plan_id", v)?))
}

/// User ids are stored as hyphenated UUID text.
pub(crate) fn user_id_from_text(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

pub(crate) fn map_book_row(row: &sqlx::sqlite::SqliteRow) -> Result<Book, StorageError> {
    let id = book_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let book_number = i64_to_u32(
        "book_number",
        row.try_get::<i64, _>("book_number").map_err(ser)?,
    )?;
    let name: String = row.try_get("name").map_err(ser)?;
    Book::new(id, book_number, name).map_err(ser)
}

pub(crate) fn map_chapter_row(row: &sqlx::sqlite::SqliteRow) -> Result<Chapter, StorageError> {
    let id = chapter_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let book_id = book_id_from_i64(row.try_get::<i64, _>("book_id").map_err(ser)?)?;
    let chapter_number = i64_to_u32(
        "chapter_number",
        row.try_get::<i64, _>("chapter_number").map_err(ser)?,
    )?;
    let verse_count = i64_to_u32(
        "verse_count",
        row.try_get::<i64, _>("verse_count").map_err(ser)?,
    )?;
    Chapter::new(id, book_id, chapter_number, verse_count).map_err(ser)
}

pub(crate) fn map_daily_reading_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<DailyReading, StorageError> {
    let user_id = user_id_from_text(row.try_get::<String, _>("user_id").map_err(ser)?.as_str())?;
    let date = row.try_get("reading_date").map_err(ser)?;
    let verses_read = i64_to_u32(
        "verses_read_count",
        row.try_get::<i64, _>("verses_read_count").map_err(ser)?,
    )?;
    let updated_at = row.try_get("updated_at").map_err(ser)?;
    DailyReading::new(user_id, date, verses_read, updated_at).map_err(ser)
}

pub(crate) fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord, StorageError> {
    Ok(UserRecord {
        id: user_id_from_text(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        email: row.try_get("email").map_err(ser)?,
        password_hash: row.try_get("password_hash").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_plan_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReadingPlan, StorageError> {
    let id = plan_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let name: String = row.try_get("name").map_err(ser)?;
    let description: Option<String> = row.try_get("description").map_err(ser)?;
    let daily_verse_target = i64_to_u32(
        "daily_verse_target",
        row.try_get::<i64, _>("daily_verse_target").map_err(ser)?,
    )?;
    let is_active: i64 = row.try_get("is_active").map_err(ser)?;
    ReadingPlan::new(id, name, description, daily_verse_target, is_active != 0).map_err(ser)
}
