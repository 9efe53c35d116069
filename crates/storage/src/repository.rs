use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lectio_core::model::{
    Book, BookId, Chapter, DailyReading, ReadingPlan, UserId, Verse, VerseId, VerseRange,
};
use lectio_core::streak::DailyEntry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a reader account.
///
/// The password hash is a PHC-format string produced by the auth service;
/// storage treats it as opaque text.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new reader account.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUserRecord {
    #[must_use]
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            created_at,
        }
    }
}

/// Read access to the fixed book/chapter/verse hierarchy.
///
/// Reference data is immutable from the application's point of view, so this
/// contract is read-only; loading it is a deployment concern (see the `seed`
/// binary).
#[async_trait]
pub trait ScriptureRepository: Send + Sync {
    /// All books, ordered by book number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn list_books(&self) -> Result<Vec<Book>, StorageError>;

    /// Chapters of one book, ordered by chapter number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn list_chapters(&self, book_id: BookId) -> Result<Vec<Chapter>, StorageError>;

    /// Verse ids for an inclusive verse-number range within one chapter,
    /// ordered by verse number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn verse_ids_in_range(
        &self,
        book_id: BookId,
        chapter_number: u32,
        range: VerseRange,
    ) -> Result<Vec<VerseId>, StorageError>;

    /// Total number of verses in the canon.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn count_verses(&self) -> Result<u64, StorageError>;
}

/// Per-reader reading state: verse-level marks and per-day counts.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Marks verses as read, skipping pairs that already exist. Returns how
    /// many rows were actually inserted (duplicates are a no-op, not an
    /// error).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    async fn mark_verses_read(
        &self,
        user_id: UserId,
        verse_ids: &[VerseId],
    ) -> Result<u64, StorageError>;

    /// Lifetime count of distinct verses this reader has marked.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn count_verses_read(&self, user_id: UserId) -> Result<u64, StorageError>;

    /// Inserts or replaces the day's count (last write wins on the count
    /// and `updated_at`; the original insert's date key is the conflict key).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    async fn upsert_daily_reading(&self, reading: &DailyReading) -> Result<(), StorageError>;

    /// The day's record, or `None` when nothing was read that day. The
    /// absent row is an expected outcome, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn daily_reading(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyReading>, StorageError>;

    /// Up to `limit` most recent days with a positive count, ordered
    /// most-recent-date-first — the streak calculator's input.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn recent_daily_entries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<DailyEntry>, StorageError>;
}

/// Account storage for the authentication collaborator.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already
    /// registered, or other storage errors.
    async fn insert_user(&self, user: NewUserRecord) -> Result<(), StorageError>;

    /// Looks an account up by email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Looks an account up by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StorageError>;
}

/// Curated reading plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Active plans ordered by daily verse target, smallest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store cannot be read.
    async fn list_active_plans(&self) -> Result<Vec<ReadingPlan>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    books: Arc<Mutex<Vec<Book>>>,
    chapters: Arc<Mutex<Vec<Chapter>>>,
    verses: Arc<Mutex<Vec<Verse>>>,
    verse_readings: Arc<Mutex<HashSet<(UserId, VerseId)>>>,
    daily_readings: Arc<Mutex<HashMap<(UserId, NaiveDate), DailyReading>>>,
    users: Arc<Mutex<Vec<UserRecord>>>,
    plans: Arc<Mutex<Vec<ReadingPlan>>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a book into the fixture set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn seed_book(&self, book: Book) -> Result<(), StorageError> {
        self.books.lock().map_err(poisoned)?.push(book);
        Ok(())
    }

    /// Loads a chapter into the fixture set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn seed_chapter(&self, chapter: Chapter) -> Result<(), StorageError> {
        self.chapters.lock().map_err(poisoned)?.push(chapter);
        Ok(())
    }

    /// Loads a verse into the fixture set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn seed_verse(&self, verse: Verse) -> Result<(), StorageError> {
        self.verses.lock().map_err(poisoned)?.push(verse);
        Ok(())
    }

    /// Loads a reading plan into the fixture set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn seed_plan(&self, plan: ReadingPlan) -> Result<(), StorageError> {
        self.plans.lock().map_err(poisoned)?.push(plan);
        Ok(())
    }
}

#[async_trait]
impl ScriptureRepository for InMemoryRepository {
    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        let mut books = guard.clone();
        books.sort_by_key(Book::book_number);
        Ok(books)
    }

    async fn list_chapters(&self, book_id: BookId) -> Result<Vec<Chapter>, StorageError> {
        let guard = self.chapters.lock().map_err(poisoned)?;
        let mut chapters: Vec<Chapter> = guard
            .iter()
            .filter(|chapter| chapter.book_id() == book_id)
            .cloned()
            .collect();
        chapters.sort_by_key(Chapter::chapter_number);
        Ok(chapters)
    }

    async fn verse_ids_in_range(
        &self,
        book_id: BookId,
        chapter_number: u32,
        range: VerseRange,
    ) -> Result<Vec<VerseId>, StorageError> {
        let guard = self.verses.lock().map_err(poisoned)?;
        let mut matching: Vec<&Verse> = guard
            .iter()
            .filter(|verse| {
                verse.book_id() == book_id
                    && verse.chapter_number() == chapter_number
                    && verse.verse_number() >= range.from()
                    && verse.verse_number() <= range.to()
            })
            .collect();
        matching.sort_by_key(|verse| verse.verse_number());
        Ok(matching.into_iter().map(Verse::id).collect())
    }

    async fn count_verses(&self) -> Result<u64, StorageError> {
        let guard = self.verses.lock().map_err(poisoned)?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl ReadingRepository for InMemoryRepository {
    async fn mark_verses_read(
        &self,
        user_id: UserId,
        verse_ids: &[VerseId],
    ) -> Result<u64, StorageError> {
        let mut guard = self.verse_readings.lock().map_err(poisoned)?;
        let mut inserted = 0u64;
        for verse_id in verse_ids {
            if guard.insert((user_id, *verse_id)) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn count_verses_read(&self, user_id: UserId) -> Result<u64, StorageError> {
        let guard = self.verse_readings.lock().map_err(poisoned)?;
        Ok(guard.iter().filter(|(user, _)| *user == user_id).count() as u64)
    }

    async fn upsert_daily_reading(&self, reading: &DailyReading) -> Result<(), StorageError> {
        let mut guard = self.daily_readings.lock().map_err(poisoned)?;
        guard.insert((reading.user_id(), reading.date()), reading.clone());
        Ok(())
    }

    async fn daily_reading(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyReading>, StorageError> {
        let guard = self.daily_readings.lock().map_err(poisoned)?;
        Ok(guard.get(&(user_id, date)).cloned())
    }

    async fn recent_daily_entries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<DailyEntry>, StorageError> {
        let guard = self.daily_readings.lock().map_err(poisoned)?;
        let mut entries: Vec<DailyEntry> = guard
            .values()
            .filter(|reading| reading.user_id() == user_id && reading.verses_read() > 0)
            .map(|reading| DailyEntry::new(reading.date(), reading.verses_read()))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<(), StorageError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        if guard
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StorageError::Conflict);
        }
        guard.push(UserRecord {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        });
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StorageError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(guard.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl PlanRepository for InMemoryRepository {
    async fn list_active_plans(&self) -> Result<Vec<ReadingPlan>, StorageError> {
        let guard = self.plans.lock().map_err(poisoned)?;
        let mut plans: Vec<ReadingPlan> = guard
            .iter()
            .filter(|plan| plan.is_active())
            .cloned()
            .collect();
        plans.sort_by_key(ReadingPlan::daily_verse_target);
        Ok(plans)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub scripture: Arc<dyn ScriptureRepository>,
    pub readings: Arc<dyn ReadingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub plans: Arc<dyn PlanRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self::from_in_memory(repo)
    }

    /// Wraps an existing in-memory repository, keeping the caller's handle
    /// valid for seeding fixtures.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let scripture: Arc<dyn ScriptureRepository> = Arc::new(repo.clone());
        let readings: Arc<dyn ReadingRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let plans: Arc<dyn PlanRepository> = Arc::new(repo);
        Self {
            scripture,
            readings,
            users,
            plans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lectio_core::time::fixed_now;

    fn seed_chapter_of_verses(repo: &InMemoryRepository, verse_count: u32) {
        let book = Book::new(BookId::new(1), 1, "Génesis").unwrap();
        let chapter = Chapter::new(
            lectio_core::model::ChapterId::new(1),
            book.id(),
            1,
            verse_count,
        )
        .unwrap();
        repo.seed_book(book).unwrap();
        repo.seed_chapter(chapter).unwrap();
        for number in 1..=verse_count {
            let verse = Verse::new(
                VerseId::new(u64::from(number)),
                BookId::new(1),
                1,
                number,
            )
            .unwrap();
            repo.seed_verse(verse).unwrap();
        }
    }

    #[tokio::test]
    async fn marking_twice_inserts_once() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        let verses = [VerseId::new(1), VerseId::new(2)];

        let first = repo.mark_verses_read(user, &verses).await.unwrap();
        let second = repo.mark_verses_read(user, &verses).await.unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(repo.count_verses_read(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn range_lookup_is_inclusive_and_ordered() {
        let repo = InMemoryRepository::new();
        seed_chapter_of_verses(&repo, 10);

        let range = VerseRange::new(3, 7).unwrap();
        let ids = repo
            .verse_ids_in_range(BookId::new(1), 1, range)
            .await
            .unwrap();

        let expected: Vec<VerseId> = (3..=7).map(VerseId::new).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn recent_entries_come_back_newest_first() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        let today = fixed_now().date_naive();

        for offset in [2i64, 0, 1] {
            let reading =
                DailyReading::new(user, today - Duration::days(offset), 4, fixed_now()).unwrap();
            repo.upsert_daily_reading(&reading).await.unwrap();
        }

        let entries = repo.recent_daily_entries(user, 10).await.unwrap();
        let dates: Vec<_> = entries.iter().map(|entry| entry.date).collect();
        assert_eq!(
            dates,
            vec![today, today - Duration::days(1), today - Duration::days(2)]
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = InMemoryRepository::new();
        let first = NewUserRecord::new(UserId::generate(), "ana@example.com", "hash", fixed_now());
        let second =
            NewUserRecord::new(UserId::generate(), "Ana@example.com", "hash2", fixed_now());

        repo.insert_user(first).await.unwrap();
        let err = repo.insert_user(second).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }
}
