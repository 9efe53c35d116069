use chrono::Duration;
use lectio_core::model::{
    Book, BookId, Chapter, ChapterId, DailyReading, PlanId, ReadingPlan, UserId, Verse, VerseId,
    VerseRange,
};
use lectio_core::time::fixed_now;
use storage::repository::{
    NewUserRecord, PlanRepository, ReadingRepository, ScriptureRepository, StorageError,
    UserRepository,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

async fn seed_genesis_one(repo: &SqliteRepository, verse_count: u32) {
    let book = Book::new(BookId::new(1), 1, "Génesis").unwrap();
    repo.insert_book(&book).await.unwrap();

    let chapter = Chapter::new(ChapterId::new(1), book.id(), 1, verse_count).unwrap();
    repo.insert_chapter(&chapter).await.unwrap();

    for number in 1..=verse_count {
        let verse = Verse::new(VerseId::new(u64::from(number)), book.id(), 1, number).unwrap();
        repo.insert_verse(&verse).await.unwrap();
    }
}

async fn seed_user(repo: &SqliteRepository, email: &str) -> UserId {
    let id = UserId::generate();
    repo.insert_user(NewUserRecord::new(id, email, "phc-hash", fixed_now()))
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn reference_data_roundtrip_and_range_lookup() {
    let repo = connect("memdb_reference").await;
    seed_genesis_one(&repo, 31).await;

    let books = repo.list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].name(), "Génesis");

    let chapters = repo.list_chapters(books[0].id()).await.unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].verse_count(), 31);

    let range = VerseRange::new(3, 7).unwrap();
    let ids = repo
        .verse_ids_in_range(books[0].id(), 1, range)
        .await
        .unwrap();
    let expected: Vec<VerseId> = (3..=7).map(VerseId::new).collect();
    assert_eq!(ids, expected);

    assert_eq!(repo.count_verses().await.unwrap(), 31);
}

#[tokio::test]
async fn books_come_back_in_canon_order() {
    let repo = connect("memdb_book_order").await;

    // Inserted out of order on purpose.
    repo.insert_book(&Book::new(BookId::new(2), 43, "Juan").unwrap())
        .await
        .unwrap();
    repo.insert_book(&Book::new(BookId::new(1), 1, "Génesis").unwrap())
        .await
        .unwrap();

    let books = repo.list_books().await.unwrap();
    let numbers: Vec<u32> = books.iter().map(Book::book_number).collect();
    assert_eq!(numbers, vec![1, 43]);
}

#[tokio::test]
async fn marking_a_verse_twice_is_idempotent() {
    let repo = connect("memdb_idempotent").await;
    seed_genesis_one(&repo, 5).await;
    let user = seed_user(&repo, "ana@example.com").await;

    let verses = [VerseId::new(1), VerseId::new(2), VerseId::new(3)];
    assert_eq!(repo.mark_verses_read(user, &verses).await.unwrap(), 3);
    assert_eq!(repo.mark_verses_read(user, &verses).await.unwrap(), 0);

    // Overlapping batch only inserts the genuinely new verse.
    let overlapping = [VerseId::new(3), VerseId::new(4)];
    assert_eq!(repo.mark_verses_read(user, &overlapping).await.unwrap(), 1);

    assert_eq!(repo.count_verses_read(user).await.unwrap(), 4);
}

#[tokio::test]
async fn daily_reading_upsert_overwrites_the_count() {
    let repo = connect("memdb_daily_upsert").await;
    let user = seed_user(&repo, "ana@example.com").await;
    let today = fixed_now().date_naive();

    let morning = DailyReading::new(user, today, 5, fixed_now()).unwrap();
    repo.upsert_daily_reading(&morning).await.unwrap();

    let evening =
        DailyReading::new(user, today, 3, fixed_now() + Duration::hours(8)).unwrap();
    repo.upsert_daily_reading(&evening).await.unwrap();

    let stored = repo.daily_reading(user, today).await.unwrap().unwrap();
    assert_eq!(stored.verses_read(), 3);
    assert_eq!(stored.updated_at(), fixed_now() + Duration::hours(8));
}

#[tokio::test]
async fn absent_daily_row_reads_as_none() {
    let repo = connect("memdb_daily_absent").await;
    let user = seed_user(&repo, "ana@example.com").await;

    let today = fixed_now().date_naive();
    assert!(repo.daily_reading(user, today).await.unwrap().is_none());
}

#[tokio::test]
async fn recent_entries_are_newest_first_and_limited() {
    let repo = connect("memdb_recent").await;
    let user = seed_user(&repo, "ana@example.com").await;
    let today = fixed_now().date_naive();

    for offset in 0..5i64 {
        let reading =
            DailyReading::new(user, today - Duration::days(offset), 2, fixed_now()).unwrap();
        repo.upsert_daily_reading(&reading).await.unwrap();
    }

    let entries = repo.recent_daily_entries(user, 3).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].date, today);
    assert_eq!(entries[2].date, today - Duration::days(2));
}

#[tokio::test]
async fn duplicate_email_insert_is_a_conflict() {
    let repo = connect("memdb_dup_email").await;
    seed_user(&repo, "ana@example.com").await;

    let err = repo
        .insert_user(NewUserRecord::new(
            UserId::generate(),
            "ANA@example.com",
            "other-hash",
            fixed_now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn user_lookup_by_email_and_id() {
    let repo = connect("memdb_user_lookup").await;
    let id = seed_user(&repo, "ana@example.com").await;

    let by_email = repo
        .find_user_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, id);

    let by_id = repo.get_user(id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ana@example.com");

    assert!(
        repo.find_user_by_email("nadie@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn active_plans_ordered_by_daily_target() {
    let repo = connect("memdb_plans").await;

    let fast = ReadingPlan::new(PlanId::new(1), "90 días", None, 346, true).unwrap();
    let slow = ReadingPlan::new(PlanId::new(2), "Un año", None, 85, true).unwrap();
    let retired = ReadingPlan::new(PlanId::new(3), "Antiguo", None, 10, false).unwrap();
    repo.insert_plan(&fast).await.unwrap();
    repo.insert_plan(&slow).await.unwrap();
    repo.insert_plan(&retired).await.unwrap();

    let plans = repo.list_active_plans().await.unwrap();
    let targets: Vec<u32> = plans.iter().map(ReadingPlan::daily_verse_target).collect();
    assert_eq!(targets, vec![85, 346]);
}
