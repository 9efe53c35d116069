use chrono::Duration;
use lectio_core::model::{Book, BookId, Chapter, ChapterId, UserId, Verse, VerseId};
use lectio_core::time::{Clock, fixed_now};
use services::{
    LibraryError, RecordError, SelectionDraft, TrackerServices, TrackerServicesError,
};
use storage::repository::InMemoryRepository;

/// Génesis with a single 31-verse chapter.
fn seed_reference(repo: &InMemoryRepository) {
    let book = Book::new(BookId::new(1), 1, "Génesis").unwrap();
    let chapter = Chapter::new(ChapterId::new(1), book.id(), 1, 31).unwrap();
    repo.seed_book(book).unwrap();
    repo.seed_chapter(chapter).unwrap();
    for number in 1..=31u32 {
        let verse = Verse::new(VerseId::new(u64::from(number)), BookId::new(1), 1, number).unwrap();
        repo.seed_verse(verse).unwrap();
    }
}

fn selection(from: u32, to: u32) -> services::Selection {
    SelectionDraft {
        book: Some(BookId::new(1)),
        chapter_number: Some(1),
        from_verse: from,
        to_verse: to,
    }
    .validate()
    .unwrap()
}

async fn signed_in_reader(services: &TrackerServices) -> UserId {
    let auth = services.auth();
    auth.sign_up("ana@example.com", "sola-scriptura").await.unwrap();
    let session = auth.sign_in("ana@example.com", "sola-scriptura").await.unwrap();
    session.user_id
}

#[tokio::test]
async fn recording_a_range_refreshes_progress() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);
    let services = TrackerServices::with_in_memory(repo, Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&services).await;

    let summary = services
        .record_selection(reader, &selection(10, 12))
        .await
        .unwrap();

    assert_eq!(summary.total_read, 3);
    assert_eq!(summary.today_read, 3);
    assert_eq!(summary.streak, 1);
    // 3 of 31 verses.
    assert!((summary.percent_complete - 9.677).abs() < 0.01);
}

#[tokio::test]
async fn same_day_resubmission_overwrites_todays_count() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);
    let services = TrackerServices::with_in_memory(repo, Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&services).await;

    services
        .record_selection(reader, &selection(10, 12))
        .await
        .unwrap();
    // Overlaps verse 12; only verse 13 is new to the lifetime total, but the
    // day's count becomes this batch's size.
    let summary = services
        .record_selection(reader, &selection(12, 13))
        .await
        .unwrap();

    assert_eq!(summary.total_read, 4);
    assert_eq!(summary.today_read, 2);
}

#[tokio::test]
async fn remarking_the_same_verses_never_double_counts() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);
    let services = TrackerServices::with_in_memory(repo, Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&services).await;

    let first = services
        .record_selection(reader, &selection(1, 5))
        .await
        .unwrap();
    let second = services
        .record_selection(reader, &selection(1, 5))
        .await
        .unwrap();

    assert_eq!(first.total_read, 5);
    assert_eq!(second.total_read, 5);
}

#[tokio::test]
async fn streak_builds_across_consecutive_days() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);

    // Same storage seen through clocks fixed on consecutive days.
    let day_one = TrackerServices::with_in_memory(repo.clone(), Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&day_one).await;
    day_one
        .record_selection(reader, &selection(1, 3))
        .await
        .unwrap();

    let day_two = TrackerServices::with_in_memory(
        repo.clone(),
        Clock::fixed(fixed_now() + Duration::days(1)),
    );
    let summary = day_two
        .record_selection(reader, &selection(4, 6))
        .await
        .unwrap();
    assert_eq!(summary.streak, 2);

    // Two skipped days: yesterday's anchor finds nothing, streak resets.
    let day_five = TrackerServices::with_in_memory(
        repo.clone(),
        Clock::fixed(fixed_now() + Duration::days(4)),
    );
    let stale = day_five.progress().summary(reader).await.unwrap();
    assert_eq!(stale.streak, 0);

    let revived = day_five
        .record_selection(reader, &selection(7, 7))
        .await
        .unwrap();
    assert_eq!(revived.streak, 1);
}

#[tokio::test]
async fn yesterdays_reading_keeps_the_streak_alive_today() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);

    let yesterday = TrackerServices::with_in_memory(repo.clone(), Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&yesterday).await;
    yesterday
        .record_selection(reader, &selection(1, 2))
        .await
        .unwrap();

    let today = TrackerServices::with_in_memory(
        repo.clone(),
        Clock::fixed(fixed_now() + Duration::days(1)),
    );
    let summary = today.progress().summary(reader).await.unwrap();
    assert_eq!(summary.streak, 1);
    assert_eq!(summary.today_read, 0);
}

#[tokio::test]
async fn empty_batch_is_rejected_before_any_write() {
    let services = TrackerServices::in_memory(Clock::fixed(fixed_now()));
    let reader = UserId::generate();

    let err = services.recorder().record(reader, &[]).await.unwrap_err();
    assert!(matches!(err, RecordError::EmptyBatch));

    let summary = services.progress().summary(reader).await.unwrap();
    assert_eq!(summary.total_read, 0);
    assert_eq!(summary.today_read, 0);
}

#[tokio::test]
async fn out_of_bounds_range_is_rejected_against_reference_data() {
    let repo = InMemoryRepository::new();
    seed_reference(&repo);
    let services = TrackerServices::with_in_memory(repo, Clock::fixed(fixed_now()));
    let reader = signed_in_reader(&services).await;

    let err = services
        .record_selection(reader, &selection(30, 40))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerServicesError::Library(LibraryError::RangeOutOfBounds {
            to: 40,
            verse_count: 31
        })
    ));

    let err = services
        .record_selection(reader, &selection_in_chapter(9))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerServicesError::Library(LibraryError::UnknownChapter {
            chapter_number: 9,
            ..
        })
    ));
}

fn selection_in_chapter(chapter_number: u32) -> services::Selection {
    SelectionDraft {
        book: Some(BookId::new(1)),
        chapter_number: Some(chapter_number),
        from_verse: 1,
        to_verse: 2,
    }
    .validate()
    .unwrap()
}

#[tokio::test]
async fn active_plans_are_listed_gentlest_first() {
    use lectio_core::model::{PlanId, ReadingPlan};

    let repo = InMemoryRepository::new();
    repo.seed_plan(ReadingPlan::new(PlanId::new(1), "90 días", None, 346, true).unwrap())
        .unwrap();
    repo.seed_plan(ReadingPlan::new(PlanId::new(2), "Un año", None, 85, true).unwrap())
        .unwrap();
    repo.seed_plan(ReadingPlan::new(PlanId::new(3), "Retirado", None, 10, false).unwrap())
        .unwrap();

    let services = TrackerServices::with_in_memory(repo, Clock::fixed(fixed_now()));
    let plans = services.plans().active_plans().await.unwrap();
    let targets: Vec<u32> = plans.iter().map(ReadingPlan::daily_verse_target).collect();
    assert_eq!(targets, vec![85, 346]);
}
