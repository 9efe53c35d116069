use std::fmt;

use lectio_core::model::{
    Book, BookId, Chapter, ChapterId, PlanId, ReadingPlan, Verse, VerseId,
};
use storage::sqlite::SqliteRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("LECTIO_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LECTIO_DB_URL");
}

/// A development-sized slice of the canon: (book number, book name,
/// chapters as verse counts). Real counts from the Reina-Valera versification
/// so range selections behave like production data.
const SAMPLE_BOOKS: &[(u32, &str, &[u32])] = &[
    (1, "Génesis", &[31, 25, 24, 26, 32]),
    (19, "Salmos", &[6, 12, 8, 8, 12]),
    (43, "Juan", &[51, 25, 36, 54, 47]),
];

const SAMPLE_PLANS: &[(u64, &str, &str, u32)] = &[
    (1, "Nuevo Testamento en un año", "22 versículos al día", 22),
    (2, "Biblia en un año", "85 versículos al día", 85),
    (3, "Biblia en 90 días", "Lectura intensiva", 346),
];

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;

    let mut next_chapter_id = 1u64;
    let mut next_verse_id = 1u64;
    let mut verse_total = 0u64;

    for (index, (book_number, name, chapters)) in SAMPLE_BOOKS.iter().enumerate() {
        let book = Book::new(BookId::new(index as u64 + 1), *book_number, *name)?;
        match repo.insert_book(&book).await {
            Ok(()) => {}
            // Re-running seed against an existing database is fine.
            Err(storage::repository::StorageError::Conflict) => continue,
            Err(err) => return Err(err.into()),
        }

        for (chapter_index, verse_count) in chapters.iter().enumerate() {
            let chapter_number = chapter_index as u32 + 1;
            let chapter = Chapter::new(
                ChapterId::new(next_chapter_id),
                book.id(),
                chapter_number,
                *verse_count,
            )?;
            next_chapter_id += 1;
            repo.insert_chapter(&chapter).await?;

            for verse_number in 1..=*verse_count {
                let verse = Verse::new(
                    VerseId::new(next_verse_id),
                    book.id(),
                    chapter_number,
                    verse_number,
                )?;
                next_verse_id += 1;
                repo.insert_verse(&verse).await?;
                verse_total += 1;
            }
        }
    }

    for (id, name, description, target) in SAMPLE_PLANS {
        let plan = ReadingPlan::new(
            PlanId::new(*id),
            *name,
            Some((*description).to_string()),
            *target,
            true,
        )?;
        repo.insert_plan(&plan).await?;
    }

    info!(
        books = SAMPLE_BOOKS.len(),
        verses = verse_total,
        plans = SAMPLE_PLANS.len(),
        db_url = args.db_url.as_str(),
        "seeded reference data"
    );
    println!(
        "Seeded {} books ({verse_total} verses) and {} reading plans into {}",
        SAMPLE_BOOKS.len(),
        SAMPLE_PLANS.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
