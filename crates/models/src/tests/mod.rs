
/// Database-backed tests run only when a database is configured.
pub(crate) fn db_tests_enabled() -> bool {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return false;
    }
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db tests");
        return false;
    }
    true
}
