use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the Postgres pool. Connections are validated lazily, so a database
/// that is down at startup surfaces later as degraded reads, not as a boot failure.
pub fn create_pool(database_url: &str, max_size: u32) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(0))
        .test_on_check_out(true)
        .build_unchecked(manager);

    tracing::info!(max_size, "database connection pool created");
    pool
}
