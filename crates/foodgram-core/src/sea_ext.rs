use sea_orm::{DbErr, SqlErr};

/// Whether the database rejected a write because of a unique index or primary key.
///
/// Concurrent writers can pass an existence pre-check together; the loser surfaces here.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Whether a write referenced a row that no longer exists.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Escape character used by [`prefix_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching values that start with `prefix`, lowercased.
///
/// `%`, `_` and the escape character are escaped so user input matches literally.
/// Pair with `LikeExpr::new(..).escape(LIKE_ESCAPE)` against a `LOWER(..)` column.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
