/// Bumped whenever the table layout changes. A database carrying any other
/// non-zero version is dropped and recreated.
pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS passwords (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    email TEXT,
    password TEXT
);

CREATE INDEX IF NOT EXISTS idx_passwords_title ON passwords(title);
"#;

pub const DROP_SCHEMA: &str = r#"
DROP INDEX IF EXISTS idx_passwords_title;
DROP TABLE IF EXISTS passwords;
"#;
