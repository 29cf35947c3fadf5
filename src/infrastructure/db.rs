use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Schema, one statement per table. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    // Person family
    r#"
    CREATE TABLE IF NOT EXISTS composers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT NOT NULL,
        instrument TEXT NOT NULL DEFAULT '',
        birth_year INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS arrangers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT NOT NULL,
        instrument TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS conductors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT NOT NULL,
        instrument TEXT NOT NULL DEFAULT '',
        honorific TEXT NOT NULL DEFAULT '',
        middle_initial TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS guests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT,
        last_name TEXT NOT NULL,
        instrument TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    // Organization family
    r#"
    CREATE TABLE IF NOT EXISTS rental_organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact_name TEXT NOT NULL DEFAULT '',
        contact_email TEXT NOT NULL DEFAULT '',
        contact_phone TEXT NOT NULL DEFAULT '',
        website TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS loaning_organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact_name TEXT NOT NULL DEFAULT '',
        contact_email TEXT NOT NULL DEFAULT '',
        contact_phone TEXT NOT NULL DEFAULT '',
        website TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS borrowing_organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact_name TEXT NOT NULL DEFAULT '',
        contact_email TEXT NOT NULL DEFAULT '',
        contact_phone TEXT NOT NULL DEFAULT '',
        website TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT ''
    )
    "#,
    // Catalog
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS publishers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        website TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pieces (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        publisher_id INTEGER REFERENCES publishers(id) ON DELETE SET NULL,
        difficulty TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'OWNED',
        location_drawer TEXT NOT NULL DEFAULT '',
        location_number TEXT NOT NULL DEFAULT '',
        copyright_date TEXT,
        purchase_date TEXT,
        notes TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS piece_composers (
        piece_id INTEGER NOT NULL REFERENCES pieces(id) ON DELETE CASCADE,
        composer_id INTEGER NOT NULL REFERENCES composers(id) ON DELETE CASCADE,
        PRIMARY KEY (piece_id, composer_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS piece_arrangers (
        piece_id INTEGER NOT NULL REFERENCES pieces(id) ON DELETE CASCADE,
        arranger_id INTEGER NOT NULL REFERENCES arrangers(id) ON DELETE CASCADE,
        PRIMARY KEY (piece_id, arranger_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS piece_genres (
        piece_id INTEGER NOT NULL REFERENCES pieces(id) ON DELETE CASCADE,
        genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
        PRIMARY KEY (piece_id, genre_id)
    )
    "#,
    // Polymorphic: organization_id points into the table named by organization_kind
    r#"
    CREATE TABLE IF NOT EXISTS piece_organization_relationships (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        piece_id INTEGER NOT NULL UNIQUE REFERENCES pieces(id) ON DELETE CASCADE,
        relationship_type TEXT NOT NULL,
        organization_kind TEXT NOT NULL,
        organization_id INTEGER NOT NULL,
        start_date TEXT,
        end_date TEXT,
        rental_cost_cents INTEGER,
        CHECK (
            (relationship_type = 'RENTED' AND organization_kind = 'rental')
            OR (relationship_type = 'ON_LOAN' AND organization_kind = 'loaning')
            OR (relationship_type = 'BORROWED' AND organization_kind = 'borrowing')
        ),
        CHECK (rental_cost_cents IS NULL OR relationship_type = 'RENTED')
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_relationships_organization
        ON piece_organization_relationships (organization_kind, organization_id)
    "#,
    // Concerts
    r#"
    CREATE TABLE IF NOT EXISTS venues (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        contact_name TEXT NOT NULL DEFAULT '',
        address TEXT NOT NULL DEFAULT '',
        city TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT '',
        zip_code TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL DEFAULT '',
        website TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS concerts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
        description TEXT NOT NULL DEFAULT '',
        poster TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS concert_conductors (
        concert_id INTEGER NOT NULL REFERENCES concerts(id) ON DELETE CASCADE,
        conductor_id INTEGER NOT NULL REFERENCES conductors(id) ON DELETE CASCADE,
        PRIMARY KEY (concert_id, conductor_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS concert_guests (
        concert_id INTEGER NOT NULL REFERENCES concerts(id) ON DELETE CASCADE,
        guest_id INTEGER NOT NULL REFERENCES guests(id) ON DELETE CASCADE,
        PRIMARY KEY (concert_id, guest_id)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    if database_url.contains(":memory:") {
        // Each pooled connection would otherwise get its own empty database
        options.max_connections(1);
    }
    let db = Database::connect(options).await?;

    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for sql in SCHEMA {
        db.execute(Statement::from_string(backend, sql.to_string()))
            .await?;
    }
    tracing::debug!("Schema ready ({} statements)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = init_db("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
    }

    #[tokio::test]
    async fn relationship_kind_is_checked_by_schema() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            "INSERT INTO pieces (title, created_at, updated_at) VALUES ('T', 'now', 'now')"
                .to_owned(),
        ))
        .await
        .unwrap();
        let mismatched = db
            .execute(Statement::from_string(
                backend,
                "INSERT INTO piece_organization_relationships \
                 (piece_id, relationship_type, organization_kind, organization_id) \
                 VALUES (1, 'RENTED', 'borrowing', 1)"
                    .to_owned(),
            ))
            .await;
        assert!(mismatched.is_err());
    }
}
