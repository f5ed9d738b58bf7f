//! City Storage

use crate::db::{Database, StoreError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

const ENTITY: &str = "city";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub city_id: i64,
    pub title: String,
    pub country: String,
}

/// Create/update body for a city
#[derive(Debug, Clone, Deserialize)]
pub struct CityDraft {
    pub title: String,
    pub country: String,
}

impl CityDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.country.trim().is_empty() {
            return Err("country must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct CityStore {
    db: Database,
}

impl CityStore {
    pub async fn new(db: Database) -> Result<Self, StoreError> {
        {
            let conn = db.lock().await;
            conn.execute(
                "CREATE TABLE IF NOT EXISTS cities (
                    city_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    country TEXT NOT NULL
                )",
                [],
            )?;
        }
        Ok(Self { db })
    }

    pub async fn list(&self) -> Result<Vec<City>, StoreError> {
        let conn = self.db.lock().await;
        let mut stmt =
            conn.prepare("SELECT city_id, title, country FROM cities ORDER BY city_id")?;
        let cities = stmt
            .query_map([], row_to_city)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cities)
    }

    pub async fn get(&self, city_id: i64) -> Result<City, StoreError> {
        let conn = self.db.lock().await;
        fetch(&conn, city_id)
    }

    pub async fn insert(&self, draft: &CityDraft) -> Result<City, StoreError> {
        let conn = self.db.lock().await;
        conn.execute(
            "INSERT INTO cities (title, country) VALUES (?1, ?2)",
            params![draft.title, draft.country],
        )?;
        let city = fetch(&conn, conn.last_insert_rowid())?;
        info!(city_id = city.city_id, title = %city.title, "Created city");
        Ok(city)
    }

    pub async fn update(&self, city_id: i64, draft: &CityDraft) -> Result<City, StoreError> {
        let conn = self.db.lock().await;
        let rows_affected = conn.execute(
            "UPDATE cities SET title = ?1, country = ?2 WHERE city_id = ?3",
            params![draft.title, draft.country, city_id],
        )?;
        if rows_affected == 0 {
            return Err(StoreError::not_found(ENTITY, city_id));
        }
        fetch(&conn, city_id)
    }

    pub async fn delete(&self, city_id: i64) -> Result<(), StoreError> {
        let conn = self.db.lock().await;
        let rows_affected =
            conn.execute("DELETE FROM cities WHERE city_id = ?1", params![city_id])?;
        if rows_affected == 0 {
            return Err(StoreError::not_found(ENTITY, city_id));
        }
        info!(city_id, "Deleted city");
        Ok(())
    }
}

fn fetch(conn: &Connection, city_id: i64) -> Result<City, StoreError> {
    conn.query_row(
        "SELECT city_id, title, country FROM cities WHERE city_id = ?1",
        params![city_id],
        row_to_city,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found(ENTITY, city_id))
}

fn row_to_city(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        city_id: row.get(0)?,
        title: row.get(1)?,
        country: row.get(2)?,
    })
}
