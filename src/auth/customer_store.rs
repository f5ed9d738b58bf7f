//! Customer Storage
//! Mission: Persist customer accounts and act as the credential store

use crate::auth::guard::CredentialStore;
use crate::auth::models::{Customer, CustomerDraft};
use crate::db::{is_constraint_violation, Database, StoreError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const ENTITY: &str = "customer";

const SELECT_COLUMNS: &str =
    "SELECT customer_id, first_name, last_name, age, email, password_hash, is_admin FROM customers";

/// Customer storage with SQLite backend
#[derive(Clone)]
pub struct CustomerStore {
    db: Database,
}

impl CustomerStore {
    /// Create the store and its schema
    pub async fn new(db: Database) -> Result<Self, StoreError> {
        {
            let conn = db.lock().await;
            conn.execute(
                "CREATE TABLE IF NOT EXISTS customers (
                    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    age INTEGER NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    is_admin INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
        }
        Ok(Self { db })
    }

    /// Seed an admin account when the table has none. Returns whether one was created.
    pub async fn ensure_admin(&self, email: &str, password_hash: &str) -> Result<bool, StoreError> {
        let conn = self.db.lock().await;
        let admins: i64 = conn.query_row(
            "SELECT COUNT(*) FROM customers WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        if admins > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO customers (first_name, last_name, age, email, password_hash, is_admin)
             VALUES ('Admin', 'Admin', 0, ?1, ?2, 1)",
            params![email, password_hash],
        )
        .map_err(|e| map_unique(e, email))?;

        info!(email, "Bootstrap admin created");
        Ok(true)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let conn = self.db.lock().await;
        let customer = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE email = ?1"),
                params![email],
                row_to_customer,
            )
            .optional()?;
        Ok(customer)
    }

    pub async fn get(&self, customer_id: i64) -> Result<Customer, StoreError> {
        let conn = self.db.lock().await;
        fetch(&conn, customer_id)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY customer_id"))?;
        let customers = stmt
            .query_map([], row_to_customer)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    /// Insert a new customer; the password must already be hashed
    pub async fn insert(
        &self,
        draft: &CustomerDraft,
        password_hash: &str,
    ) -> Result<Customer, StoreError> {
        let conn = self.db.lock().await;
        conn.execute(
            "INSERT INTO customers (first_name, last_name, age, email, password_hash, is_admin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.first_name,
                draft.last_name,
                draft.age,
                draft.email,
                password_hash,
                draft.is_admin,
            ],
        )
        .map_err(|e| map_unique(e, &draft.email))?;

        let customer = fetch(&conn, conn.last_insert_rowid())?;
        info!(
            customer_id = customer.customer_id,
            email = %customer.email,
            is_admin = customer.is_admin,
            "Created customer"
        );
        Ok(customer)
    }

    /// Replace every field of an existing customer
    pub async fn update(
        &self,
        customer_id: i64,
        draft: &CustomerDraft,
        password_hash: &str,
    ) -> Result<Customer, StoreError> {
        let conn = self.db.lock().await;
        let rows_affected = conn
            .execute(
                "UPDATE customers
                 SET first_name = ?1, last_name = ?2, age = ?3, email = ?4,
                     password_hash = ?5, is_admin = ?6
                 WHERE customer_id = ?7",
                params![
                    draft.first_name,
                    draft.last_name,
                    draft.age,
                    draft.email,
                    password_hash,
                    draft.is_admin,
                    customer_id,
                ],
            )
            .map_err(|e| map_unique(e, &draft.email))?;

        if rows_affected == 0 {
            return Err(StoreError::not_found(ENTITY, customer_id));
        }

        info!(customer_id, "Updated customer");
        fetch(&conn, customer_id)
    }

    pub async fn delete(&self, customer_id: i64) -> Result<(), StoreError> {
        let conn = self.db.lock().await;
        let rows_affected = conn.execute(
            "DELETE FROM customers WHERE customer_id = ?1",
            params![customer_id],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::not_found(ENTITY, customer_id));
        }

        info!(customer_id, "Deleted customer");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for CustomerStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        CustomerStore::find_by_email(self, email).await
    }
}

fn fetch(conn: &Connection, customer_id: i64) -> Result<Customer, StoreError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE customer_id = ?1"),
        params![customer_id],
        row_to_customer,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found(ENTITY, customer_id))
}

fn row_to_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        customer_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        age: row.get(3)?,
        email: row.get(4)?,
        password_hash: row.get(5)?,
        is_admin: row.get(6)?,
    })
}

fn map_unique(err: rusqlite::Error, email: &str) -> StoreError {
    if is_constraint_violation(&err) {
        StoreError::AlreadyExists {
            entity: ENTITY,
            email: email.to_string(),
        }
    } else {
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    async fn create_test_store() -> CustomerStore {
        CustomerStore::new(Database::in_memory().unwrap()).await.unwrap()
    }

    fn draft(email: &str, is_admin: bool) -> CustomerDraft {
        CustomerDraft {
            first_name: "Anna".to_string(),
            last_name: "Smirnova".to_string(),
            age: 28,
            email: email.to_string(),
            password: "unused-here".to_string(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let store = create_test_store().await;

        let created = store.insert(&draft("anna@mail.ru", false), "hash").await.unwrap();
        assert_eq!(created.email, "anna@mail.ru");
        assert!(!created.is_admin);

        let found = store.find_by_email("anna@mail.ru").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.password_hash, "hash");

        assert!(store.find_by_email("nobody@mail.ru").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = create_test_store().await;
        store.insert(&draft("dup@mail.ru", false), "h").await.unwrap();

        let err = store.insert(&draft("dup@mail.ru", true), "h").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_changes_fields() {
        let store = create_test_store().await;
        let created = store.insert(&draft("u@mail.ru", false), "old").await.unwrap();

        let mut changed = draft("u2@mail.ru", true);
        changed.age = 41;
        let updated = store
            .update(created.customer_id, &changed, "new")
            .await
            .unwrap();

        assert_eq!(updated.customer_id, created.customer_id);
        assert_eq!(updated.email, "u2@mail.ru");
        assert_eq!(updated.age, 41);
        assert!(updated.is_admin);
        assert_eq!(updated.password_hash, "new");
        assert!(store.find_by_email("u@mail.ru").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = create_test_store().await;
        let err = store.update(404, &draft("x@mail.ru", false), "h").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 404, .. }));
    }

    #[tokio::test]
    async fn test_update_onto_taken_email_conflicts() {
        let store = create_test_store().await;
        store.insert(&draft("taken@mail.ru", false), "h").await.unwrap();
        let other = store.insert(&draft("other@mail.ru", false), "h").await.unwrap();

        let err = store
            .update(other.customer_id, &draft("taken@mail.ru", false), "h")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = create_test_store().await;
        let a = store.insert(&draft("a@mail.ru", false), "h").await.unwrap();
        store.insert(&draft("b@mail.ru", false), "h").await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);

        store.delete(a.customer_id).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(matches!(
            store.get(a.customer_id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            store.delete(a.customer_id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_only_when_missing() {
        let store = create_test_store().await;

        assert!(store.ensure_admin("root@mail.ru", "h").await.unwrap());
        assert!(!store.ensure_admin("root2@mail.ru", "h").await.unwrap());

        let admin = store.find_by_email("root@mail.ru").await.unwrap().unwrap();
        assert!(admin.is_admin);
        assert!(store.find_by_email("root2@mail.ru").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();

        {
            let store = CustomerStore::new(Database::open(path).unwrap()).await.unwrap();
            store.insert(&draft("keep@mail.ru", false), "h").await.unwrap();
        }

        let reopened = CustomerStore::new(Database::open(path).unwrap()).await.unwrap();
        assert!(reopened.find_by_email("keep@mail.ru").await.unwrap().is_some());
    }
}
