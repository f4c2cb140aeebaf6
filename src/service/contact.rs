//! Contact Service
//!
//! Persistence for per-user contact records. Every operation is scoped to an
//! owning user id: no query can return or mutate a contact owned by someone
//! else.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{contact::Contact, requests::ContactData};
use crate::utils::error::AppError;

/// Custom error types for the contact service
#[derive(Error, Debug)]
pub enum ContactServiceError {
    /// Attempted to store a contact with an email that already exists
    #[error("Contact with this email already exists")]
    EmailAlreadyExists,

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ContactServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("contacts_email_key") =>
            {
                ContactServiceError::EmailAlreadyExists
            }
            _ => ContactServiceError::Database(err),
        }
    }
}

impl From<ContactServiceError> for AppError {
    fn from(err: ContactServiceError) -> Self {
        match err {
            ContactServiceError::EmailAlreadyExists => {
                AppError::Conflict("Contact with this email already exists".to_string())
            }
            ContactServiceError::Database(e) => AppError::Database(e),
        }
    }
}

/// Result type for contact store operations
pub type ContactServiceResult<T> = Result<T, ContactServiceError>;

const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, phone_number, birth_date, \
                               additional_info, user_id, created_at, updated_at";

/// Contact store providing owner-scoped CRUD and queries
#[derive(Clone)]
pub struct ContactService {
    /// Database connection pool
    db_pool: PgPool,
}

impl ContactService {
    /// Creates a new ContactService backed by the provided connection pool
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Inserts a new contact owned by the given user
    pub async fn create(&self, data: &ContactData, owner: Uuid) -> ContactServiceResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "INSERT INTO contacts \
             (first_name, last_name, email, phone_number, birth_date, additional_info, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birth_date)
        .bind(&data.additional_info)
        .bind(owner)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(contact)
    }

    /// Lists all of the owner's contacts in insertion order
    pub async fn list(&self, owner: Uuid) -> ContactServiceResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(owner)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(contacts)
    }

    /// Fetches a single contact by id, if it belongs to the owner
    pub async fn get(&self, id: Uuid, owner: Uuid) -> ContactServiceResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(contact)
    }

    /// Replaces all mutable fields of an owned contact
    ///
    /// Returns `None` when the id does not exist or belongs to another user;
    /// the two cases are indistinguishable to the caller.
    pub async fn update(
        &self,
        id: Uuid,
        data: &ContactData,
        owner: Uuid,
    ) -> ContactServiceResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "UPDATE contacts SET first_name = $3, last_name = $4, email = $5, \
             phone_number = $6, birth_date = $7, additional_info = $8, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birth_date)
        .bind(&data.additional_info)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(contact)
    }

    /// Deletes an owned contact, returning the deleted row
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> ContactServiceResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(contact)
    }

    /// Case-insensitive substring search against first name, last name or
    /// email
    pub async fn search(&self, query: &str, owner: Uuid) -> ContactServiceResult<Vec<Contact>> {
        let pattern = format!("%{}%", escape_like(query));

        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 \
             AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2) \
             ORDER BY created_at"
        ))
        .bind(owner)
        .bind(pattern)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(contacts)
    }

    /// Contacts whose stored birth date falls within the next seven days
    /// inclusive
    ///
    /// Compares the raw stored date including its year, so a birth date from a
    /// past year will not match a future window. This mirrors the behavior the
    /// service has always had; see DESIGN.md before changing it.
    pub async fn upcoming_birthdays(&self, owner: Uuid) -> ContactServiceResult<Vec<Contact>> {
        let today = Utc::now().date_naive();
        let next_week = today + chrono::Duration::days(7);

        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 \
             AND birth_date >= $2 AND birth_date <= $3 ORDER BY birth_date"
        ))
        .bind(owner)
        .bind(today)
        .bind(next_week)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(contacts)
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::UserService;
    use chrono::NaiveDate;

    fn contact_data(first: &str, last: &str, email: &str) -> ContactData {
        ContactData {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone_number: "+380501234567".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            additional_info: None,
        }
    }

    async fn create_owner(pool: &sqlx::PgPool, email: &str) -> Uuid {
        UserService::new(pool.clone())
            .create(email, "password1")
            .await
            .unwrap()
            .id
    }

    #[sqlx::test]
    async fn test_create_and_get(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;

        let created = service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        assert_eq!(created.user_id, owner);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = service.get(created.id, owner).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.first_name, "John");
    }

    #[sqlx::test]
    async fn test_create_duplicate_email_is_conflict(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;

        service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        let result = service
            .create(&contact_data("Other", "Person", "john@x.com"), owner)
            .await;

        assert!(matches!(
            result,
            Err(ContactServiceError::EmailAlreadyExists)
        ));
    }

    #[sqlx::test]
    async fn test_owner_scoping(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;
        let other = create_owner(&pool, "other@x.com").await;

        let contact = service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        // A different owner sees nothing, even though the id exists
        assert!(service.get(contact.id, other).await.unwrap().is_none());
        assert!(service.list(other).await.unwrap().is_empty());
        assert!(service
            .update(contact.id, &contact_data("Jane", "Doe", "jane@x.com"), other)
            .await
            .unwrap()
            .is_none());
        assert!(service.delete(contact.id, other).await.unwrap().is_none());

        // The real owner still has it
        assert!(service.get(contact.id, owner).await.unwrap().is_some());
    }

    #[sqlx::test]
    async fn test_update_replaces_fields_and_bumps_timestamp(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;

        let contact = service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        let mut data = contact_data("Johnny", "Smithers", "johnny@x.com");
        data.additional_info = Some("met at the conference".to_string());

        let updated = service
            .update(contact.id, &data, owner)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.first_name, "Johnny");
        assert_eq!(updated.email, "johnny@x.com");
        assert_eq!(
            updated.additional_info.as_deref(),
            Some("met at the conference")
        );
        assert_eq!(updated.created_at, contact.created_at);
        assert!(updated.updated_at >= contact.updated_at);
    }

    #[sqlx::test]
    async fn test_delete_returns_row_then_none(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;

        let contact = service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        let deleted = service.delete(contact.id, owner).await.unwrap();
        assert_eq!(deleted.unwrap().id, contact.id);

        assert!(service.delete(contact.id, owner).await.unwrap().is_none());
        assert!(service.get(contact.id, owner).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_search_case_insensitive(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;

        service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();
        service
            .create(&contact_data("Anna", "Jones", "anna.smithson@x.com"), owner)
            .await
            .unwrap();
        service
            .create(&contact_data("Bob", "Brown", "bob@x.com"), owner)
            .await
            .unwrap();

        // Matches last name and email substrings regardless of case
        let hits = service.search("SMITH", owner).await.unwrap();
        assert_eq!(hits.len(), 2);

        let first_name_hits = service.search("joh", owner).await.unwrap();
        assert_eq!(first_name_hits.len(), 1);
        assert_eq!(first_name_hits[0].first_name, "John");

        // Non-substring queries return nothing
        assert!(service.search("xyzzy", owner).await.unwrap().is_empty());

        // Wildcards in the query are treated literally
        assert!(service.search("%", owner).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn test_search_scoped_to_owner(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;
        let other = create_owner(&pool, "other@x.com").await;

        service
            .create(&contact_data("John", "Smith", "john@x.com"), owner)
            .await
            .unwrap();

        assert!(service.search("smith", other).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn test_upcoming_birthdays_window(pool: sqlx::PgPool) {
        let service = ContactService::new(pool.clone());
        let owner = create_owner(&pool, "owner@x.com").await;
        let today = Utc::now().date_naive();

        let mut in_window = contact_data("In", "Window", "in@x.com");
        in_window.birth_date = today + chrono::Duration::days(3);
        service.create(&in_window, owner).await.unwrap();

        let mut boundary = contact_data("On", "Boundary", "boundary@x.com");
        boundary.birth_date = today + chrono::Duration::days(7);
        service.create(&boundary, owner).await.unwrap();

        let mut past = contact_data("Last", "Year", "past@x.com");
        past.birth_date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        service.create(&past, owner).await.unwrap();

        let mut too_far = contact_data("Too", "Far", "far@x.com");
        too_far.birth_date = today + chrono::Duration::days(8);
        service.create(&too_far, owner).await.unwrap();

        let upcoming = service.upcoming_birthdays(owner).await.unwrap();
        let emails: Vec<_> = upcoming.iter().map(|c| c.email.as_str()).collect();

        // Raw date comparison: a 1990 birth date never lands in the window
        assert_eq!(emails, vec!["in@x.com", "boundary@x.com"]);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
