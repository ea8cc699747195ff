use crate::models::{NamePattern, NewPerson, Person, PersonId, PersonQuery, PersonUpdate};
use async_trait::async_trait;
use service_core::error::AppError;
use validator::Validate;

/// Persistence for the `people` collection. Each handler issues at most one
/// call against this trait.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    /// Assigns ids and stores every record, or none of them when any record
    /// fails validation.
    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError>;

    async fn find(&self, query: &PersonQuery) -> Result<Vec<Person>, AppError>;

    async fn find_one_by_name(&self, pattern: &NamePattern) -> Result<Option<Person>, AppError>;

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, AppError>;

    /// Overwrites the given fields on the first person named exactly `name`
    /// and returns the updated record.
    async fn update_by_name(
        &self,
        name: &str,
        update: &PersonUpdate,
    ) -> Result<Option<Person>, AppError>;

    /// Removes the person if present. Returns whether anything was removed.
    async fn delete_by_id(&self, id: &PersonId) -> Result<bool, AppError>;
}

/// Checks every record before any of them is written.
pub(crate) fn validate_batch(people: &[NewPerson]) -> Result<(), AppError> {
    for person in people {
        person.validate()?;
    }
    Ok(())
}
