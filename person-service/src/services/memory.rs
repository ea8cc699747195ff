use crate::models::{NamePattern, NewPerson, Person, PersonId, PersonQuery, PersonUpdate};
use crate::services::store::{validate_batch, PersonStore};
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::{Mutex, MutexGuard};

/// Process-local store kept in insertion order. Backs `STORE_BACKEND=memory`
/// and the router tests.
#[derive(Default)]
pub struct InMemoryPersonStore {
    people: Mutex<Vec<Person>>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Person>>, AppError> {
        self.people.lock().map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Person store mutex poisoned: {}", e))
        })
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
        validate_batch(&people)?;
        let inserted: Vec<Person> = people.into_iter().map(Person::from_new).collect();
        self.lock()?.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn find(&self, query: &PersonQuery) -> Result<Vec<Person>, AppError> {
        let mut found: Vec<Person> = self
            .lock()?
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        found.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            found.truncate(limit as usize);
        }
        if query.hide_age {
            for person in &mut found {
                person.age = None;
            }
        }
        Ok(found)
    }

    async fn find_one_by_name(&self, pattern: &NamePattern) -> Result<Option<Person>, AppError> {
        Ok(self
            .lock()?
            .iter()
            .find(|p| pattern.is_match(&p.name))
            .cloned())
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, AppError> {
        Ok(self.lock()?.iter().find(|p| p.id == id.0).cloned())
    }

    async fn update_by_name(
        &self,
        name: &str,
        update: &PersonUpdate,
    ) -> Result<Option<Person>, AppError> {
        let mut people = self.lock()?;
        Ok(people.iter_mut().find(|p| p.name == name).map(|person| {
            person.apply(update);
            person.clone()
        }))
    }

    async fn delete_by_id(&self, id: &PersonId) -> Result<bool, AppError> {
        let mut people = self.lock()?;
        let before = people.len();
        people.retain(|p| p.id != id.0);
        Ok(people.len() != before)
    }
}
