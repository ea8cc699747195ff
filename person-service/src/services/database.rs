use crate::models::{NamePattern, NewPerson, Person, PersonId, PersonQuery, PersonUpdate};
use crate::services::store::{validate_batch, PersonStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Parses the URI and prepares a client. The driver connects lazily, so an
    /// unreachable server only surfaces on the first operation.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub fn people(&self) -> Collection<Person> {
        self.db.collection("people")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

fn query_filter(query: &PersonQuery) -> Document {
    let mut filter = Document::new();
    if let Some(food) = &query.favorite_food {
        // Matches any element of the array.
        filter.insert("favoriteFoods", food.as_str());
    }
    filter
}

#[async_trait]
impl PersonStore for MongoDb {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
        validate_batch(&people)?;
        let people: Vec<Person> = people.into_iter().map(Person::from_new).collect();

        // The driver refuses an empty batch.
        if people.is_empty() {
            return Ok(people);
        }

        self.people()
            .insert_many(&people, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert people: {}", e);
                AppError::from(e)
            })?;
        Ok(people)
    }

    async fn find(&self, query: &PersonQuery) -> Result<Vec<Person>, AppError> {
        let mut find_options = FindOptions::default();
        find_options.sort = Some(doc! { "name": 1 });
        find_options.limit = query.limit;
        if query.hide_age {
            find_options.projection = Some(doc! { "age": 0 });
        }

        let cursor = self
            .people()
            .find(query_filter(query), find_options)
            .await
            .map_err(AppError::from)?;

        cursor.try_collect().await.map_err(AppError::from)
    }

    async fn find_one_by_name(&self, pattern: &NamePattern) -> Result<Option<Person>, AppError> {
        self.people()
            .find_one(
                doc! { "name": { "$regex": pattern.to_regex_source() } },
                None,
            )
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, AppError> {
        self.people()
            .find_one(doc! { "_id": id.0 }, None)
            .await
            .map_err(AppError::from)
    }

    async fn update_by_name(
        &self,
        name: &str,
        update: &PersonUpdate,
    ) -> Result<Option<Person>, AppError> {
        // An empty `$set` is rejected by the server; nothing to write anyway.
        if update.is_empty() {
            return self
                .people()
                .find_one(doc! { "name": name }, None)
                .await
                .map_err(AppError::from);
        }

        let set = bson::to_document(update)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.people()
            .find_one_and_update(doc! { "name": name }, doc! { "$set": set }, options)
            .await
            .map_err(|e| {
                tracing::error!(name = %name, "Failed to update person: {}", e);
                AppError::from(e)
            })
    }

    async fn delete_by_id(&self, id: &PersonId) -> Result<bool, AppError> {
        let result = self
            .people()
            .delete_one(doc! { "_id": id.0 }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }
}
