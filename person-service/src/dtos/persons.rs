use crate::models::Person;
use serde::{Deserialize, Serialize};

/// Wire form of a person: the id is rendered as its hex string under `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(rename = "favoriteFoods")]
    pub favorite_foods: Vec<String>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.to_hex(),
            name: person.name,
            age: person.age,
            favorite_foods: person.favorite_foods,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddPersonResponse {
    pub status: bool,
    pub message: String,
    #[serde(rename = "insertedPeople")]
    pub inserted_people: Vec<PersonResponse>,
}

/// `{"status": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { status: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: bool,
    pub message: String,
}

/// Body of `GET /person`. A missing name matches everyone.
#[derive(Debug, Default, Deserialize)]
pub struct NameLookup {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePersonParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePersonParams {
    pub id: Option<String>,
}
