use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// A stored person. `id` is assigned once, by the store, at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(rename = "favoriteFoods", default)]
    pub favorite_foods: Vec<String>,
}

impl Person {
    pub fn from_new(new: NewPerson) -> Self {
        Self {
            id: ObjectId::new(),
            name: new.name,
            age: new.age,
            favorite_foods: new.favorite_foods.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, update: &PersonUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(foods) = &update.favorite_foods {
            self.favorite_foods = foods.clone();
        }
    }
}

/// Insert payload for one person.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPerson {
    #[validate(length(min = 1, message = "The field is required"))]
    pub name: String,
    pub age: Option<i32>,
    #[serde(rename = "favoriteFoods")]
    pub favorite_foods: Option<Vec<String>>,
}

/// Fields to overwrite on an existing person. Absent fields are left alone and
/// `favoriteFoods` replaces the stored list wholesale. Unknown fields are dropped.
///
/// `age: null` clears the age, `favoriteFoods: null` empties the list and
/// `name: null` is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonUpdate {
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Option<i32>>,
    #[serde(
        rename = "favoriteFoods",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub favorite_foods: Option<Vec<String>>,
}

/// A present key is `Some`, even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer)
        .map(|foods| Some(foods.unwrap_or_default()))
}

impl PersonUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.favorite_foods.is_none()
    }
}

/// Filter for multi-record reads. Results are always sorted by name ascending.
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
    pub favorite_food: Option<String>,
    pub limit: Option<i64>,
    pub hide_age: bool,
}

impl PersonQuery {
    pub fn matches(&self, person: &Person) -> bool {
        self.favorite_food
            .as_ref()
            .map_or(true, |food| person.favorite_foods.iter().any(|f| f == food))
    }
}

/// Parsed person identifier. A malformed id is a server-side failure, not a
/// client error, so parsing yields `AppError::InternalError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonId(pub ObjectId);

impl FromStr for PersonId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(PersonId).map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Cast to ObjectId failed for value \"{}\": {}",
                s,
                e
            ))
        })
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
