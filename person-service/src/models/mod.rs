pub mod name_pattern;
pub mod person;

pub use name_pattern::NamePattern;
pub use person::{NewPerson, Person, PersonId, PersonQuery, PersonUpdate};
