pub mod persons;

pub use persons::{
    AddPersonResponse, DataResponse, DeletePersonParams, MessageResponse, NameLookup,
    PersonResponse, UpdatePersonParams,
};
