pub mod health;
pub mod persons;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use persons::{
    add_person, delete_person, get_person_by_id, get_person_by_name, list_burrito_lovers,
    update_person,
};
