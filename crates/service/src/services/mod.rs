//! Domain services: identifier validation, existence checks, uniqueness and
//! authentication on top of the persistence gateways.

pub mod crud;
pub mod user;
pub mod user_exercise;

pub use crud::CrudService;
pub use user::UserService;
pub use user_exercise::UserExerciseService;
