//! Gateways over a SeaORM connection.

mod children;
mod exercise;
mod user;
mod user_exercise;

pub use children::{SeaOrmDeadlineRepository, SeaOrmHabitRepository, SeaOrmTodoRepository};
pub use exercise::SeaOrmExerciseRepository;
pub use user::SeaOrmUserRepository;
pub use user_exercise::SeaOrmUserExerciseRepository;
