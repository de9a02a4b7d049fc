// handlers/protected/mod.rs - Protected handlers (session required)
//
// Every route here sits behind `session_guard`; handlers take the owner from
// the resolved `AuthUser`, never from the request body.
pub mod attendance;
pub mod budget;
pub mod expense;
pub mod habit;
pub mod settings;

pub use attendance::{attendance_delete, attendance_get, attendance_post};
pub use budget::{budget_delete, budget_get, budget_post};
pub use expense::{expense_delete, expense_get, expense_post, expense_summary};
pub use habit::{habit_delete, habit_get, habit_post};
pub use settings::settings_get;
