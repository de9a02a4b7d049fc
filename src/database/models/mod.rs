pub mod attendance;
pub mod budget;
pub mod expense;
pub mod habit;
pub mod user;

pub use attendance::{Attendance, AttendanceView, NewAttendance};
pub use budget::{Budget, BudgetView, NewBudget};
pub use expense::{Expense, ExpenseSummary, NewExpense};
pub use habit::{Habit, HabitTracker, HabitView, NewHabit};
pub use user::UserProfile;
