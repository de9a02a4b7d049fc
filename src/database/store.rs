//! Owner-scoped repositories, one trait per domain.
//!
//! Every method takes the resolved [`OwnerId`] and conjoins it with the record
//! id in its predicate; a record of another owner is indistinguishable from a
//! missing one and yields [`DatabaseError::NotFound`].
//!
//! Counter changes are applied inside a single store-level unit (row lock or
//! write lock) with the progress engine computing the next state, so two
//! concurrent increments of the same record cannot lose an update.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Attendance, Budget, Expense, Habit, HabitTracker, NewAttendance, NewBudget, NewExpense, NewHabit,
    UserProfile,
};
use crate::period::Period;
use crate::progress::attendance::AttendanceChange;
use crate::progress::budget::BudgetChange;
use crate::progress::habit::HabitChange;
use crate::types::OwnerId;

#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Creates the habit together with its bucket for `habit.period`
    async fn create_habit(&self, owner: &OwnerId, habit: NewHabit) -> Result<Habit, DatabaseError>;

    async fn list_habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, DatabaseError>;

    /// Applies `change` to the bucket of `period`
    async fn update_tracker(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        change: HabitChange,
    ) -> Result<HabitTracker, DatabaseError>;

    /// Creates the bucket of `period` if absent. The flag is true when a bucket was created.
    async fn start_period(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        goal: i32,
    ) -> Result<(HabitTracker, bool), DatabaseError>;

    async fn delete_habit(&self, owner: &OwnerId, habit_id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn create_attendance(
        &self,
        owner: &OwnerId,
        attendance: NewAttendance,
    ) -> Result<Attendance, DatabaseError>;

    async fn list_attendance(&self, owner: &OwnerId) -> Result<Vec<Attendance>, DatabaseError>;

    async fn update_attendance(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: AttendanceChange,
    ) -> Result<Attendance, DatabaseError>;

    async fn delete_attendance(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn create_budget(&self, owner: &OwnerId, budget: NewBudget) -> Result<Budget, DatabaseError>;

    /// Ordered by title
    async fn list_budgets(&self, owner: &OwnerId) -> Result<Vec<Budget>, DatabaseError>;

    async fn update_budget(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: BudgetChange,
    ) -> Result<Budget, DatabaseError>;

    async fn delete_budget(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn create_expense(&self, owner: &OwnerId, expense: NewExpense) -> Result<Expense, DatabaseError>;

    async fn list_expenses(&self, owner: &OwnerId, period: Period) -> Result<Vec<Expense>, DatabaseError>;

    /// Replaces the amount; title and period never change
    async fn update_expense_amount(
        &self,
        owner: &OwnerId,
        id: Uuid,
        amount: f64,
    ) -> Result<Expense, DatabaseError>;

    async fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, owner: &OwnerId) -> Result<Option<UserProfile>, DatabaseError>;
}

#[async_trait]
pub trait Store: HabitStore + AttendanceStore + BudgetStore + ExpenseStore + UserStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
