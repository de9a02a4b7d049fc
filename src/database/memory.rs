use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Attendance, Budget, Expense, Habit, HabitTracker, NewAttendance, NewBudget, NewExpense, NewHabit,
    UserProfile,
};
use crate::database::store::{AttendanceStore, BudgetStore, ExpenseStore, HabitStore, Store, UserStore};
use crate::period::{Bucketed, Period};
use crate::progress::attendance::{self, AttendanceChange};
use crate::progress::budget::{self, BudgetChange};
use crate::progress::habit::{self, HabitChange};
use crate::types::OwnerId;

#[derive(Debug, Default)]
struct Tables {
    habits: Vec<Habit>,
    attendance: Vec<Attendance>,
    budgets: Vec<Budget>,
    expenses: Vec<Expense>,
    users: Vec<UserProfile>,
}

/// Process-local store used by tests and `serve --memory`.
///
/// Every mutation holds the write lock across read, engine step and write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: UserProfile) {
        let mut tables = self.tables.write().await;
        tables.users.retain(|u| u.id != user.id);
        tables.users.push(user);
    }

    /// Total number of stored records across all domains
    pub async fn record_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.habits.len()
            + tables.habits.iter().map(|h| h.trackers.len()).sum::<usize>()
            + tables.attendance.len()
            + tables.budgets.len()
            + tables.expenses.len()
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn create_habit(&self, owner: &OwnerId, new: NewHabit) -> Result<Habit, DatabaseError> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let habit = Habit {
            id,
            owner_id: owner.clone(),
            title: new.title,
            created_at: now,
            updated_at: now,
            trackers: vec![HabitTracker {
                id: Uuid::new_v4(),
                habit_id: id,
                month: new.period.month,
                year: new.period.year,
                goal: new.tracker.goal,
                achieved: new.tracker.achieved,
                created_at: now,
                updated_at: now,
            }],
        };
        self.tables.write().await.habits.push(habit.clone());
        Ok(habit)
    }

    async fn list_habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.habits.iter().filter(|h| &h.owner_id == owner).cloned().collect())
    }

    async fn update_tracker(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        change: HabitChange,
    ) -> Result<HabitTracker, DatabaseError> {
        let mut tables = self.tables.write().await;
        let tracker = tables
            .habits
            .iter_mut()
            .find(|h| &h.owner_id == owner && h.id == habit_id)
            .ok_or_else(|| DatabaseError::not_found("Habit"))?
            .trackers
            .iter_mut()
            .find(|t| t.period() == period)
            .ok_or_else(|| DatabaseError::not_found("Habit tracker for the current period"))?;

        let next = habit::apply(tracker.state(), change)?;
        tracker.apply_state(next.state, Utc::now());
        Ok(tracker.clone())
    }

    async fn start_period(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        goal: i32,
    ) -> Result<(HabitTracker, bool), DatabaseError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .habits
            .iter_mut()
            .find(|h| &h.owner_id == owner && h.id == habit_id)
            .ok_or_else(|| DatabaseError::not_found("Habit"))?;

        if let Some(existing) = record.trackers.iter().find(|t| t.period() == period) {
            return Ok((existing.clone(), false));
        }

        let state = habit::seed(goal, 0)?;
        let now = Utc::now();
        let tracker = HabitTracker {
            id: Uuid::new_v4(),
            habit_id,
            month: period.month,
            year: period.year,
            goal: state.goal,
            achieved: state.achieved,
            created_at: now,
            updated_at: now,
        };
        record.trackers.push(tracker.clone());
        Ok((tracker, true))
    }

    async fn delete_habit(&self, owner: &OwnerId, habit_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.habits.len();
        tables.habits.retain(|h| !(&h.owner_id == owner && h.id == habit_id));
        if tables.habits.len() == before {
            return Err(DatabaseError::not_found("Habit"));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn create_attendance(
        &self,
        owner: &OwnerId,
        new: NewAttendance,
    ) -> Result<Attendance, DatabaseError> {
        let now = Utc::now();
        let record = Attendance {
            id: Uuid::new_v4(),
            owner_id: owner.clone(),
            title: new.title,
            total_class: new.state.total_class,
            class_attended: new.state.class_attended,
            completed: new.state.completed,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.attendance.push(record.clone());
        Ok(record)
    }

    async fn list_attendance(&self, owner: &OwnerId) -> Result<Vec<Attendance>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.attendance.iter().filter(|a| &a.owner_id == owner).cloned().collect())
    }

    async fn update_attendance(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: AttendanceChange,
    ) -> Result<Attendance, DatabaseError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .attendance
            .iter_mut()
            .find(|a| &a.owner_id == owner && a.id == id)
            .ok_or_else(|| DatabaseError::not_found("Attendance tracker"))?;

        let next = attendance::apply(record.state(), change)?;
        record.apply_state(next.state, Utc::now());
        Ok(record.clone())
    }

    async fn delete_attendance(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.attendance.len();
        tables.attendance.retain(|a| !(&a.owner_id == owner && a.id == id));
        if tables.attendance.len() == before {
            return Err(DatabaseError::not_found("Attendance tracker"));
        }
        Ok(())
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn create_budget(&self, owner: &OwnerId, new: NewBudget) -> Result<Budget, DatabaseError> {
        let now = Utc::now();
        let record = Budget {
            id: Uuid::new_v4(),
            owner_id: owner.clone(),
            title: new.title,
            goal: new.state.goal,
            saving: new.state.saving,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.budgets.push(record.clone());
        Ok(record)
    }

    async fn list_budgets(&self, owner: &OwnerId) -> Result<Vec<Budget>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut budgets: Vec<Budget> =
            tables.budgets.iter().filter(|b| &b.owner_id == owner).cloned().collect();
        budgets.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(budgets)
    }

    async fn update_budget(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: BudgetChange,
    ) -> Result<Budget, DatabaseError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .budgets
            .iter_mut()
            .find(|b| &b.owner_id == owner && b.id == id)
            .ok_or_else(|| DatabaseError::not_found("Budget tracker"))?;

        let next = budget::apply(record.state(), change)?;
        record.apply_state(next.state, Utc::now());
        Ok(record.clone())
    }

    async fn delete_budget(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.budgets.len();
        tables.budgets.retain(|b| !(&b.owner_id == owner && b.id == id));
        if tables.budgets.len() == before {
            return Err(DatabaseError::not_found("Budget tracker"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn create_expense(&self, owner: &OwnerId, new: NewExpense) -> Result<Expense, DatabaseError> {
        let now = Utc::now();
        let record = Expense {
            id: Uuid::new_v4(),
            owner_id: owner.clone(),
            title: new.title,
            amount: new.amount,
            month: new.period.month,
            year: new.period.year,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.expenses.push(record.clone());
        Ok(record)
    }

    async fn list_expenses(&self, owner: &OwnerId, period: Period) -> Result<Vec<Expense>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .expenses
            .iter()
            .filter(|e| &e.owner_id == owner && e.period() == period)
            .cloned()
            .collect())
    }

    async fn update_expense_amount(
        &self,
        owner: &OwnerId,
        id: Uuid,
        amount: f64,
    ) -> Result<Expense, DatabaseError> {
        let amount = crate::progress::expense::amount(amount)?;
        let mut tables = self.tables.write().await;
        let record = tables
            .expenses
            .iter_mut()
            .find(|e| &e.owner_id == owner && e.id == id)
            .ok_or_else(|| DatabaseError::not_found("Expense"))?;
        record.amount = amount;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.expenses.len();
        tables.expenses.retain(|e| !(&e.owner_id == owner && e.id == id));
        if tables.expenses.len() == before {
            return Err(DatabaseError::not_found("Expense"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, owner: &OwnerId) -> Result<Option<UserProfile>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == owner.as_str()).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
