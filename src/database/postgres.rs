use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Attendance, Budget, Expense, Habit, HabitTracker, NewAttendance, NewBudget, NewExpense, NewHabit,
    UserProfile,
};
use crate::database::store::{AttendanceStore, BudgetStore, ExpenseStore, HabitStore, Store, UserStore};
use crate::period::Period;
use crate::progress::attendance::{self, AttendanceChange};
use crate::progress::budget::{self, BudgetChange};
use crate::progress::habit::{self, HabitChange};
use crate::progress::expense;
use crate::types::OwnerId;

/// PostgreSQL-backed store.
///
/// Counter updates lock the target row with `SELECT ... FOR UPDATE`, run the
/// progress engine, and write the result in the same transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn habit_exists(
        tx: &mut Transaction<'_, Postgres>,
        owner: &OwnerId,
        habit_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM habits WHERE owner_id = $1 AND id = $2 FOR UPDATE")
            .bind(owner)
            .bind(habit_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl HabitStore for PgStore {
    async fn create_habit(&self, owner: &OwnerId, new: NewHabit) -> Result<Habit, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut habit: Habit = sqlx::query_as(
            r#"
            INSERT INTO habits (id, owner_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, title, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.title)
        .fetch_one(&mut *tx)
        .await?;

        let tracker: HabitTracker = sqlx::query_as(
            r#"
            INSERT INTO habit_trackers (id, habit_id, month, year, goal, achieved)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, habit_id, month, year, goal, achieved, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(habit.id)
        .bind(new.period.month)
        .bind(new.period.year)
        .bind(new.tracker.goal)
        .bind(new.tracker.achieved)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        habit.trackers.push(tracker);
        Ok(habit)
    }

    async fn list_habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, DatabaseError> {
        let mut habits: Vec<Habit> = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, created_at, updated_at
            FROM habits
            WHERE owner_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        if habits.is_empty() {
            return Ok(habits);
        }

        let ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
        let trackers: Vec<HabitTracker> = sqlx::query_as(
            r#"
            SELECT id, habit_id, month, year, goal, achieved, created_at, updated_at
            FROM habit_trackers
            WHERE habit_id = ANY($1)
            ORDER BY year, month
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut by_habit: HashMap<Uuid, Vec<HabitTracker>> = HashMap::new();
        for tracker in trackers {
            by_habit.entry(tracker.habit_id).or_default().push(tracker);
        }
        for habit in &mut habits {
            habit.trackers = by_habit.remove(&habit.id).unwrap_or_default();
        }
        Ok(habits)
    }

    async fn update_tracker(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        change: HabitChange,
    ) -> Result<HabitTracker, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<HabitTracker> = sqlx::query_as(
            r#"
            SELECT t.id, t.habit_id, t.month, t.year, t.goal, t.achieved, t.created_at, t.updated_at
            FROM habit_trackers t
            JOIN habits h ON h.id = t.habit_id
            WHERE h.owner_id = $1 AND h.id = $2 AND t.month = $3 AND t.year = $4
            FOR UPDATE OF t
            "#,
        )
        .bind(owner)
        .bind(habit_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            if Self::habit_exists(&mut tx, owner, habit_id).await? {
                return Err(DatabaseError::not_found("Habit tracker for the current period"));
            }
            return Err(DatabaseError::not_found("Habit"));
        };

        let next = habit::apply(current.state(), change)?;

        let updated: HabitTracker = sqlx::query_as(
            r#"
            UPDATE habit_trackers
            SET goal = $2, achieved = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, habit_id, month, year, goal, achieved, created_at, updated_at
            "#,
        )
        .bind(current.id)
        .bind(next.state.goal)
        .bind(next.state.achieved)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn start_period(
        &self,
        owner: &OwnerId,
        habit_id: Uuid,
        period: Period,
        goal: i32,
    ) -> Result<(HabitTracker, bool), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Locks the habit so two rollovers of the same habit serialize
        if !Self::habit_exists(&mut tx, owner, habit_id).await? {
            return Err(DatabaseError::not_found("Habit"));
        }

        let existing: Option<HabitTracker> = sqlx::query_as(
            r#"
            SELECT id, habit_id, month, year, goal, achieved, created_at, updated_at
            FROM habit_trackers
            WHERE habit_id = $1 AND month = $2 AND year = $3
            "#,
        )
        .bind(habit_id)
        .bind(period.month)
        .bind(period.year)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(tracker) = existing {
            tx.commit().await?;
            return Ok((tracker, false));
        }

        let state = habit::seed(goal, 0)?;
        let tracker: HabitTracker = sqlx::query_as(
            r#"
            INSERT INTO habit_trackers (id, habit_id, month, year, goal, achieved)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, habit_id, month, year, goal, achieved, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(habit_id)
        .bind(period.month)
        .bind(period.year)
        .bind(state.goal)
        .bind(state.achieved)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((tracker, true))
    }

    async fn delete_habit(&self, owner: &OwnerId, habit_id: Uuid) -> Result<(), DatabaseError> {
        // Buckets go with the habit via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM habits WHERE owner_id = $1 AND id = $2")
            .bind(owner)
            .bind(habit_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Habit"));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for PgStore {
    async fn create_attendance(
        &self,
        owner: &OwnerId,
        new: NewAttendance,
    ) -> Result<Attendance, DatabaseError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO attendance (id, owner_id, title, total_class, class_attended, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, total_class, class_attended, completed, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.title)
        .bind(new.state.total_class)
        .bind(new.state.class_attended)
        .bind(new.state.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_attendance(&self, owner: &OwnerId) -> Result<Vec<Attendance>, DatabaseError> {
        let records = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, total_class, class_attended, completed, created_at, updated_at
            FROM attendance
            WHERE owner_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn update_attendance(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: AttendanceChange,
    ) -> Result<Attendance, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let current: Attendance = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, total_class, class_attended, completed, created_at, updated_at
            FROM attendance
            WHERE owner_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(owner)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Attendance tracker"))?;

        let next = attendance::apply(current.state(), change)?;

        let updated = sqlx::query_as(
            r#"
            UPDATE attendance
            SET total_class = $2, class_attended = $3, completed = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, title, total_class, class_attended, completed, created_at, updated_at
            "#,
        )
        .bind(current.id)
        .bind(next.state.total_class)
        .bind(next.state.class_attended)
        .bind(next.state.completed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_attendance(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM attendance WHERE owner_id = $1 AND id = $2")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Attendance tracker"));
        }
        Ok(())
    }
}

#[async_trait]
impl BudgetStore for PgStore {
    async fn create_budget(&self, owner: &OwnerId, new: NewBudget) -> Result<Budget, DatabaseError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO budgets (id, owner_id, title, goal, saving)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, title, goal, saving, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.title)
        .bind(new.state.goal)
        .bind(new.state.saving)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_budgets(&self, owner: &OwnerId) -> Result<Vec<Budget>, DatabaseError> {
        let records = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, goal, saving, created_at, updated_at
            FROM budgets
            WHERE owner_id = $1
            ORDER BY title ASC, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn update_budget(
        &self,
        owner: &OwnerId,
        id: Uuid,
        change: BudgetChange,
    ) -> Result<Budget, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let current: Budget = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, goal, saving, created_at, updated_at
            FROM budgets
            WHERE owner_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(owner)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Budget tracker"))?;

        let next = budget::apply(current.state(), change)?;

        let updated = sqlx::query_as(
            r#"
            UPDATE budgets
            SET goal = $2, saving = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, owner_id, title, goal, saving, created_at, updated_at
            "#,
        )
        .bind(current.id)
        .bind(next.state.goal)
        .bind(next.state.saving)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_budget(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM budgets WHERE owner_id = $1 AND id = $2")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Budget tracker"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for PgStore {
    async fn create_expense(&self, owner: &OwnerId, new: NewExpense) -> Result<Expense, DatabaseError> {
        let record = sqlx::query_as(
            r#"
            INSERT INTO expenses (id, owner_id, title, amount, month, year)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, amount, month, year, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.title)
        .bind(new.amount)
        .bind(new.period.month)
        .bind(new.period.year)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_expenses(&self, owner: &OwnerId, period: Period) -> Result<Vec<Expense>, DatabaseError> {
        let records = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, amount, month, year, created_at, updated_at
            FROM expenses
            WHERE owner_id = $1 AND month = $2 AND year = $3
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .bind(period.month)
        .bind(period.year)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn update_expense_amount(
        &self,
        owner: &OwnerId,
        id: Uuid,
        amount: f64,
    ) -> Result<Expense, DatabaseError> {
        let amount = expense::amount(amount)?;
        // Single statement, no read needed: the amount is replaced
        let record: Option<Expense> = sqlx::query_as(
            r#"
            UPDATE expenses
            SET amount = $3, updated_at = now()
            WHERE owner_id = $1 AND id = $2
            RETURNING id, owner_id, title, amount, month, year, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;
        record.ok_or_else(|| DatabaseError::not_found("Expense"))
    }

    async fn delete_expense(&self, owner: &OwnerId, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM expenses WHERE owner_id = $1 AND id = $2")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Expense"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, owner: &OwnerId) -> Result<Option<UserProfile>, DatabaseError> {
        let user = sqlx::query_as("SELECT id, name, email, email_verified FROM users WHERE id = $1")
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
