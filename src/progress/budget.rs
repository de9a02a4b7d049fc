use serde::Serialize;

use super::{percentage, require_non_negative_amount, require_positive_amount, Progress, ProgressError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetState {
    pub goal: f64,
    pub saving: f64,
}

impl BudgetState {
    pub fn percentage(&self) -> f64 {
        percentage(self.saving, self.goal)
    }
}

/// Both budget updates replace their field outright
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetChange {
    SetGoal(f64),
    SetSaving(f64),
}

impl BudgetChange {
    pub fn validate(&self) -> Result<(), ProgressError> {
        match *self {
            BudgetChange::SetGoal(goal) => require_positive_amount("updateGoalValue", goal).map(|_| ()),
            BudgetChange::SetSaving(saving) => {
                require_non_negative_amount("updatedSavingsValue", saving).map(|_| ())
            }
        }
    }
}

pub fn seed(goal: f64) -> Result<BudgetState, ProgressError> {
    Ok(BudgetState {
        goal: require_positive_amount("goal", goal)?,
        saving: 0.0,
    })
}

pub fn apply(state: BudgetState, change: BudgetChange) -> Result<Progress<BudgetState>, ProgressError> {
    change.validate()?;
    let next = match change {
        BudgetChange::SetGoal(goal) => BudgetState { goal, ..state },
        BudgetChange::SetSaving(saving) => BudgetState { saving, ..state },
    };
    Ok(Progress { state: next, percentage: next.percentage() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_scenario() {
        let state = seed(1000.0).unwrap();
        assert_eq!(state.saving, 0.0);

        let next = apply(state, BudgetChange::SetSaving(2000.0)).unwrap();
        assert_eq!(next.state.saving, 2000.0);
        assert_eq!(next.percentage, 100.0);
    }

    #[test]
    fn savings_is_a_replace_not_an_increment() {
        let state = BudgetState { goal: 400.0, saving: 100.0 };
        let next = apply(state, BudgetChange::SetSaving(50.0)).unwrap();
        assert_eq!(next.state.saving, 50.0);
        assert_eq!(next.percentage, 12.5);
    }

    #[test]
    fn rejects_negative_saving_and_non_positive_goal() {
        let state = BudgetState { goal: 400.0, saving: 100.0 };
        assert!(apply(state, BudgetChange::SetSaving(-1.0)).is_err());
        assert!(apply(state, BudgetChange::SetGoal(0.0)).is_err());
        assert!(apply(state, BudgetChange::SetGoal(f64::NAN)).is_err());
        assert!(seed(-5.0).is_err());
    }
}
