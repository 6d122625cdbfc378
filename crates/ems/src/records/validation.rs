//! Synchronous checks run before any store call. Messages are the ones shown inline on
//! the admin forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::domain::{Department, DepartmentId, EventKind, Gender, Month};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 70;
pub const MIN_PERFORMANCE: f64 = 1.0;
pub const MAX_PERFORMANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name and Department are required.")]
    NameAndDepartmentRequired,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("Gender is required.")]
    GenderRequired,
    #[error("Valid age (18-70) is required.")]
    AgeOutOfRange,
    #[error("Performance rating must be between 1 and 5.")]
    PerformanceOutOfRange,
    #[error("Department '{0}' does not exist.")]
    UnknownDepartment(String),
    #[error("All fields are required.")]
    MissingFields,
    #[error("Department already exists.")]
    DuplicateDepartment,
    #[error("Leave must end on or after its start date.")]
    LeaveEndsBeforeStart,
    #[error("Salary amount must be greater than zero.")]
    NonPositiveAmount,
}

/// Case-insensitive lookup from department names to their identifiers.
#[derive(Debug, Clone, Default)]
pub struct DepartmentDirectory {
    by_name: HashMap<String, DepartmentId>,
}

impl DepartmentDirectory {
    pub fn new(departments: &[Department]) -> Self {
        let by_name = departments
            .iter()
            .map(|department| (normalize(&department.name), department.id))
            .collect();
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<DepartmentId> {
        self.by_name.get(&normalize(name)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "super::domain::lenient::gender")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub salary_month: Option<Month>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

impl EmployeeDraft {
    /// Checks shared by creation and update, in the order the form reports them.
    pub fn validate(&self, directory: &DepartmentDirectory) -> Result<(), ValidationError> {
        if blank(&self.name) || blank(&self.department) {
            return Err(ValidationError::NameAndDepartmentRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.gender.is_none() {
            return Err(ValidationError::GenderRequired);
        }
        match self.age {
            Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => {}
            _ => return Err(ValidationError::AgeOutOfRange),
        }
        if !directory.is_empty() && directory.resolve(&self.department).is_none() {
            return Err(ValidationError::UnknownDepartment(
                self.department.trim().to_string(),
            ));
        }
        Ok(())
    }

    /// Updates may also carry a performance rating.
    pub fn validate_update(&self, directory: &DepartmentDirectory) -> Result<(), ValidationError> {
        self.validate(directory)?;
        match self.performance {
            Some(score) if !(MIN_PERFORMANCE..=MAX_PERFORMANCE).contains(&score) => {
                Err(ValidationError::PerformanceOutOfRange)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DepartmentDraft {
    /// `editing` excludes the department being renamed from the uniqueness check.
    pub fn validate(
        &self,
        existing: &[Department],
        editing: Option<DepartmentId>,
    ) -> Result<(), ValidationError> {
        if blank(&self.name) || blank(&self.description) {
            return Err(ValidationError::MissingFields);
        }
        let wanted = normalize(&self.name);
        let duplicate = existing
            .iter()
            .filter(|department| Some(department.id) != editing)
            .any(|department| normalize(&department.name) == wanted);
        if duplicate {
            return Err(ValidationError::DuplicateDepartment);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDraft {
    pub employee_name: String,
    #[serde(default)]
    pub department: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub reason: String,
}

/// A leave request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
    pub employee_name: String,
    pub department: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub reason: String,
}

impl LeaveDraft {
    pub fn validate(self) -> Result<NewLeave, ValidationError> {
        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Err(ValidationError::MissingFields);
        };
        if blank(&self.employee_name) || blank(&self.reason) {
            return Err(ValidationError::MissingFields);
        }
        if to < from {
            return Err(ValidationError::LeaveEndsBeforeStart);
        }
        Ok(NewLeave {
            employee_name: self.employee_name.trim().to_string(),
            department: self
                .department
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            from,
            to,
            reason: self.reason.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDraft {
    pub employee_name: String,
    pub department: String,
    pub month: Option<Month>,
    pub amount: Option<f64>,
}

/// A salary entry that passed validation. It is stored as `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalary {
    pub employee_name: String,
    pub department: String,
    pub month: Month,
    pub amount: f64,
}

impl SalaryDraft {
    pub fn validate(self) -> Result<NewSalary, ValidationError> {
        let (Some(month), Some(amount)) = (self.month, self.amount) else {
            return Err(ValidationError::MissingFields);
        };
        if blank(&self.employee_name) || blank(&self.department) {
            return Err(ValidationError::MissingFields);
        }
        if !(amount > 0.0) {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(NewSalary {
            employee_name: self.employee_name.trim().to_string(),
            department: self.department.trim().to_string(),
            month,
            amount,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub date: NaiveDate,
    pub details: String,
}

impl EventDraft {
    pub fn validate(self) -> Result<NewEvent, ValidationError> {
        match self.date {
            Some(date) if !blank(&self.title) => Ok(NewEvent {
                kind: self.kind,
                title: self.title.trim().to_string(),
                date,
                details: self.details,
            }),
            _ => Err(ValidationError::MissingFields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departments() -> Vec<Department> {
        ["HR", "IT", "Finance"]
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Department {
                id: DepartmentId(idx as u64 + 1),
                name: name.to_string(),
                description: format!("{name} team"),
            })
            .collect()
    }

    fn valid_employee() -> EmployeeDraft {
        EmployeeDraft {
            name: "Neha".to_string(),
            department: "it".to_string(),
            password: "secret1".to_string(),
            gender: Some(Gender::Female),
            age: Some(29),
            ..EmployeeDraft::default()
        }
    }

    #[test]
    fn employee_checks_run_in_form_order() {
        let directory = DepartmentDirectory::new(&departments());

        let mut draft = valid_employee();
        draft.name = "  ".to_string();
        draft.password.clear();
        assert_eq!(
            draft.validate(&directory),
            Err(ValidationError::NameAndDepartmentRequired)
        );

        let mut draft = valid_employee();
        draft.password = "12345".to_string();
        draft.gender = None;
        assert_eq!(draft.validate(&directory), Err(ValidationError::PasswordTooShort));

        let mut draft = valid_employee();
        draft.gender = None;
        assert_eq!(draft.validate(&directory), Err(ValidationError::GenderRequired));

        for age in [None, Some(17), Some(71)] {
            let mut draft = valid_employee();
            draft.age = age;
            assert_eq!(draft.validate(&directory), Err(ValidationError::AgeOutOfRange));
        }

        assert!(valid_employee().validate(&directory).is_ok());
    }

    #[test]
    fn employee_department_must_exist_when_directory_known() {
        let directory = DepartmentDirectory::new(&departments());
        let mut draft = valid_employee();
        draft.department = "Legal".to_string();
        assert_eq!(
            draft.validate(&directory),
            Err(ValidationError::UnknownDepartment("Legal".to_string()))
        );
        assert!(draft.validate(&DepartmentDirectory::default()).is_ok());
    }

    #[test]
    fn performance_is_bounded_on_update_only() {
        let directory = DepartmentDirectory::new(&departments());
        let mut draft = valid_employee();
        draft.performance = Some(5.5);
        assert!(draft.validate(&directory).is_ok());
        assert_eq!(
            draft.validate_update(&directory),
            Err(ValidationError::PerformanceOutOfRange)
        );
        draft.performance = Some(4.0);
        assert!(draft.validate_update(&directory).is_ok());
    }

    #[test]
    fn department_names_are_unique_ignoring_case() {
        let existing = departments();
        let draft = DepartmentDraft {
            name: " hr ".to_string(),
            description: "People ops".to_string(),
        };
        assert_eq!(
            draft.validate(&existing, None),
            Err(ValidationError::DuplicateDepartment)
        );
        assert!(draft.validate(&existing, Some(DepartmentId(1))).is_ok());

        let missing = DepartmentDraft {
            name: "Legal".to_string(),
            description: String::new(),
        };
        assert_eq!(
            missing.validate(&existing, None),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn salary_draft_requires_every_field() {
        let draft = SalaryDraft {
            employee_name: "Amit".to_string(),
            department: "HR".to_string(),
            month: Some(Month::June),
            amount: None,
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingFields));

        let draft = SalaryDraft {
            employee_name: "Amit".to_string(),
            department: "HR".to_string(),
            month: Some(Month::June),
            amount: Some(0.0),
        };
        assert_eq!(draft.validate(), Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn form_posts_decode_free_text_gender_and_month() {
        let draft: EmployeeDraft = serde_json::from_value(serde_json::json!({
            "name": "Neha",
            "department": "IT",
            "gender": "f",
            "salaryMonth": "june 2025"
        }))
        .expect("decodes");
        assert_eq!(draft.gender, Some(Gender::Female));
        assert_eq!(draft.salary_month, Some(Month::June));

        let draft: EmployeeDraft = serde_json::from_value(serde_json::json!({
            "name": "Neha",
            "department": "IT",
            "gender": "unknown"
        }))
        .expect("decodes");
        assert_eq!(draft.gender, None);

        let salary: SalaryDraft = serde_json::from_value(serde_json::json!({
            "employeeName": "Amit",
            "department": "HR",
            "month": "JUNE",
            "amount": 25000.0
        }))
        .expect("decodes");
        assert_eq!(salary.month, Some(Month::June));
    }

    #[test]
    fn leave_draft_rejects_inverted_ranges() {
        let draft = LeaveDraft {
            employee_name: "Priya".to_string(),
            department: Some(" ".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 6, 10),
            to: NaiveDate::from_ymd_opt(2024, 6, 8),
            reason: "Family function".to_string(),
        };
        assert_eq!(
            draft.clone().validate(),
            Err(ValidationError::LeaveEndsBeforeStart)
        );

        let fixed = LeaveDraft {
            to: NaiveDate::from_ymd_opt(2024, 6, 12),
            ..draft
        };
        let leave = fixed.validate().expect("valid leave");
        assert_eq!(leave.department, None);
    }
}
