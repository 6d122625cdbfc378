use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(EmployeeId);
record_id!(DepartmentId);
record_id!(LeaveId);
record_id!(SalaryId);
record_id!(EventId);

/// Human-facing employee code such as `EMP007`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeCode(pub String);

impl EmployeeCode {
    const PREFIX: &'static str = "EMP";

    /// Numeric part of the code, ignoring every non-digit character.
    pub fn number(&self) -> Option<u64> {
        let digits: String = self.0.chars().filter(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    /// Next code after the highest numbered one in `existing`, zero-padded to three digits.
    pub fn next_after<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a EmployeeCode>,
    {
        let max = existing
            .into_iter()
            .filter_map(EmployeeCode::number)
            .max()
            .unwrap_or(0);
        Self(format!("{}{:03}", Self::PREFIX, max.saturating_add(1)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Zero-based position in the calendar.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Month of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::ordered()[date.month0() as usize]
    }

    /// Case-insensitive parse of a month name, tolerating a trailing year ("June 2025").
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.split_whitespace().next()?;
        Self::ordered()
            .into_iter()
            .find(|month| month.label().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Salary months are stored as free text, so decoding goes through [`Month::parse`].
impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Month::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised month `{raw}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive parse accepting full names and single-letter codes.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            "other" | "o" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(rename = "empId", default)]
    pub code: EmployeeCode,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub salary: f64,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "lenient::gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "lenient::age")]
    pub age: Option<u8>,
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub leaves: u32,
    #[serde(default, deserialize_with = "lenient::month")]
    pub salary_month: Option<Month>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "APPROVED")]
    Approved,
    #[serde(alias = "REJECTED")]
    Rejected,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Admin decision on a leave request. Decisions are final.
    pub fn decide(self, decision: LeaveStatus) -> Result<LeaveStatus, TransitionError> {
        match (self, decision) {
            (Self::Pending, Self::Approved | Self::Rejected) => Ok(decision),
            (from, to) => Err(TransitionError {
                from: from.label(),
                to: to.label(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: LeaveId,
    #[serde(alias = "name")]
    pub employee_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(alias = "fromDate")]
    pub from: NaiveDate,
    #[serde(alias = "toDate")]
    pub to: NaiveDate,
    #[serde(default)]
    pub reason: String,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Calendar days covered, inclusive of both ends.
    pub fn days(&self) -> u32 {
        let span = (self.to - self.from).num_days() + 1;
        u32::try_from(span.max(0)).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryStatus {
    #[serde(alias = "Unpaid", alias = "UNPAID", alias = "PENDING")]
    Pending,
    #[serde(alias = "PAID")]
    Paid,
}

impl SalaryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
        }
    }

    pub fn pay(self) -> Result<SalaryStatus, TransitionError> {
        match self {
            Self::Pending => Ok(Self::Paid),
            Self::Paid => Err(TransitionError {
                from: Self::Paid.label(),
                to: Self::Paid.label(),
            }),
        }
    }
}

/// A single monthly payment, distinct from the employee's base salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub id: SalaryId,
    #[serde(alias = "name")]
    pub employee_name: String,
    #[serde(default)]
    pub department: Option<String>,
    pub month: Month,
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: f64,
    pub status: SalaryStatus,
}

/// A monthly statement as seen from the employee portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    /// Free-text period such as "June 2025".
    pub month: String,
    pub amount: f64,
    #[serde(default)]
    pub deductions: f64,
    #[serde(default)]
    pub net: Option<f64>,
    pub status: String,
    #[serde(rename = "payslip")]
    pub number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub remarks: String,
}

impl Payslip {
    pub fn net_amount(&self) -> f64 {
        self.net.unwrap_or(self.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Holiday,
    Event,
    Function,
    Announcement,
    Meeting,
    Reminder,
    Workshop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, alias = "description")]
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }
}

/// One line of an employee's own attendance log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// Admin-side marks keyed by date, then employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceRegister {
    marks: BTreeMap<NaiveDate, BTreeMap<EmployeeId, AttendanceStatus>>,
}

impl AttendanceRegister {
    pub fn mark(&mut self, date: NaiveDate, employee: EmployeeId, status: AttendanceStatus) {
        self.marks.entry(date).or_default().insert(employee, status);
    }

    pub fn status(&self, date: NaiveDate, employee: EmployeeId) -> Option<AttendanceStatus> {
        self.marks.get(&date)?.get(&employee).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Every mark in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, EmployeeId, AttendanceStatus)> + '_ {
        self.marks.iter().flat_map(|(date, by_employee)| {
            by_employee
                .iter()
                .map(move |(employee, status)| (*date, *employee, *status))
        })
    }

    /// One employee's marks in chronological order.
    pub fn for_employee(&self, employee: EmployeeId) -> Vec<(NaiveDate, AttendanceStatus)> {
        self.marks
            .iter()
            .filter_map(|(date, by_employee)| {
                by_employee.get(&employee).map(|status| (*date, *status))
            })
            .collect()
    }

    pub fn forget_employee(&mut self, employee: EmployeeId) {
        for by_employee in self.marks.values_mut() {
            by_employee.remove(&employee);
        }
        self.marks.retain(|_, by_employee| !by_employee.is_empty());
    }
}

/// Admin display settings broadcast to every open view when they change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub display_name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Backends and form posts send numbers as JSON strings ("50000") as often as numbers,
/// and leave optional text fields null or free-form.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::{Gender, Month};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(value) => Ok(value),
            NumberOrText::Text(text) if text.trim().is_empty() => Ok(0.0),
            NumberOrText::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub(crate) fn age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => {
                if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
                    Ok(Some(value as u8))
                } else {
                    Err(serde::de::Error::custom(format!("age {value} is out of range")))
                }
            }
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(NumberOrText::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }

    /// Null reads as an empty string.
    pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Unrecognised values read as absent rather than failing the whole record.
    pub(crate) fn gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| Gender::parse(&raw)))
    }

    pub(crate) fn month<'de, D>(deserializer: D) -> Result<Option<Month>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(|raw| Month::parse(&raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status cannot change from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> EmployeeCode {
        EmployeeCode(raw.to_string())
    }

    #[test]
    fn next_code_follows_highest_existing_number() {
        let existing = [code("EMP001"), code("EMP007"), code("EMP003")];
        assert_eq!(EmployeeCode::next_after(&existing).as_str(), "EMP008");
        assert_eq!(
            EmployeeCode::next_after(std::iter::empty()).as_str(),
            "EMP001"
        );
    }

    #[test]
    fn next_code_saturates_at_largest_number() {
        let existing = [code("EMP18446744073709551615")];
        assert_eq!(
            EmployeeCode::next_after(&existing).as_str(),
            "EMP18446744073709551615"
        );
    }

    #[test]
    fn next_code_ignores_unparseable_codes_and_keeps_wide_numbers() {
        let existing = [code("TEMP"), code("EMP1234"), code("")];
        assert_eq!(EmployeeCode::next_after(&existing).as_str(), "EMP1235");
    }

    #[test]
    fn month_parse_accepts_year_suffix_and_any_case() {
        assert_eq!(Month::parse("june"), Some(Month::June));
        assert_eq!(Month::parse("June 2025"), Some(Month::June));
        assert_eq!(Month::parse(" DECEMBER "), Some(Month::December));
        assert_eq!(Month::parse("Juneteenth"), None);
        assert_eq!(Month::parse(""), None);
    }

    #[test]
    fn salary_months_decode_from_free_text() {
        let records: Vec<SalaryRecord> = serde_json::from_value(serde_json::json!([
            {
                "id": 1,
                "employeeName": "Amit",
                "month": "June 2025",
                "amount": 25000.0,
                "status": "UNPAID"
            },
            {
                "id": 2,
                "employeeName": "Priya",
                "month": "june",
                "amount": "30000",
                "status": "PAID"
            }
        ]))
        .expect("deserializes");
        assert_eq!(records[0].month, Month::June);
        assert_eq!(records[1].month, Month::June);
        assert_eq!(records[1].status, SalaryStatus::Paid);

        let err = serde_json::from_str::<Month>("\"Smarch\"").expect_err("not a month");
        assert!(err.to_string().contains("Smarch"));
    }

    #[test]
    fn month_of_date_uses_calendar_position() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 31).expect("valid date");
        assert_eq!(Month::of(date), Month::May);
        assert_eq!(Month::May.index(), 4);
    }

    #[test]
    fn leave_decisions_are_one_way() {
        assert_eq!(
            LeaveStatus::Pending.decide(LeaveStatus::Approved),
            Ok(LeaveStatus::Approved)
        );
        assert!(LeaveStatus::Approved.decide(LeaveStatus::Rejected).is_err());
        assert!(LeaveStatus::Rejected.decide(LeaveStatus::Pending).is_err());
        assert!(LeaveStatus::Pending.decide(LeaveStatus::Pending).is_err());
    }

    #[test]
    fn salary_status_accepts_backend_aliases() {
        let status: SalaryStatus = serde_json::from_str("\"UNPAID\"").expect("alias parses");
        assert_eq!(status, SalaryStatus::Pending);
        assert!(SalaryStatus::Paid.pay().is_err());
    }

    #[test]
    fn employee_accepts_numeric_fields_sent_as_text() {
        let employee: Employee = serde_json::from_value(serde_json::json!({
            "id": 3,
            "empId": "EMP003",
            "name": "Ravi",
            "department": "Finance",
            "salary": "45000",
            "age": "35",
            "gender": "Male"
        }))
        .expect("deserializes");
        assert_eq!(employee.salary, 45000.0);
        assert_eq!(employee.age, Some(35));
        assert_eq!(employee.performance, None);
        assert_eq!(employee.leaves, 0);
    }

    #[test]
    fn employee_accepts_backend_entity_shape() {
        let employees: Vec<Employee> = serde_json::from_value(serde_json::json!([{
            "id": 1,
            "name": "Amit",
            "department": null,
            "position": "Manager",
            "email": "amit@demo.com",
            "salary": 50000.0,
            "gender": "male",
            "age": 32,
            "performance": 4.5,
            "salaryMonth": "June 2025"
        }, {
            "id": 2,
            "name": "Priya",
            "gender": "N/A"
        }]))
        .expect("deserializes");
        assert_eq!(employees[0].code, EmployeeCode::default());
        assert_eq!(employees[0].department, "");
        assert_eq!(employees[0].gender, Some(Gender::Male));
        assert_eq!(employees[0].salary_month, Some(Month::June));
        assert_eq!(employees[1].gender, None);
        assert_eq!(employees[1].salary, 0.0);
    }

    #[test]
    fn employee_age_rejects_values_outside_whole_years() {
        for age in [300.0, -1.0, 32.5] {
            let decoded = serde_json::from_value::<Employee>(serde_json::json!({
                "id": 1,
                "name": "Amit",
                "age": age
            }));
            assert!(decoded.is_err(), "age {age} should be rejected");
        }
        let employee: Employee =
            serde_json::from_value(serde_json::json!({ "id": 1, "name": "Amit", "age": 70 }))
                .expect("deserializes");
        assert_eq!(employee.age, Some(70));
    }

    #[test]
    fn employee_password_is_never_serialized() {
        let employee = Employee {
            id: EmployeeId(1),
            code: code("EMP001"),
            name: "Amit".to_string(),
            department: "HR".to_string(),
            position: "Manager".to_string(),
            email: "amit@demo.com".to_string(),
            phone: String::new(),
            address: String::new(),
            salary: 50000.0,
            password: "123456".to_string(),
            photo: None,
            gender: Some(Gender::Male),
            age: Some(32),
            performance: Some(4.5),
            leaves: 2,
            salary_month: Some(Month::June),
            join_date: None,
            exit_date: None,
        };
        let json = serde_json::to_value(&employee).expect("serializes");
        assert!(json.get("password").is_none());
        assert_eq!(json["empId"], "EMP001");
        assert_eq!(json["salaryMonth"], "June");
    }

    #[test]
    fn register_lists_marks_per_employee_in_date_order() {
        let mut register = AttendanceRegister::default();
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 2).expect("valid");
        let d0 = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid");
        register.mark(d1, EmployeeId(1), AttendanceStatus::Absent);
        register.mark(d0, EmployeeId(1), AttendanceStatus::Present);
        register.mark(d0, EmployeeId(2), AttendanceStatus::Present);
        register.mark(d0, EmployeeId(1), AttendanceStatus::Absent);

        assert_eq!(
            register.for_employee(EmployeeId(1)),
            vec![(d0, AttendanceStatus::Absent), (d1, AttendanceStatus::Absent)]
        );
        register.forget_employee(EmployeeId(1));
        assert_eq!(register.iter().count(), 1);
        assert_eq!(register.status(d0, EmployeeId(2)), Some(AttendanceStatus::Present));
    }
}
