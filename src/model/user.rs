//! People the store knows about: employees and customers.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::framework::{FieldRule, Labeled, PromptSequence, Row, Tabular};
use crate::model::{non_empty, parse_positive_decimal, EntityError, Form, StoreView};

lazy_static! {
    static ref SSN: Regex = Regex::new(r"^[0-9]{9}$").expect("ssn pattern");
    static ref PHONE: Regex = Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("phone pattern");
}

/// Numeric user id handed out by the store's counter, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    Employee,
    Customer,
}

impl Labeled for UserKind {
    const ALL: &'static [Self] = &[Self::Employee, Self::Customer];

    fn label(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Customer => "Customer",
        }
    }
}

impl UserKind {
    pub fn form(self, title: impl Into<String>) -> Form {
        let mut rules = vec![
            FieldRule::simple("First Name", "Please enter a name with at least 1 character.", non_empty),
            FieldRule::simple("Last Name", "Please enter a name with at least 1 character.", non_empty),
        ];
        match self {
            Self::Employee => {
                rules.push(FieldRule::simple("SSN", "Please enter a 9 digit integer.", |raw| SSN.is_match(raw)));
                rules.push(FieldRule::simple("Salary", "Please enter a positive number for the salary.", |raw| {
                    parse_positive_decimal(raw, None).is_some()
                }));
            }
            Self::Customer => {
                rules.push(FieldRule::simple(
                    "Phone Number",
                    "Please enter a phone number in the format \"XXX-XXX-XXXX\"",
                    |raw| PHONE.is_match(raw),
                ));
                rules.push(FieldRule::simple(
                    "Address",
                    "Please enter an address with at least 1 character.",
                    non_empty,
                ));
            }
        }
        PromptSequence::<StoreView>::new(title, rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant")]
pub enum UserRole {
    /// SSN is kept numerically; leading zeros come back when displayed.
    Employee { ssn: u32, salary: Decimal },
    Customer { phone: String, address: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl User {
    /// Builds a user of `kind` with the given id from `[first, last, ssn|phone, salary|address]`.
    pub fn from_fields(id: UserId, kind: UserKind, fields: &[String]) -> Result<Self, EntityError> {
        let [first_name, last_name, third, fourth] = fields else {
            return Err(EntityError::FieldCount {
                expected: 4,
                actual: fields.len(),
            });
        };
        if !non_empty(first_name) {
            return Err(EntityError::invalid("First Name", "must not be empty"));
        }
        if !non_empty(last_name) {
            return Err(EntityError::invalid("Last Name", "must not be empty"));
        }

        let role = match kind {
            UserKind::Employee => {
                if !SSN.is_match(third) {
                    return Err(EntityError::invalid("SSN", "must be exactly 9 digits"));
                }
                let ssn = third
                    .parse()
                    .map_err(|_| EntityError::invalid("SSN", "must be exactly 9 digits"))?;
                let salary = parse_positive_decimal(fourth, None)
                    .ok_or_else(|| EntityError::invalid("Salary", "must be a positive number"))?;
                UserRole::Employee { ssn, salary }
            }
            UserKind::Customer => {
                if !PHONE.is_match(third) {
                    return Err(EntityError::invalid("Phone Number", "must look like XXX-XXX-XXXX"));
                }
                if !non_empty(fourth) {
                    return Err(EntityError::invalid("Address", "must not be empty"));
                }
                UserRole::Customer {
                    phone: third.clone(),
                    address: fourth.clone(),
                }
            }
        };

        Ok(Self {
            id,
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            role,
        })
    }

    pub fn kind(&self) -> UserKind {
        match self.role {
            UserRole::Employee { .. } => UserKind::Employee,
            UserRole::Customer { .. } => UserKind::Customer,
        }
    }

    pub fn is(&self, kind: UserKind) -> bool {
        self.kind() == kind
    }

    /// Values that pre-fill the update form: the row without its id column.
    pub fn seed_values(&self) -> Vec<String> {
        let [_, rest @ ..] = self.to_row();
        rest.to_vec()
    }
}

impl Tabular for User {
    type Key = UserId;

    fn sort_key(&self) -> UserId {
        self.id
    }

    fn to_row(&self) -> Row {
        let (third, fourth) = match &self.role {
            UserRole::Employee { ssn, salary } => (format!("{ssn:09}"), salary.to_string()),
            UserRole::Customer { phone, address } => (phone.clone(), address.clone()),
        };
        [
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            third,
            fourth,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_employee_ssn_is_zero_padded() {
        let user = User::from_fields(UserId(2), UserKind::Employee, &fields(&["Ann", "Lee", "000123456", "52000"])).unwrap();
        assert_eq!(user.role, UserRole::Employee { ssn: 123456, salary: Decimal::from(52000) });
        assert_eq!(user.to_row(), ["2", "Ann", "Lee", "000123456", "52000"].map(String::from));
    }

    #[test]
    fn test_customer_row() {
        let user = User::from_fields(
            UserId(1),
            UserKind::Customer,
            &fields(&["Bo", "Diaz", "555-123-4567", "1 Main St"]),
        )
        .unwrap();
        assert_eq!(user.to_row()[3], "555-123-4567");
        assert_eq!(user.to_row()[4], "1 Main St");
        assert!(user.is(UserKind::Customer));
    }

    #[test]
    fn test_seed_values_rebuild_the_same_user() {
        let user = User::from_fields(UserId(7), UserKind::Employee, &fields(&["Ann", "Lee", "012345678", "41000.50"])).unwrap();
        let seed = user.seed_values();
        assert_eq!(seed, fields(&["Ann", "Lee", "012345678", "41000.50"]));
        assert!(UserKind::Employee.form("Update").validate(&seed, &StoreView::default()).is_ok());
        assert_eq!(User::from_fields(UserId(7), UserKind::Employee, &seed).unwrap(), user);
    }

    #[test]
    fn test_form_rejections() {
        let view = StoreView::default();
        let employee = UserKind::Employee.form("New Employee");
        assert_eq!(employee.labels(), vec!["First Name", "Last Name", "SSN", "Salary"]);
        assert_eq!(employee.validate(&fields(&["A", "B", "12345678", "1"]), &view).unwrap_err().label, "SSN");
        assert_eq!(employee.validate(&fields(&["A", "B", "123456789", "0"]), &view).unwrap_err().label, "Salary");
        assert_eq!(employee.validate(&fields(&["", "B", "123456789", "1"]), &view).unwrap_err().label, "First Name");

        let customer = UserKind::Customer.form("New Customer");
        assert_eq!(customer.validate(&fields(&["A", "B", "5551234567", "x"]), &view).unwrap_err().label, "Phone Number");
        assert_eq!(customer.validate(&fields(&["A", "B", "555-123-4567", ""]), &view).unwrap_err().label, "Address");
        assert!(customer.validate(&fields(&["A", "B", "555-123-4567", "x"]), &view).is_ok());
    }

    #[test]
    fn test_kind_labels_are_exact() {
        assert_eq!(UserKind::from_label("Employee"), Some(UserKind::Employee));
        assert_eq!(UserKind::from_label("customer"), None);
    }
}
