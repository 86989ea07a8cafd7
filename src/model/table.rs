//! Header and row projections for the four table kinds the UI shows.

use serde::Serialize;

use crate::framework::{Row, Tabular};
use crate::model::{Item, Transaction, User, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKind {
    Items,
    Users,
    Transactions,
    Search,
}

impl TableKind {
    pub fn headers(self) -> [&'static str; 5] {
        match self {
            Self::Items | Self::Search => ["ID", "Name", "Quantity", "Price", "Other Info"],
            Self::Users => ["ID", "First Name", "Last Name", "Phone #/SSN", "Address/Salary"],
            Self::Transactions => ["Item ID", "Sale Date", "Quantity", "Customer ID", "Employee ID"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub kind: TableKind,
    pub headers: [&'static str; 5],
    pub rows: Vec<Row>,
}

impl Table {
    fn new(kind: TableKind, rows: Vec<Row>) -> Self {
        Self {
            kind,
            headers: kind.headers(),
            rows,
        }
    }

    /// Items ordered by id.
    pub fn items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        Self::new(TableKind::Items, sorted_rows(items))
    }

    /// Items whose name contains `term`, ignoring case, ordered by id.
    pub fn search<'a>(items: impl IntoIterator<Item = &'a Item>, term: &str) -> Self {
        let matching = items.into_iter().filter(|item| item.name_contains(term));
        Self::new(TableKind::Search, sorted_rows(matching))
    }

    /// Users ordered by id. The salary column gets a `$` prefix here.
    pub fn users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        let mut users: Vec<&User> = users.into_iter().collect();
        users.sort_by_key(|user| user.sort_key());
        let rows = users
            .into_iter()
            .map(|user| {
                let mut row = user.to_row();
                if matches!(user.role, UserRole::Employee { .. }) {
                    row[4] = format!("${}", row[4]);
                }
                row
            })
            .collect();
        Self::new(TableKind::Users, rows)
    }

    /// Transactions in commit order.
    pub fn transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        Self::new(TableKind::Transactions, transactions.into_iter().map(Tabular::to_row).collect())
    }
}

fn sorted_rows<'a, T: Tabular + 'a>(entities: impl IntoIterator<Item = &'a T>) -> Vec<Row> {
    let mut entities: Vec<&T> = entities.into_iter().collect();
    entities.sort_by_key(|entity| entity.sort_key());
    entities.into_iter().map(Tabular::to_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, UserId, UserKind};

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn item(id: &str, name: &str) -> Item {
        Item::from_fields(ItemKind::Hardware, &fields(&[id, name, "1", "1", "Other"])).unwrap()
    }

    #[test]
    fn test_items_sorted_by_id() {
        let items = vec![item("ZZZ01", "Saw"), item("AAA01", "Awl"), item("MMM01", "Mallet")];
        let table = Table::items(&items);
        let ids: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(ids, vec!["AAA01", "MMM01", "ZZZ01"]);
        assert_eq!(table.headers[4], "Other Info");
    }

    #[test]
    fn test_search_filters_and_orders() {
        let items = vec![item("BBB01", "Claw Hammer"), item("AAA01", "Sledge HAMMER"), item("CCC01", "Saw")];
        let table = Table::search(&items, "hammer");
        assert_eq!(table.kind, TableKind::Search);
        let ids: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(ids, vec!["AAA01", "BBB01"]);
    }

    #[test]
    fn test_users_table_prefixes_salary() {
        let users = vec![
            User::from_fields(UserId(2), UserKind::Employee, &fields(&["Ann", "Lee", "123456789", "52000"])).unwrap(),
            User::from_fields(UserId(1), UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main"])).unwrap(),
        ];
        let table = Table::users(&users);
        assert_eq!(table.rows[0][0], "1");
        assert_eq!(table.rows[0][4], "1 Main");
        assert_eq!(table.rows[1][4], "$52000");
        assert_eq!(table.headers, ["ID", "First Name", "Last Name", "Phone #/SSN", "Address/Salary"]);
    }
}
