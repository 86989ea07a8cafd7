//! The store's collections and every mutation allowed on them.
//!
//! Only the [`StoreActor`](crate::store_actor::StoreActor) owns a live `Store`; everything
//! else sees copies ([`StoreView`], [`Table`]) handed out by the actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::framework::Labeled;
use crate::model::{
    Item, ItemId, StoreView, Table, TableKind, Transaction, TransactionDraft, User, UserId, UserKind,
};
use crate::store_actor::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    items: Vec<Item>,
    users: Vec<User>,
    transactions: Vec<Transaction>,
    /// The id the next created user receives.
    next_user_id: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            users: Vec::new(),
            transactions: Vec::new(),
            next_user_id: 1,
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn next_user_id(&self) -> UserId {
        UserId(self.next_user_id)
    }

    pub fn view(&self) -> StoreView {
        StoreView {
            items: self.items.clone(),
            users: self.users.clone(),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Appends an item. Ids are not checked for duplicates.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
        self.items.sort_by(|a, b| a.id.cmp(&b.id));
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Result<Item, StoreError> {
        let position = self
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| StoreError::ItemNotFound(id.to_string()))?;
        Ok(self.items.remove(position))
    }

    /// Adds stock and returns the new quantity.
    pub fn increase_quantity(&mut self, id: &ItemId, delta: u32) -> Result<u32, StoreError> {
        if delta == 0 {
            return Err(StoreError::InvalidQuantity(delta));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StoreError::ItemNotFound(id.to_string()))?;
        item.quantity = item
            .quantity
            .checked_add(delta)
            .ok_or_else(|| StoreError::QuantityOverflow(id.to_string()))?;
        Ok(item.quantity)
    }

    /// Allocates the next user id ahead of the create form.
    pub fn reserve_user_id(&mut self) -> Result<UserId, StoreError> {
        let id = UserId(self.next_user_id);
        self.next_user_id = self
            .next_user_id
            .checked_add(1)
            .ok_or(StoreError::UserIdsExhausted)?;
        Ok(id)
    }

    /// Hands back a reserved id. Only the most recent reservation can be released.
    pub fn release_user_id(&mut self, id: UserId) -> bool {
        if id.0.checked_add(1) == Some(self.next_user_id) && self.user(id).is_none() {
            self.next_user_id = id.0;
            true
        } else {
            false
        }
    }

    /// Inserts a user, keeping the counter above every stored id. A user holding the
    /// largest id leaves the counter there, and further reservations fail.
    pub fn add_user(&mut self, user: User) {
        if user.id.0 >= self.next_user_id {
            self.next_user_id = user.id.0.saturating_add(1);
        }
        self.users.push(user);
        self.users.sort_by_key(|user| user.id);
    }

    /// Swaps the record with `id` for one built from `fields`, keeping the id and variant.
    pub fn replace_user(&mut self, id: UserId, kind: UserKind, fields: &[String]) -> Result<User, StoreError> {
        let position = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::UserNotFound(id))?;
        if !self.users[position].is(kind) {
            return Err(StoreError::WrongUserKind {
                id,
                expected: kind.label(),
            });
        }
        let replacement = User::from_fields(id, kind, fields)?;
        self.users.remove(position);
        self.users.push(replacement.clone());
        self.users.sort_by_key(|user| user.id);
        Ok(replacement)
    }

    /// Checks references and stock, takes the sold units out of stock and records the sale.
    pub fn commit_transaction(&mut self, draft: TransactionDraft, at: DateTime<Utc>) -> Result<Transaction, StoreError> {
        self.require_user(draft.customer_id, UserKind::Customer)?;
        self.require_user(draft.employee_id, UserKind::Employee)?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == draft.item_id)
            .ok_or_else(|| StoreError::ItemNotFound(draft.item_id.to_string()))?;
        if draft.quantity == 0 {
            return Err(StoreError::InvalidQuantity(0));
        }
        if draft.quantity > item.quantity {
            return Err(StoreError::InsufficientStock {
                item: item.id.to_string(),
                requested: draft.quantity,
                available: item.quantity,
            });
        }
        item.quantity -= draft.quantity;

        let transaction = draft.commit(at);
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn require_user(&self, id: UserId, kind: UserKind) -> Result<(), StoreError> {
        match self.user(id) {
            Some(user) if user.is(kind) => Ok(()),
            Some(_) => Err(StoreError::WrongUserKind {
                id,
                expected: kind.label(),
            }),
            None => Err(StoreError::UserNotFound(id)),
        }
    }

    /// Items whose name contains `term` (case-insensitive), ordered by id.
    pub fn search(&self, term: &str) -> Vec<Item> {
        let mut found: Vec<Item> = self
            .items
            .iter()
            .filter(|item| item.name_contains(term))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Header and rows for one table. `term` only applies to [`TableKind::Search`].
    pub fn project(&self, kind: TableKind, term: &str) -> Table {
        match kind {
            TableKind::Items => Table::items(&self.items),
            TableKind::Users => Table::users(&self.users),
            TableKind::Transactions => Table::transactions(&self.transactions),
            TableKind::Search => Table::search(&self.items, term),
        }
    }

    /// Fixes up a freshly loaded store. Returns the number of transactions whose
    /// item or users could not be resolved; those are kept as they are.
    ///
    /// A user holding the largest representable id leaves no room for the counter and
    /// is refused with [`StoreError::UserIdsExhausted`].
    pub fn repair(&mut self) -> Result<usize, StoreError> {
        self.items.sort_by(|a, b| a.id.cmp(&b.id));
        self.users.sort_by_key(|user| user.id);

        let floor = match self.users.last() {
            Some(user) => user.id.0.checked_add(1).ok_or(StoreError::UserIdsExhausted)?,
            None => 1,
        };
        if self.next_user_id < floor {
            warn!(stored = self.next_user_id, raised_to = floor, "User id counter behind loaded users");
            self.next_user_id = floor;
        }

        let mut unresolved = 0;
        for transaction in &self.transactions {
            let item_known = self.items.iter().any(|item| item.id == transaction.item_id);
            let customer_known = self.user(transaction.customer_id).is_some_and(|u| u.is(UserKind::Customer));
            let employee_known = self.user(transaction.employee_id).is_some_and(|u| u.is(UserKind::Employee));
            if !(item_known && customer_known && employee_known) {
                warn!(
                    item = %transaction.item_id,
                    customer = %transaction.customer_id,
                    employee = %transaction.employee_id,
                    item_known,
                    customer_known,
                    employee_known,
                    "Transaction references unresolved record"
                );
                unresolved += 1;
            }
        }

        info!(
            items = self.items.len(),
            users = self.users.len(),
            transactions = self.transactions.len(),
            unresolved,
            "Store loaded"
        );
        Ok(unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Tabular;
    use crate::model::ItemKind;
    use chrono::TimeZone;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn drill() -> Item {
        Item::from_fields(ItemKind::Hardware, &fields(&["A1B2C", "Drill", "10", "49.99", "Other"])).unwrap()
    }

    fn stocked_store() -> Store {
        let mut store = Store::new();
        store.add_item(drill());
        let customer = store.reserve_user_id().unwrap();
        store.add_user(User::from_fields(customer, UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main"])).unwrap());
        let employee = store.reserve_user_id().unwrap();
        store.add_user(User::from_fields(employee, UserKind::Employee, &fields(&["Ann", "Lee", "123456789", "52000"])).unwrap());
        store
    }

    fn draft(quantity: &str, customer: &str, employee: &str) -> TransactionDraft {
        TransactionDraft::from_fields(&fields(&["a1b2c", quantity, customer, employee])).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_commit_decrements_stock() {
        let mut store = stocked_store();
        let sale = store.commit_transaction(draft("3", "1", "2"), noon()).unwrap();
        assert_eq!(sale.quantity, 3);
        assert_eq!(store.items()[0].quantity, 7);
        assert_eq!(store.transactions().len(), 1);
    }

    #[test]
    fn test_over_stock_commit_changes_nothing() {
        let mut store = stocked_store();
        let before = store.clone();
        let err = store.commit_transaction(draft("11", "1", "2"), noon()).unwrap_err();
        assert_eq!(
            err,
            StoreError::InsufficientStock {
                item: "A1B2C".into(),
                requested: 11,
                available: 10
            }
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_commit_checks_user_roles() {
        let mut store = stocked_store();
        let err = store.commit_transaction(draft("1", "2", "1"), noon()).unwrap_err();
        assert_eq!(err, StoreError::WrongUserKind { id: UserId(2), expected: "Customer" });
        let err = store.commit_transaction(draft("1", "1", "9"), noon()).unwrap_err();
        assert_eq!(err, StoreError::UserNotFound(UserId(9)));
        assert_eq!(store.items()[0].quantity, 10);
    }

    #[test]
    fn test_reserve_and_release_user_id() {
        let mut store = Store::new();
        assert_eq!(store.reserve_user_id(), Ok(UserId(1)));
        let second = store.reserve_user_id().unwrap();
        assert_eq!(store.next_user_id(), UserId(3));

        assert!(store.release_user_id(second));
        assert_eq!(store.next_user_id(), UserId(2));
        // Stale release is refused.
        assert!(!store.release_user_id(UserId(5)));
        assert_eq!(store.next_user_id(), UserId(2));
    }

    #[test]
    fn test_replace_user_keeps_id_and_order() {
        let mut store = stocked_store();
        let updated = store
            .replace_user(UserId(1), UserKind::Customer, &fields(&["Bo", "Diaz", "555-000-0000", "2 Elm"]))
            .unwrap();
        assert_eq!(updated.id, UserId(1));
        assert_eq!(store.users()[0].id, UserId(1));
        assert_eq!(store.users()[0].to_row()[4], "2 Elm");
        assert_eq!(store.users().len(), 2);

        let err = store
            .replace_user(UserId(1), UserKind::Employee, &fields(&["A", "B", "123456789", "1"]))
            .unwrap_err();
        assert_eq!(err, StoreError::WrongUserKind { id: UserId(1), expected: "Employee" });
    }

    #[test]
    fn test_increase_and_remove_item() {
        let mut store = stocked_store();
        let id = ItemId::parse("a1b2c").unwrap();
        assert_eq!(store.increase_quantity(&id, 5).unwrap(), 15);
        assert_eq!(store.increase_quantity(&id, 0).unwrap_err(), StoreError::InvalidQuantity(0));

        let removed = store.remove_item(&id).unwrap();
        assert_eq!(removed.name, "Drill");
        assert!(store.items().is_empty());
        assert_eq!(store.remove_item(&id).unwrap_err(), StoreError::ItemNotFound("A1B2C".into()));
    }

    #[test]
    fn test_repair_raises_counter_and_counts_dangling_sales() {
        let mut store = stocked_store();
        store.commit_transaction(draft("1", "1", "2"), noon()).unwrap();
        store.remove_item(&ItemId::parse("A1B2C").unwrap()).unwrap();
        store.next_user_id = 1;

        assert_eq!(store.repair(), Ok(1));
        assert_eq!(store.next_user_id(), UserId(3));
        assert_eq!(store.transactions().len(), 1);
    }

    #[test]
    fn test_counter_stops_at_largest_id() {
        let mut store = Store::new();
        store.add_user(User::from_fields(UserId(u32::MAX), UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main"])).unwrap());
        assert_eq!(store.next_user_id(), UserId(u32::MAX));
        assert_eq!(store.reserve_user_id(), Err(StoreError::UserIdsExhausted));
        assert_eq!(store.next_user_id(), UserId(u32::MAX));
        assert!(!store.release_user_id(UserId(u32::MAX)));
        assert_eq!(store.repair(), Err(StoreError::UserIdsExhausted));
    }
}
