use thiserror::Error;

use crate::model::{EntityError, UserId};

/// Errors returned by store operations and the store actor's channels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("User {id} is not a {expected}")]
    WrongUserKind { id: UserId, expected: &'static str },
    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Quantity overflow for {0}")]
    QuantityOverflow(String),
    #[error("No user ids left to assign")]
    UserIdsExhausted,
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
}
