//! Core types for Sheetstall.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartLine, MAX_QUANTITY, MIN_QUANTITY};
pub use order::{CustomerInfo, Order, OrderItem};
pub use product::Product;
