//! Domain models for storefront-service.

mod cart;
mod charge;
mod line_item;
mod notification;
mod order;
mod product;

pub use cart::CartItem;
pub use charge::{AdditionalCharge, NewCharge};
pub use line_item::{LineItem, NewLineItem};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use order::{CreateOrder, Order, OrderFilter, OrderStatus, PaymentStatus};
pub use product::{CreateProduct, Product, ProductFilter, UpdateProduct};
