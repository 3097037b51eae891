//! Domain entities - Core business objects with no external dependencies

pub mod catalog;
pub mod command;
pub mod drink;
pub mod message;
pub mod user;

pub use catalog::Catalog;
pub use command::CatalogCommand;
pub use drink::{DrinkRecord, Price};
pub use message::{Content, Message};
pub use user::User;
