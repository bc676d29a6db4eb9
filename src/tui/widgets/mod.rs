pub mod form;

pub use form::{BuyForm, FormAction, SellForm};
