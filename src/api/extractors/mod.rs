pub mod authorized;
pub mod drink_id;
pub mod valid_json;

pub use authorized::Authorized;
pub use drink_id::DrinkId;
pub use valid_json::{Combinator, JsonKeys, ValidJson};
