pub mod drink_memory;
pub mod drink_pg;
pub mod drink_repo;
pub mod error;

pub use drink_memory::MemoryDrinkStore;
pub use drink_pg::PgDrinkStore;
pub use drink_repo::{Drink, DrinkStore, Ingredient, NewDrink};
