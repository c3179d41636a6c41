pub mod hero;
pub mod monster;

pub use hero::{choose_action, HeroAction};
