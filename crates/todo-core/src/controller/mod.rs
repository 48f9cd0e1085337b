//! Controllers
//!
//! View-model for the task list and the attack simulation around it.

mod attack;
mod todo;

#[cfg(test)]
mod tests;

pub use attack::{AttackController, AttackMode, AttackSettings, AttackStorage};
pub use todo::TodoController;
