//! UI Components
//!
//! Leptos components bound to the view-model store.

mod attack_panel;
mod new_todo_form;
mod todo_footer;
mod todo_item;
mod todo_list;

pub use attack_panel::AttackPanel;
pub use new_todo_form::NewTodoForm;
pub use todo_footer::TodoFooter;
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
