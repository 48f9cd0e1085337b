//! Todo List Component
//!
//! Toggle-all checkbox plus one row per visible task.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::Task;

use crate::components::TodoItem;
use crate::context::use_app_context;
use crate::store;

#[component]
pub fn TodoList() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let toggle_all = move |_| {
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            let failed = vm.todo.toggle_all().await;
            if failed > 0 {
                log::warn!("{} task(s) could not be updated", failed);
            }
            ctx.publish(&vm);
        });
    };

    view! {
        <section class="main">
            <input
                id="toggle-all"
                class="toggle-all"
                type="checkbox"
                prop:checked=move || store::stats(&store).all_checked
                on:change=toggle_all
            />
            <label for="toggle-all">"Mark all as complete"</label>
            <ul class="todo-list">
                <For
                    each=move || store::todos(&store)
                    key=|task: &Task| (task.id.clone(), task.title.clone(), task.completed, task.owner.clone())
                    children=move |task: Task| view! { <TodoItem task=task /> }
                />
            </ul>
        </section>
    }
}
