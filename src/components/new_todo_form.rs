//! New Todo Form Component
//!
//! Input for creating tasks owned by the viewer.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;

#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();

    let (new_text, set_new_text) = signal(String::new());

    let create_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get();

        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            vm.todo.set_new_title(text);
            let result = vm.todo.add_pending().await;
            if result.is_ok() {
                set_new_text.set(vm.todo.new_title().to_string());
            }
            ctx.report("add", result);
            ctx.publish(&vm);
        });
    };

    view! {
        <form class="new-todo-form" on:submit=create_todo>
            <input
                class="new-todo"
                type="text"
                placeholder="What needs to be done?"
                autofocus
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
        </form>
    }
}
