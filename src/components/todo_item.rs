//! Todo Item Component
//!
//! Individual task row: checkbox, double-click to edit, destroy button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::Task;

use crate::context::use_app_context;
use crate::store;

#[derive(Clone, Copy)]
enum EditEnd {
    Commit,
    Revert,
}

/// A single task row
#[component]
pub fn TodoItem(task: Task) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let id = StoredValue::new(task.id.clone());
    let title = task.title.clone();
    let (draft, set_draft) = signal(task.title.clone());
    let checkbox = NodeRef::<leptos::html::Input>::new();

    let is_editing = move || id.with_value(|id| store::is_editing(&store, id));
    let is_completed = move || id.with_value(|id| store::is_completed(&store, id));

    let toggle = move |_| {
        let id = id.get_value();
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            let result = vm.todo.toggle_completion(&id).await;
            ctx.report("update", result);
            ctx.publish(&vm);
            // a reverted toggle publishes an unchanged value
            if let Some(input) = checkbox.get_untracked() {
                input.set_checked(vm.todo.task(&id).is_some_and(|t| t.completed));
            }
        });
    };

    let start_edit = move |_| {
        let id = id.get_value();
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            vm.todo.edit(&id);
            set_draft.set(vm.todo.task(&id).map(|t| t.title.clone()).unwrap_or_default());
            ctx.publish(&vm);
        });
    };

    let destroy = move |_| {
        let id = id.get_value();
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            let result = vm.todo.remove(&id).await;
            ctx.report("remove", result);
            ctx.publish(&vm);
        });
    };

    let finish = move |end: EditEnd| {
        let id = id.get_value();
        let text = draft.get_untracked();
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            match end {
                // blur also fires after Escape unmounts the input
                EditEnd::Commit if vm.todo.editing() == Some(id.as_str()) => {
                    vm.todo.set_title(&id, text);
                    let result = vm.todo.done_editing(&id).await;
                    ctx.report("update", result);
                }
                EditEnd::Commit => {}
                EditEnd::Revert => vm.todo.revert_editing(&id),
            }
            ctx.publish(&vm);
        });
    };

    view! {
        <li class:completed=is_completed class:editing=is_editing>
            <div class="view">
                <input
                    node_ref=checkbox
                    class="toggle"
                    type="checkbox"
                    prop:checked=is_completed
                    on:change=toggle
                />
                <label on:dblclick=start_edit>{title}</label>
                <button class="destroy" on:click=destroy></button>
            </div>
            <Show when=is_editing>
                <input
                    class="edit"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:blur=move |_| finish(EditEnd::Commit)
                    on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => finish(EditEnd::Commit),
                        "Escape" => finish(EditEnd::Revert),
                        _ => {}
                    }
                />
            </Show>
        </li>
    }
}
