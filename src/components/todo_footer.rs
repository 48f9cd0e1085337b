//! Todo Footer Component
//!
//! Remaining count, route filters and the clear-completed button.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::Route;

use crate::context::use_app_context;
use crate::store;

const FILTERS: &[(Route, &str)] = &[
    (Route::All, "All"),
    (Route::Active, "Active"),
    (Route::Completed, "Completed"),
];

#[component]
pub fn TodoFooter() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let clear_completed = move |_| {
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            let result = vm.todo.clear_completed().await;
            ctx.report("clear completed", result);
            ctx.publish(&vm);
        });
    };

    view! {
        <footer class="footer">
            <span class="todo-count">
                {move || {
                    let remaining = store::stats(&store).remaining;
                    let noun = if remaining == 1 { "item" } else { "items" };
                    format!("{} {} left", remaining, noun)
                }}
            </span>
            <ul class="filters">
                {FILTERS.iter().map(|(route, label)| {
                    let route = *route;
                    view! {
                        <li>
                            <a
                                href=format!("#{}", route.path())
                                class:selected=move || store::route(&store) == route
                            >
                                {*label}
                            </a>
                        </li>
                    }
                }).collect_view()}
            </ul>
            <Show when=move || { store::stats(&store).completed > 0 }>
                <button class="clear-completed" on:click=clear_completed>
                    "Clear completed"
                </button>
            </Show>
        </footer>
    }
}
