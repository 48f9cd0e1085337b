//! Secured TodoMVC App
//!
//! Wires the browser collaborators into the view-model and lays out the page.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use todo_core::{
    build_storage, AppConfig, AttackController, Credential, Location, Session, TodoController,
};

use crate::browser::{read_browser_auth, HashLocation};
use crate::components::{AttackPanel, NewTodoForm, TodoFooter, TodoList};
use crate::context::{AppContext, ViewModel};
use crate::store::{self, AppState};

fn load_config() -> AppConfig {
    AppConfig::from_json(include_str!("../app-config.json")).unwrap_or_else(|e| {
        log::error!("{}; using defaults", e);
        AppConfig::default()
    })
}

fn build_view_model(config: &AppConfig) -> ViewModel {
    let auth = read_browser_auth();
    let credential = Credential::new(auth.token);
    let session: Rc<dyn Session> = Rc::new(auth.session);
    let storage = build_storage(&config.storage, credential.clone());

    let todo = TodoController::new(storage, Rc::new(HashLocation), Rc::clone(&session))
        .with_auth(config.auth.clone());
    let attack = config
        .attack
        .enabled
        .then(|| AttackController::with_auth(session, credential, config.auth.clone()));

    ViewModel { todo, attack }
}

#[component]
pub fn App() -> impl IntoView {
    let config = load_config();
    HashLocation::ensure_root();

    let ctx = AppContext::new(build_view_model(&config), Store::new(AppState::default()));
    provide_context(ctx);
    let store = ctx.store;

    // Initial load
    spawn_local(async move {
        let handle = ctx.view_model();
        let mut vm = handle.lock().await;
        let result = vm.todo.refresh().await;
        ctx.report("load", result);
        ctx.publish(&vm);
    });

    // Reload when the fragment route changes
    let _ = window_event_listener(leptos::ev::hashchange, move |_| {
        let path = HashLocation.current_path();
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut vm = handle.lock().await;
            let result = vm.todo.on_path_changed(&path).await;
            ctx.report("route change", result);
            ctx.publish(&vm);
        });
    });

    view! {
        <section class="todoapp">
            <header class="header">
                <h1>"todos"</h1>
                <p class="user-label">{move || store::user_label(&store)}</p>
                <NewTodoForm />
            </header>

            {move || store::last_error(&store).map(|message| view! {
                <p class="error-banner">{message}</p>
            })}

            <Show when=move || !store::todos(&store).is_empty()>
                <TodoList />
                <TodoFooter />
            </Show>
        </section>

        <Show when=move || store::attack(&store).is_some()>
            <AttackPanel />
        </Show>
    }
}
