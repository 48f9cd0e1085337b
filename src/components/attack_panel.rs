//! Attack Panel Component
//!
//! Controls for the attack simulation: forged identity, owner stripping,
//! credential withdrawal, attack / reset.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::{AttackController, AttackMode};

use crate::context::{use_app_context, AppContext};
use crate::store;

/// Apply a setting change to the attack controller and republish
fn adjust(ctx: AppContext, change: impl FnOnce(&mut AttackController) + 'static) {
    spawn_local(async move {
        let handle = ctx.view_model();
        let mut vm = handle.lock().await;
        if let Some(attack) = vm.attack.as_mut() {
            change(attack);
        }
        ctx.publish(&vm);
    });
}

#[component]
pub fn AttackPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let settings = move || store::attack(&store).map(|a| a.settings);
    let attacking = move || store::attack(&store).is_some_and(|a| a.mode == AttackMode::Attacking);

    let attack = move |_| {
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut guard = handle.lock().await;
            let vm = &mut *guard;
            if let Some(attack) = vm.attack.as_mut() {
                let result = attack.attack(&mut vm.todo).await;
                ctx.report("attack", result);
            }
            ctx.publish(vm);
        });
    };

    let reset = move |_| {
        spawn_local(async move {
            let handle = ctx.view_model();
            let mut guard = handle.lock().await;
            let vm = &mut *guard;
            if let Some(attack) = vm.attack.as_mut() {
                let result = attack.reset(&mut vm.todo).await;
                ctx.report("reset", result);
            }
            ctx.publish(vm);
        });
    };

    view! {
        <aside class="attack-panel" class:attacking=attacking>
            <h2>"Attack simulation"</h2>
            <label>
                "Act as user "
                <input
                    type="text"
                    prop:value=move || settings().map(|s| s.username).unwrap_or_default()
                    on:change=move |ev| {
                        let username = event_target_value(&ev);
                        adjust(ctx, move |attack| attack.set_username(username));
                    }
                />
            </label>
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || settings().is_some_and(|s| s.show_all)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        adjust(ctx, move |attack| attack.set_show_all(checked));
                    }
                />
                "Show all users' tasks"
            </label>
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || settings().is_some_and(|s| s.use_changed_user_on_update)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        adjust(ctx, move |attack| attack.set_use_changed_user_on_update(checked));
                    }
                />
                "Change owner on update"
            </label>
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || settings().is_some_and(|s| s.authorization)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        adjust(ctx, move |attack| attack.set_authorization(checked));
                    }
                />
                "Send credential"
            </label>
            <div class="attack-actions">
                <button on:click=attack>"Attack"</button>
                <button on:click=reset>"Reset"</button>
            </div>
        </aside>
    }
}
