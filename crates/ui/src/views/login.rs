use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{AuthMode, CONFIRM_EMAIL_NOTICE, auth_error_message};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Submitting,
    Failed(String),
    AwaitingConfirmation,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let nav = use_navigator();
    let auth = ctx.auth();
    let hint = ctx.login_hint().map(str::to_owned);

    let mut mode = use_signal(AuthMode::default);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submit_state = use_signal(|| SubmitState::Idle);

    let on_submit = use_callback(move |()| {
        if submit_state() == SubmitState::Submitting {
            return;
        }
        let auth = auth.clone();
        let current_mode = mode();
        let (name_value, email_value, password_value) = (name(), email(), password());
        let mut submit_state = submit_state;
        let mut password = password;
        let mut mode = mode;
        spawn(async move {
            submit_state.set(SubmitState::Submitting);
            let result = match current_mode {
                AuthMode::SignIn => auth
                    .sign_in(&email_value, &password_value)
                    .await
                    .map(|_| true),
                AuthMode::SignUp => auth
                    .sign_up(&email_value, &password_value, &name_value)
                    .await
                    .map(|registration| registration.session.is_some()),
            };
            match result {
                Ok(true) => {
                    submit_state.set(SubmitState::Idle);
                    nav.replace(Route::Dashboard {});
                }
                Ok(false) => {
                    password.set(String::new());
                    mode.set(AuthMode::SignIn);
                    submit_state.set(SubmitState::AwaitingConfirmation);
                }
                Err(err) => {
                    log::debug!("{current_mode:?} failed: {err}");
                    submit_state.set(SubmitState::Failed(auth_error_message(&err)));
                }
            }
        });
    });

    let current_mode = mode();
    let busy = submit_state() == SubmitState::Submitting;
    let (switch_prompt, switch_label) = current_mode.switch_prompt();

    rsx! {
        div { class: "login-page",
            header { class: "site-header",
                Link { class: "brand", to: Route::Landing {}, "CineStream" }
            }
            div { class: "login-card",
                h2 { "{current_mode.title()}" }
                match submit_state() {
                    SubmitState::Failed(message) => rsx! {
                        p { class: "form-error", role: "alert", "{message}" }
                    },
                    SubmitState::AwaitingConfirmation => rsx! {
                        p { class: "form-notice", "{CONFIRM_EMAIL_NOTICE}" }
                    },
                    SubmitState::Idle | SubmitState::Submitting => rsx! {},
                }
                form {
                    class: "login-form",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        on_submit.call(());
                    },
                    if current_mode == AuthMode::SignUp {
                        input {
                            class: "input",
                            r#type: "text",
                            placeholder: "Name",
                            autocomplete: "name",
                            value: "{name}",
                            oninput: move |evt| name.set(evt.value()),
                        }
                    }
                    input {
                        class: "input",
                        r#type: "email",
                        placeholder: "Email",
                        autocomplete: "email",
                        required: true,
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                    input {
                        class: "input",
                        r#type: "password",
                        placeholder: "Password",
                        autocomplete: if current_mode == AuthMode::SignUp { "new-password" } else { "current-password" },
                        required: true,
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        class: "btn btn-primary btn-block",
                        r#type: "submit",
                        disabled: busy,
                        "{current_mode.submit_label(busy)}"
                    }
                }
                p { class: "login-switch",
                    span { "{switch_prompt} " }
                    button {
                        class: "btn-link",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| {
                            mode.set(mode().toggled());
                            submit_state.set(SubmitState::Idle);
                        },
                        "{switch_label}"
                    }
                }
                if let Some(hint) = hint {
                    p { class: "login-hint", "{hint}" }
                }
            }
        }
    }
}
