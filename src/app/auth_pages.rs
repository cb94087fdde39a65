use std::time::Duration;

use leptos::*;
use leptos_router::*;
use leptos_use::use_interval_fn;

use super::{alert, use_auth};
use crate::{
    api::{ApiErr, Credentials, Role},
    forms::SignupForm,
    guard::{landing_route, Route as AppRoute},
    session::{
        code_is_complete, sanitize_code, LoginOutcome, INITIAL_RESEND_DELAY, RESEND_COOLDOWN,
        SESSION_EXPIRED,
    },
};

const REGISTERED_FLAG: &str = "registered";

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let loading = create_rw_signal(false);

    let just_registered = move || query.with(|q| q.get(REGISTERED_FLAG).is_some());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        loading.set(true);

        let credentials = Credentials {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let navigate = navigate.clone();

        spawn_local(async move {
            let result = auth.session().login(&auth.api(), &credentials).await;
            loading.set(false);

            match result {
                Ok(LoginOutcome::RequiresTwoFactor { .. }) => {
                    auth.refresh();
                    navigate(&AppRoute::VerifyTwoFactor.path(), Default::default());
                }
                Ok(LoginOutcome::SignedIn(_)) => {
                    auth.refresh();
                    navigate(&AppRoute::Dashboard.path(), Default::default());
                }
                Err(e) => {
                    logging::error!("login failed: {e}");
                    error.set(Some(e.message_or("Invalid email or password")));
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <h2>"Login"</h2>

            <Show when=just_registered>
                <div class="notice">"Registration successful! Please login."</div>
            </Show>
            {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

            <form on:submit=on_submit>
                <input
                    type="email"
                    name="email"
                    placeholder="Enter your email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    name="password"
                    placeholder="Enter your password"
                    required
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || loading.get()>
                    {move || if loading.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>

            <p>"Don't have an account? " <A href="/signup">"Sign up"</A></p>
        </div>
    }
}

#[component]
pub fn SignUp() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let form = create_rw_signal(SignupForm::default());
    let error = create_rw_signal(None::<String>);
    let loading = create_rw_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let registration = match form.with_untracked(SignupForm::registration) {
            Ok(registration) => registration,
            Err(e) => {
                error.set(Some(e.user_message()));
                return;
            }
        };

        loading.set(true);
        let navigate = navigate.clone();

        spawn_local(async move {
            let result = auth.session().register(&auth.api(), &registration).await;
            loading.set(false);

            match result {
                Ok(_) => navigate(
                    &format!("{}?{REGISTERED_FLAG}=true", AppRoute::Login.path()),
                    Default::default(),
                ),
                Err(e) => {
                    logging::error!("registration failed: {e}");
                    error.set(Some(e.message_or("Registration failed. Please try again.")));
                }
            }
        });
    };

    view! {
        <div class="auth-page">
            <h2>"Sign Up"</h2>

            {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

            <form on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Enter your full name"
                    required
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                />
                <input
                    type="email"
                    placeholder="Enter your email"
                    required
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Enter your password"
                    required
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Confirm your password"
                    required
                    prop:value=move || form.with(|f| f.confirm_password.clone())
                    on:input=move |ev| form.update(|f| f.confirm_password = event_target_value(&ev))
                />
                <label>"Role"</label>
                <select on:change=move |ev| {
                    let role = if event_target_value(&ev) == Role::Admin.as_str() {
                        Role::Admin
                    } else {
                        Role::Student
                    };
                    form.update(|f| f.role = role);
                }>
                    <option value="Student" selected=move || form.with(|f| f.role == Role::Student)>"Student"</option>
                    <option value="Admin" selected=move || form.with(|f| f.role == Role::Admin)>"Admin"</option>
                </select>
                <button type="submit" disabled=move || loading.get()>
                    {move || if loading.get() { "Creating account..." } else { "Sign Up" }}
                </button>
            </form>

            <p>"Already have an account? " <A href="/login">"Login"</A></p>
        </div>
    }
}

#[component]
pub fn VerifyTwoFactor() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let code = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let loading = create_rw_signal(false);
    let resending = create_rw_signal(false);
    let countdown = create_rw_signal(INITIAL_RESEND_DELAY);

    use_interval_fn(
        move || {
            if countdown.get_untracked() > 0 {
                countdown.update(|seconds| *seconds -= 1);
            }
        },
        1000_u64,
    );

    let expired = {
        let navigate = navigate.clone();
        move || {
            error.set(Some(SESSION_EXPIRED.to_string()));
            let navigate = navigate.clone();
            set_timeout(
                move || navigate(&AppRoute::Login.path(), Default::default()),
                Duration::from_secs(2),
            );
        }
    };

    let on_submit = {
        let navigate = navigate.clone();
        let expired = expired.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            error.set(None);
            loading.set(true);

            let navigate = navigate.clone();
            let expired = expired.clone();
            let code = code.get_untracked();

            spawn_local(async move {
                let result = auth.session().verify_2fa(&auth.api(), &code).await;
                loading.set(false);

                match result {
                    Ok(_) => {
                        auth.refresh();
                        let landing = auth.state.with_untracked(landing_route);
                        navigate(&landing.path(), Default::default());
                    }
                    Err(ApiErr::Validation(message)) if message == SESSION_EXPIRED => expired(),
                    Err(e) => {
                        logging::error!("two-factor verification failed: {e}");
                        error.set(Some(e.message_or("Invalid 2FA code")));
                    }
                }
            });
        }
    };

    let on_resend = move |_| {
        resending.set(true);
        error.set(None);
        let expired = expired.clone();

        spawn_local(async move {
            let result = auth.session().resend_code(&auth.api()).await;
            resending.set(false);

            match result {
                Ok(()) => {
                    countdown.set(RESEND_COOLDOWN);
                    alert("A new verification code has been sent to your email.");
                }
                Err(ApiErr::Validation(message)) if message == SESSION_EXPIRED => expired(),
                Err(e) => {
                    logging::error!("resending code failed: {e}");
                    error.set(Some(e.message_or("Failed to resend code. Please try again.")));
                }
            }
        });
    };

    let back_to_login = move |_| {
        auth.logout();
        navigate(&AppRoute::Login.path(), Default::default());
    };

    let resend_label = move || {
        if resending.get() {
            "Sending...".to_string()
        } else if countdown.get() == 0 {
            "Resend Code".to_string()
        } else {
            format!("Resend Code ({}s)", countdown.get())
        }
    };

    view! {
        <div class="auth-page">
            <h2>"Two-Factor Authentication"</h2>
            <p>"Enter the 6-digit code sent to your email"</p>

            {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

            <form on:submit=on_submit>
                <label>"Verification Code"</label>
                <input
                    type="text"
                    placeholder="000000"
                    maxlength="6"
                    required
                    autofocus
                    prop:value=move || code.get()
                    on:input=move |ev| code.set(sanitize_code(&event_target_value(&ev)))
                />
                <button
                    type="submit"
                    disabled=move || loading.get() || !code.with(|c| code_is_complete(c))
                >
                    {move || if loading.get() { "Verifying..." } else { "Verify" }}
                </button>
            </form>

            <button
                class="resend"
                on:click=on_resend
                disabled=move || countdown.get() > 0 || resending.get()
            >
                {resend_label}
            </button>
            <button class="back" on:click=back_to_login>"Back to Login"</button>
        </div>
    }
}
