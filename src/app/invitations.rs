use leptos::{html::Div, *};
use leptos_router::*;
use leptos_use::on_click_outside;

use super::{alert, use_auth, AuthContext};
use crate::{
    api::{Invitation, InvitationAction},
    guard::Route as AppRoute,
    invitations::{response_message, InvitationList},
};

pub(super) fn load_invitations(auth: AuthContext, list: RwSignal<InvitationList>) {
    spawn_local(async move {
        match auth.api().pending_invitations().await {
            Ok(invitations) => list.update(|list| list.replace(invitations)),
            Err(e) => auth.report("Error fetching invitations", &e),
        }
    });
}

fn respond(
    auth: AuthContext,
    list: RwSignal<InvitationList>,
    project_id: i64,
    action: InvitationAction,
    on_responded: Callback<()>,
) {
    let mut started = false;
    list.update(|list| started = list.begin(project_id));
    if !started {
        return;
    }

    spawn_local(async move {
        match auth.api().respond_invitation(project_id, action).await {
            Ok(_) => {
                list.update(|list| list.responded(project_id));
                alert(response_message(action));
                on_responded.call(());
            }
            Err(e) => {
                list.update(InvitationList::failed);
                auth.report("Error responding to invitation", &e);
                alert(&e.message_or("Failed to respond to invitation"));
            }
        }
    });
}

#[component]
fn InvitationItem(
    invitation: Invitation,
    list: RwSignal<InvitationList>,
    on_responded: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let project_id = invitation.project_id;
    let busy = move || list.with(|list| list.is_processing(project_id));

    view! {
        <div class="invitation">
            <h4>{invitation.project_name}</h4>
            {invitation.project_description.map(|d| view! { <p>{d}</p> })}
            <span class="invited-by">"Invited by " {invitation.owner_name}</span>
            <div class="invitation-actions">
                <button
                    class="accept"
                    disabled=busy
                    on:click=move |_| respond(auth, list, project_id, InvitationAction::Accept, on_responded)
                >
                    "Accept"
                </button>
                <button
                    class="decline"
                    disabled=busy
                    on:click=move |_| respond(auth, list, project_id, InvitationAction::Decline, on_responded)
                >
                    "Decline"
                </button>
            </div>
        </div>
    }
}

/// Bell icon with a dropdown of pending invitations.
#[component]
pub fn InvitationNotification(
    list: RwSignal<InvitationList>,
    #[prop(into)] on_responded: Callback<()>,
) -> impl IntoView {
    let dropdown = create_node_ref::<Div>();

    let _ = on_click_outside(dropdown, move |_| {
        if list.with_untracked(InvitationList::is_open) {
            list.update(InvitationList::close);
        }
    });

    view! {
        <div class="notification" node_ref=dropdown>
            <button class="bell" on:click=move |_| list.update(InvitationList::toggle)>
                "🔔"
                <Show when=move || !list.with(InvitationList::is_empty)>
                    <span class="badge">{move || list.with(InvitationList::len)}</span>
                </Show>
            </button>

            <Show when=move || list.with(InvitationList::is_open)>
                <div class="dropdown">
                    <h3>"Project Invitations"</h3>
                    {move || {
                        let invitations = list.with(|list| list.invitations().to_vec());
                        if invitations.is_empty() {
                            view! { <p class="empty">"No pending invitations"</p> }.into_view()
                        } else {
                            invitations
                                .into_iter()
                                .map(|invitation| view! { <InvitationItem invitation list on_responded/> })
                                .collect_view()
                        }
                    }}
                </div>
            </Show>
        </div>
    }
}

/// Dashboard panel listing the same invitations as the bell.
#[component]
pub fn PendingInvitations(
    list: RwSignal<InvitationList>,
    #[prop(into)] on_responded: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || !list.with(InvitationList::is_empty)>
            <section class="pending-invitations">
                <h2>"Pending Invitations"</h2>
                {move || list
                    .with(|list| list.invitations().to_vec())
                    .into_iter()
                    .map(|invitation| view! { <InvitationItem invitation list on_responded/> })
                    .collect_view()}
            </section>
        </Show>
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Response {
    Working,
    Done(&'static str),
    Failed(String),
    Invalid,
}

/// Landing page for the links in invitation emails. Responds as soon as the
/// visitor is signed in.
#[component]
pub fn InvitationResponse() -> impl IntoView {
    let auth = use_auth();
    let params = use_params_map();

    let target = create_memo(move |_| {
        params.with(|p| {
            let project_id = p.get("project_id")?.parse::<i64>().ok()?;
            let action = p.get("action")?.parse::<InvitationAction>().ok()?;
            Some((project_id, action))
        })
    });

    let signed_in = move || auth.state.with(|state| state.user().is_some());
    let response = create_rw_signal(Response::Working);

    // Responds at most once, the first time the visitor is signed in.
    create_effect(move |sent: Option<bool>| {
        if sent == Some(true) || !signed_in() {
            return sent.unwrap_or(false);
        }

        let Some((project_id, action)) = target.get_untracked() else {
            response.set(Response::Invalid);
            return true;
        };

        spawn_local(async move {
            match auth.api().respond_invitation(project_id, action).await {
                Ok(_) => response.set(Response::Done(response_message(action))),
                Err(e) => {
                    auth.report("Error responding to invitation", &e);
                    response.set(Response::Failed(e.message_or("Failed to respond to invitation")));
                }
            }
        });

        true
    });

    view! {
        <div class="invitation-response">
            <h2>"Project Invitation"</h2>
            <Show
                when=signed_in
                fallback=|| view! {
                    <p>"Please log in to respond to this invitation."</p>
                    <A href=AppRoute::Login.path()>"Login"</A>
                }
            >
                {move || match response.get() {
                    Response::Working => view! { <p>"Processing your response..."</p> }.into_view(),
                    Response::Done(message) => view! { <p class="success">{message}</p> }.into_view(),
                    Response::Failed(message) => view! { <p class="error">{message}</p> }.into_view(),
                    Response::Invalid => view! { <p class="error">"This invitation link is not valid."</p> }.into_view(),
                }}
                <A href=AppRoute::Dashboard.path()>"Go to Dashboard"</A>
            </Show>
        </div>
    }
}
