use itertools::Itertools;
use leptos::*;

use super::{alert, use_auth};
use crate::{
    api::{ApiErr, Project},
    forms::InviteList,
    projects::{create_with_invitations, update_from_modal, ProjectForm},
};

/// Create or edit a project from the dashboard. New projects may queue
/// collaborator invitations, which are sent once the project exists.
#[component]
pub fn ProjectModal(
    #[prop(default = None)] editing: Option<Project>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();

    let editing_id = editing.as_ref().map(|project| project.id);
    let form = create_rw_signal(editing.as_ref().map(ProjectForm::edit).unwrap_or_default());
    let invites = create_rw_signal(InviteList::default());
    let invite_input = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let saving = create_rw_signal(false);

    let options = create_local_resource(
        || (),
        move |_| async move {
            let api = auth.api();
            let classes = api.list_classes(&[]).await.unwrap_or_else(|e| {
                auth.report("Error fetching classes", &e);
                Vec::new()
            });
            let cohorts = api.list_cohorts(&[]).await.unwrap_or_else(|e| {
                auth.report("Error fetching cohorts", &e);
                Vec::new()
            });
            (classes, cohorts)
        },
    );

    let add_invite = move || {
        let input = invite_input.get_untracked();
        let mut added = Ok(false);
        invites.update(|list| added = list.add(&input));

        match added {
            Ok(true) => {
                invite_input.set(String::new());
                error.set(None);
            }
            Ok(false) => {}
            Err(e) => error.set(Some(e.user_message())),
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        saving.set(true);

        let form = form.get_untracked();
        let invites = invites.get_untracked();

        spawn_local(async move {
            let api = auth.api();

            let result = match editing_id {
                Some(id) => update_from_modal(&api, id, &form).await,
                None => create_with_invitations(&api, &form, &invites)
                    .await
                    .map(|created| {
                        let failed = created.failed_invitations().map(|o| o.email.as_str()).join(", ");
                        if !failed.is_empty() {
                            alert(&format!("Project created, but these invitations could not be sent: {failed}"));
                        }
                    }),
            };
            saving.set(false);

            match result {
                Ok(()) => on_saved.call(()),
                Err(e) => {
                    if !matches!(e, ApiErr::Validation(_)) {
                        auth.report("Error saving project", &e);
                    }
                    error.set(Some(e.message_or("Failed to save project")));
                }
            }
        });
    };

    view! {
        <div class="modal-overlay">
            <div class="modal">
                <h2>{if editing_id.is_some() { "Edit Project" } else { "Create New Project" }}</h2>

                {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

                <form on:submit=on_submit>
                    <input
                        type="text"
                        placeholder="Project name"
                        required
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />
                    <textarea
                        placeholder="Description"
                        prop:value=move || form.with(|f| f.description.clone())
                        on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                    />
                    <input
                        type="url"
                        placeholder="GitHub link"
                        prop:value=move || form.with(|f| f.github_link.clone())
                        on:input=move |ev| form.update(|f| f.github_link = event_target_value(&ev))
                    />

                    <Suspense fallback=|| view! { <p>"Loading classes..."</p> }>
                        {move || options.with(|options| options.as_ref().map(|(classes, cohorts)| view! {
                            <select on:change=move |ev| form.update(|f| f.class_id = event_target_value(&ev))>
                                <option value="">"Select a class"</option>
                                {classes.iter().map(|class| {
                                    let value = class.id.to_string();
                                    let selected = form.with_untracked(|f| f.class_id == value);
                                    view! { <option value=value selected=selected>{class.label()}</option> }
                                }).collect_view()}
                            </select>
                            <select on:change=move |ev| form.update(|f| f.cohort_id = event_target_value(&ev))>
                                <option value="">"Select a cohort"</option>
                                {cohorts.iter().map(|cohort| {
                                    let value = cohort.id.to_string();
                                    let selected = form.with_untracked(|f| f.cohort_id == value);
                                    view! { <option value=value selected=selected>{cohort.name.clone()}</option> }
                                }).collect_view()}
                            </select>
                        }))}
                    </Suspense>

                    <Show when=move || editing_id.is_none()>
                        <label>"Invite collaborators"</label>
                        <div class="invite-input">
                            <input
                                type="email"
                                placeholder="collaborator@example.com"
                                prop:value=move || invite_input.get()
                                on:input=move |ev| invite_input.set(event_target_value(&ev))
                                on:keydown=move |ev| {
                                    if ev.key() == "Enter" {
                                        ev.prevent_default();
                                        add_invite();
                                    }
                                }
                            />
                            <button type="button" on:click=move |_| add_invite()>"Add"</button>
                        </div>
                        <ul class="invite-list">
                            {move || invites.with(|list| list
                                .emails()
                                .iter()
                                .enumerate()
                                .map(|(index, email)| view! {
                                    <li>
                                        {email.clone()}
                                        <button type="button" on:click=move |_| invites.update(|list| list.remove(index))>"x"</button>
                                    </li>
                                })
                                .collect_view())}
                        </ul>
                    </Show>

                    <div class="modal-actions">
                        <button type="button" on:click=move |_| on_close.call(())>"Cancel"</button>
                        <button type="submit" disabled=move || saving.get()>
                            {move || match (saving.get(), editing_id.is_some()) {
                                (true, _) => "Saving...",
                                (false, true) => "Update Project",
                                (false, false) => "Create Project",
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
