use leptos::*;
use leptos_router::*;

use super::{project_details::route_id, use_auth};
use crate::{
    api::{Class, Cohort},
    guard::Route as AppRoute,
    kanban::Permissions,
    projects::ProjectForm,
};

/// Full-page project editor. Only the owner or an admin gets the form;
/// anyone else is sent back to the project page.
#[component]
pub fn EditProject() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let project_id = route_id();

    let form = create_rw_signal(ProjectForm::default());
    let member_names = create_rw_signal(Vec::<String>::new());
    let new_member = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let saving = create_rw_signal(false);
    let ready = create_rw_signal(false);

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

    create_effect({
        let navigate = navigate.clone();
        move |_| {
            let Some(id) = project_id.get() else {
                return;
            };
            let navigate = navigate.clone();

            spawn_local(async move {
                match auth.api().get_project(id).await {
                    Ok(project) => {
                        let allowed = Permissions::for_project(auth.user().as_ref(), &project).can_edit;
                        if !allowed {
                            navigate(&AppRoute::Project(id).path(), Default::default());
                            return;
                        }

                        form.set(ProjectForm::edit(&project));
                        member_names.set(Vec::new());
                        ready.set(true);
                    }
                    Err(e) => {
                        auth.report("Error fetching project", &e);
                        error.set(Some(e.message_or("Failed to load project")));
                    }
                }
            });
        }
    });

    let add_member = move |_| {
        let name = new_member.get_untracked().trim().to_string();
        if name.is_empty() {
            return;
        }
        member_names.update(|names| names.push(name));
        new_member.set(String::new());
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let Some(id) = project_id.get_untracked() else {
            return;
        };

        let payload = match member_names.with_untracked(|names| form.with_untracked(|f| f.edit_payload(names))) {
            Ok(payload) => payload,
            Err(e) => {
                error.set(Some(e.user_message()));
                return;
            }
        };

        saving.set(true);
        let navigate = navigate.clone();

        spawn_local(async move {
            let result = auth.api().update_project(id, &payload).await;
            saving.set(false);

            match result {
                Ok(_) => navigate(&AppRoute::Project(id).path(), Default::default()),
                Err(e) => {
                    auth.report("Error updating project", &e);
                    error.set(Some(e.message_or("Failed to update project")));
                }
            }
        });
    };

    let class_options = move |classes: &[Class]| {
        classes
            .iter()
            .map(|class| {
                let value = class.id.to_string();
                let selected = {
                    let value = value.clone();
                    move || form.with(|f| f.class_id == value)
                };
                view! { <option value=value selected=selected>{class.label()}</option> }
            })
            .collect_view()
    };

    let cohort_options = move |cohorts: &[Cohort]| {
        cohorts
            .iter()
            .map(|cohort| {
                let value = cohort.id.to_string();
                let selected = {
                    let value = value.clone();
                    move || form.with(|f| f.cohort_id == value)
                };
                view! { <option value=value selected=selected>{cohort.name.clone()}</option> }
            })
            .collect_view()
    };

    view! {
        <div class="edit-project">
            <h1>"Edit Project"</h1>

            {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

            <Show when=move || ready.get() fallback=|| view! { <p>"Loading..."</p> }>
                <form on:submit=on_submit.clone()>
                    <label>"Project Name"</label>
                    <input
                        type="text"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />

                    <label>"Description"</label>
                    <textarea
                        prop:value=move || form.with(|f| f.description.clone())
                        on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                    />

                    <label>"GitHub Link"</label>
                    <input
                        type="url"
                        prop:value=move || form.with(|f| f.github_link.clone())
                        on:input=move |ev| form.update(|f| f.github_link = event_target_value(&ev))
                    />

                    <Suspense fallback=|| ()>
                        {move || options.with(|options| options.as_ref().map(|(classes, cohorts)| view! {
                            <label>"Class"</label>
                            <select on:change=move |ev| form.update(|f| f.class_id = event_target_value(&ev))>
                                <option value="">"No class"</option>
                                {class_options(classes)}
                            </select>

                            <label>"Cohort"</label>
                            <select on:change=move |ev| form.update(|f| f.cohort_id = event_target_value(&ev))>
                                <option value="">"No cohort"</option>
                                {cohort_options(cohorts)}
                            </select>
                        }))}
                    </Suspense>

                    <label>"Add Members"</label>
                    <div class="member-input">
                        <input
                            type="text"
                            placeholder="Member name"
                            prop:value=move || new_member.get()
                            on:input=move |ev| new_member.set(event_target_value(&ev))
                        />
                        <button type="button" on:click=add_member>"Add"</button>
                    </div>
                    <ul class="member-names">
                        {move || member_names
                            .get()
                            .into_iter()
                            .enumerate()
                            .map(|(index, name)| view! {
                                <li>
                                    {name}
                                    <button
                                        type="button"
                                        on:click=move |_| member_names.update(|names| {
                                            names.remove(index);
                                        })
                                    >"x"</button>
                                </li>
                            })
                            .collect_view()}
                    </ul>

                    <div class="form-actions">
                        <A href=move || project_id.get().map(|id| AppRoute::Project(id).path()).unwrap_or_default()>
                            "Cancel"
                        </A>
                        <button type="submit" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
