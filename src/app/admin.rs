use leptos::*;

use super::{
    alert, confirm,
    dashboard::{delete_project, FilterBar, ProjectCard},
    use_auth, AccountControls,
};
use crate::{
    api::{Class, Cohort},
    forms::{class_payload, cohort_payload},
    projects::ProjectFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Projects,
    Cohorts,
    Classes,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Projects, Tab::Cohorts, Tab::Classes];

    fn label(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Cohorts => "Cohorts",
            Tab::Classes => "Classes",
        }
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let auth = use_auth();
    let tab = create_rw_signal(Tab::Projects);

    view! {
        <div class="dashboard admin">
            <header>
                <h1>"Admin Dashboard"</h1>
                <span>{move || auth.user().map(|user| user.display_name().to_string())}</span>
                <AccountControls/>
            </header>

            <nav class="tabs">
                {Tab::ALL
                    .into_iter()
                    .map(|t| view! {
                        <button class:active=move || tab.get() == t on:click=move |_| tab.set(t)>
                            {t.label()}
                        </button>
                    })
                    .collect_view()}
            </nav>

            {move || match tab.get() {
                Tab::Projects => view! { <ProjectsTab/> }.into_view(),
                Tab::Cohorts => view! { <CohortsTab/> }.into_view(),
                Tab::Classes => view! { <ClassesTab/> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn ProjectsTab() -> impl IntoView {
    let auth = use_auth();
    let filter = create_rw_signal(ProjectFilter::default());

    let projects = create_local_resource(
        || (),
        move |_| async move {
            auth.api().list_projects(&[]).await.unwrap_or_else(|e| {
                auth.report("Error fetching projects", &e);
                Vec::new()
            })
        },
    );

    let on_delete = Callback::new(move |id: i64| delete_project(auth, id, move || projects.refetch()));

    view! {
        <section>
            <FilterBar filter/>
            <Suspense fallback=|| view! { <p>"Loading projects..."</p> }>
                <div class="project-grid">
                    {move || projects.get().map(|projects| {
                        let visible = filter.with(|filter| {
                            filter.apply(&projects).into_iter().cloned().collect::<Vec<_>>()
                        });

                        if visible.is_empty() {
                            return view! { <p class="empty">"No projects found"</p> }.into_view();
                        }

                        visible
                            .into_iter()
                            .map(|project| view! { <ProjectCard project on_delete/> })
                            .collect_view()
                    })}
                </div>
            </Suspense>
        </section>
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CohortDraft {
    id: Option<i64>,
    name: String,
    start_date: String,
    end_date: String,
}

impl CohortDraft {
    fn edit(cohort: &Cohort) -> Self {
        Self {
            id: Some(cohort.id),
            name: cohort.name.clone(),
            start_date: cohort.start_date.clone().unwrap_or_default(),
            end_date: cohort.end_date.clone().unwrap_or_default(),
        }
    }
}

#[component]
fn CohortsTab() -> impl IntoView {
    let auth = use_auth();
    let draft = create_rw_signal(None::<CohortDraft>);
    let error = create_rw_signal(None::<String>);

    let cohorts = create_local_resource(
        || (),
        move |_| async move {
            auth.api().list_cohorts(&[]).await.unwrap_or_else(|e| {
                auth.report("Error fetching cohorts", &e);
                Vec::new()
            })
        },
    );

    let open = move |value: CohortDraft| {
        error.set(None);
        draft.set(Some(value));
    };

    let delete = move |id: i64| {
        if !confirm("Are you sure you want to delete this cohort?") {
            return;
        }

        spawn_local(async move {
            match auth.api().delete_cohort(id).await {
                Ok(_) => cohorts.refetch(),
                Err(e) => {
                    auth.report("Error deleting cohort", &e);
                    alert("Failed to delete cohort");
                }
            }
        });
    };

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(value) = draft.get_untracked() else {
            return;
        };

        let payload = match cohort_payload(&value.name, &value.start_date, &value.end_date) {
            Ok(payload) => payload,
            Err(e) => {
                error.set(Some(e.user_message()));
                return;
            }
        };

        spawn_local(async move {
            let api = auth.api();
            let result = match value.id {
                Some(id) => api.update_cohort(id, &payload).await,
                None => api.create_cohort(&payload).await,
            };

            match result {
                Ok(_) => {
                    draft.set(None);
                    cohorts.refetch();
                }
                Err(e) => {
                    auth.report("Error saving cohort", &e);
                    error.set(Some(e.message_or("Failed to save cohort")));
                }
            }
        });
    };

    let is_open = create_memo(move |_| draft.with(|draft| draft.as_ref().map(|d| d.id.is_some())));

    view! {
        <section>
            <button class="primary" on:click=move |_| open(CohortDraft::default())>"+ Add Cohort"</button>

            <Suspense fallback=|| view! { <p>"Loading cohorts..."</p> }>
                <table>
                    <thead>
                        <tr><th>"Name"</th><th>"Start"</th><th>"End"</th><th></th></tr>
                    </thead>
                    <tbody>
                        {move || cohorts.get().map(|cohorts| cohorts
                            .into_iter()
                            .map(|cohort| {
                                let id = cohort.id;
                                let editable = CohortDraft::edit(&cohort);
                                view! {
                                    <tr>
                                        <td>{cohort.name}</td>
                                        <td>{cohort.start_date.unwrap_or_default()}</td>
                                        <td>{cohort.end_date.unwrap_or_default()}</td>
                                        <td>
                                            <button on:click=move |_| open(editable.clone())>"Edit"</button>
                                            <button class="danger" on:click=move |_| delete(id)>"Delete"</button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view())}
                    </tbody>
                </table>
            </Suspense>

            {move || is_open.get().map(|editing| view! {
                <div class="modal-overlay">
                    <div class="modal">
                        <h3>{if editing { "Edit Cohort" } else { "Add Cohort" }}</h3>
                        {move || error.get().map(|message| view! { <div class="error">{message}</div> })}
                        <form on:submit=save>
                            <input
                                type="text"
                                placeholder="Cohort name"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.name.clone()).unwrap_or_default())
                                on:input=move |ev| draft.update(|d| if let Some(d) = d { d.name = event_target_value(&ev) })
                            />
                            <label>"Start date"</label>
                            <input
                                type="date"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.start_date.clone()).unwrap_or_default())
                                on:input=move |ev| draft.update(|d| if let Some(d) = d { d.start_date = event_target_value(&ev) })
                            />
                            <label>"End date"</label>
                            <input
                                type="date"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.end_date.clone()).unwrap_or_default())
                                on:input=move |ev| draft.update(|d| if let Some(d) = d { d.end_date = event_target_value(&ev) })
                            />
                            <div class="modal-actions">
                                <button type="button" on:click=move |_| draft.set(None)>"Cancel"</button>
                                <button type="submit">"Save"</button>
                            </div>
                        </form>
                    </div>
                </div>
            })}
        </section>
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassDraft {
    id: Option<i64>,
    name: String,
    description: String,
}

impl ClassDraft {
    fn edit(class: &Class) -> Self {
        Self {
            id: Some(class.id),
            name: class.name.clone(),
            description: class.description.clone().unwrap_or_default(),
        }
    }
}

#[component]
fn ClassesTab() -> impl IntoView {
    let auth = use_auth();
    let draft = create_rw_signal(None::<ClassDraft>);
    let error = create_rw_signal(None::<String>);

    let classes = create_local_resource(
        || (),
        move |_| async move {
            auth.api().list_classes(&[]).await.unwrap_or_else(|e| {
                auth.report("Error fetching classes", &e);
                Vec::new()
            })
        },
    );

    let open = move |value: ClassDraft| {
        error.set(None);
        draft.set(Some(value));
    };

    let delete = move |id: i64| {
        if !confirm("Are you sure you want to delete this class?") {
            return;
        }

        spawn_local(async move {
            match auth.api().delete_class(id).await {
                Ok(_) => classes.refetch(),
                Err(e) => {
                    auth.report("Error deleting class", &e);
                    alert("Failed to delete class");
                }
            }
        });
    };

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(value) = draft.get_untracked() else {
            return;
        };

        let payload = match class_payload(&value.name, &value.description) {
            Ok(payload) => payload,
            Err(e) => {
                error.set(Some(e.user_message()));
                return;
            }
        };

        spawn_local(async move {
            let api = auth.api();
            let result = match value.id {
                Some(id) => api.update_class(id, &payload).await,
                None => api.create_class(&payload).await,
            };

            match result {
                Ok(_) => {
                    draft.set(None);
                    classes.refetch();
                }
                Err(e) => {
                    auth.report("Error saving class", &e);
                    error.set(Some(e.message_or("Failed to save class")));
                }
            }
        });
    };

    let is_open = create_memo(move |_| draft.with(|draft| draft.as_ref().map(|d| d.id.is_some())));

    view! {
        <section>
            <button class="primary" on:click=move |_| open(ClassDraft::default())>"+ Add Class"</button>

            <Suspense fallback=|| view! { <p>"Loading classes..."</p> }>
                <table>
                    <thead>
                        <tr><th>"Name"</th><th>"Description"</th><th></th></tr>
                    </thead>
                    <tbody>
                        {move || classes.get().map(|classes| classes
                            .into_iter()
                            .map(|class| {
                                let id = class.id;
                                let editable = ClassDraft::edit(&class);
                                view! {
                                    <tr>
                                        <td>{class.label()}</td>
                                        <td>{class.description.unwrap_or_default()}</td>
                                        <td>
                                            <button on:click=move |_| open(editable.clone())>"Edit"</button>
                                            <button class="danger" on:click=move |_| delete(id)>"Delete"</button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view())}
                    </tbody>
                </table>
            </Suspense>

            {move || is_open.get().map(|editing| view! {
                <div class="modal-overlay">
                    <div class="modal">
                        <h3>{if editing { "Edit Class" } else { "Add Class" }}</h3>
                        {move || error.get().map(|message| view! { <div class="error">{message}</div> })}
                        <form on:submit=save>
                            <input
                                type="text"
                                placeholder="Class name"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.name.clone()).unwrap_or_default())
                                on:input=move |ev| draft.update(|d| if let Some(d) = d { d.name = event_target_value(&ev) })
                            />
                            <textarea
                                placeholder="Description"
                                prop:value=move || draft.with(|d| d.as_ref().map(|d| d.description.clone()).unwrap_or_default())
                                on:input=move |ev| draft.update(|d| if let Some(d) = d { d.description = event_target_value(&ev) })
                            />
                            <div class="modal-actions">
                                <button type="button" on:click=move |_| draft.set(None)>"Cancel"</button>
                                <button type="submit">"Save"</button>
                            </div>
                        </form>
                    </div>
                </div>
            })}
        </section>
    }
}
