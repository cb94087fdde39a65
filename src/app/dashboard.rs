use leptos::*;
use leptos_router::*;

use super::{
    alert, confirm,
    invitations::{load_invitations, InvitationNotification, PendingInvitations},
    project_modal::ProjectModal,
    use_auth, AccountControls, AuthContext,
};
use crate::{
    api::Project,
    guard::Route as AppRoute,
    invitations::InvitationList,
    projects::{partition_projects, ProjectFilter},
};

pub(super) fn delete_project(auth: AuthContext, project_id: i64, on_deleted: impl FnOnce() + 'static) {
    if !confirm("Are you sure you want to delete this project?") {
        return;
    }

    spawn_local(async move {
        match auth.api().delete_project(project_id).await {
            Ok(_) => on_deleted(),
            Err(e) => {
                auth.report("Error deleting project", &e);
                alert("Failed to delete project");
            }
        }
    });
}

/// Class and cohort filter inputs bound to one filter signal.
#[component]
pub(super) fn FilterBar(filter: RwSignal<ProjectFilter>) -> impl IntoView {
    view! {
        <div class="filters">
            <input
                type="text"
                placeholder="Filter by class"
                prop:value=move || filter.with(|f| f.class.clone())
                on:input=move |ev| filter.update(|f| f.class = event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Filter by cohort"
                prop:value=move || filter.with(|f| f.cohort.clone())
                on:input=move |ev| filter.update(|f| f.cohort = event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub(super) fn ProjectCard(
    project: Project,
    #[prop(optional, into)] on_edit: Option<Callback<Project>>,
    #[prop(optional, into)] on_delete: Option<Callback<i64>>,
) -> impl IntoView {
    let id = project.id;
    let name = project.name.clone();
    let editable = project.clone();

    view! {
        <div class="project-card">
            {project.cover_image.clone().filter(|src| !src.is_empty()).map(|src| view! {
                <img class="cover" src=src alt=""/>
            })}
            <h3><A href=AppRoute::Project(id).path()>{name}</A></h3>
            {project.description.clone().map(|d| view! { <p>{d}</p> })}
            <div class="tags">
                <span class="tag">{project.class_name().to_string()}</span>
                <span class="tag">{project.cohort_name().to_string()}</span>
            </div>
            <div class="card-actions">
                <A href=AppRoute::Project(id).path()>"View"</A>
                {on_edit.map(|on_edit| view! {
                    <button on:click=move |_| on_edit.call(editable.clone())>"Edit"</button>
                })}
                {on_delete.map(|on_delete| view! {
                    <button class="danger" on:click=move |_| on_delete.call(id)>"Delete"</button>
                })}
            </div>
        </div>
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Modal {
    Closed,
    Create,
    Edit(Project),
}

#[component]
pub fn StudentDashboard() -> impl IntoView {
    let auth = use_auth();

    let filter = create_rw_signal(ProjectFilter::default());
    let modal = create_rw_signal(Modal::Closed);
    let invitations = create_rw_signal(InvitationList::default());

    let projects = create_local_resource(
        || (),
        move |_| async move {
            match auth.api().list_projects(&[]).await {
                Ok(projects) => projects,
                Err(e) => {
                    auth.report("Error fetching projects", &e);
                    Vec::new()
                }
            }
        },
    );

    load_invitations(auth, invitations);

    let partitioned = create_memo(move |_| {
        let projects = projects.get().unwrap_or_default();
        match auth.user() {
            Some(user) => partition_projects(projects, &user),
            None => (Vec::new(), projects),
        }
    });

    let reload = Callback::new(move |_: ()| projects.refetch());
    let after_response = Callback::new(move |_: ()| {
        projects.refetch();
        load_invitations(auth, invitations);
    });

    let on_edit = Callback::new(move |project: Project| modal.set(Modal::Edit(project)));
    let on_delete = Callback::new(move |id: i64| delete_project(auth, id, move || projects.refetch()));

    let render_cards = move |list: Vec<Project>, owned: bool| {
        let visible = filter.with(|filter| {
            filter
                .apply(&list)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        });

        if visible.is_empty() {
            return view! { <p class="empty">"No projects found"</p> }.into_view();
        }

        visible
            .into_iter()
            .map(|project| {
                let mine = owned
                    && auth
                        .user()
                        .is_some_and(|user| project.is_owned_by(&user));
                if mine {
                    view! { <ProjectCard project on_edit on_delete/> }.into_view()
                } else {
                    view! { <ProjectCard project/> }.into_view()
                }
            })
            .collect_view()
    };

    view! {
        <div class="dashboard">
            <header>
                <h1>"Welcome, " {move || auth.user().map(|user| user.display_name().to_string())}</h1>
                <InvitationNotification list=invitations on_responded=after_response/>
                <AccountControls/>
            </header>

            <PendingInvitations list=invitations on_responded=after_response/>

            <div class="toolbar">
                <FilterBar filter/>
                <button class="primary" on:click=move |_| modal.set(Modal::Create)>"+ Create Project"</button>
            </div>

            <Suspense fallback=|| view! { <p>"Loading projects..."</p> }>
                <section>
                    <h2>"My Projects"</h2>
                    <div class="project-grid">
                        {move || render_cards(partitioned.with(|(mine, _)| mine.clone()), true)}
                    </div>
                </section>
                <section>
                    <h2>"Other Projects"</h2>
                    <div class="project-grid">
                        {move || render_cards(partitioned.with(|(_, others)| others.clone()), false)}
                    </div>
                </section>
            </Suspense>

            {move || {
                let editing = match modal.get() {
                    Modal::Closed => return None,
                    Modal::Create => None,
                    Modal::Edit(project) => Some(project),
                };

                Some(view! {
                    <ProjectModal
                        editing=editing
                        on_close=move |_| modal.set(Modal::Closed)
                        on_saved=move |_| {
                            modal.set(Modal::Closed);
                            reload.call(());
                        }
                    />
                })
            }}
        </div>
    }
}
