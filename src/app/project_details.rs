use leptos::*;
use leptos_router::*;

use super::{alert, confirm, kanban_board::KanbanBoard, use_auth};
use crate::{
    api::{MemberStatus, Project},
    guard::Route as AppRoute,
    kanban::Permissions,
};

pub(super) fn route_id() -> Memo<Option<i64>> {
    let params = use_params_map();
    create_memo(move |_| params.with(|p| p.get("id").and_then(|id| id.parse::<i64>().ok())))
}

#[component]
pub fn ProjectDetails() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let project_id = route_id();

    let project = create_local_resource(
        move || project_id.get(),
        move |id| async move {
            let id = id?;
            match auth.api().get_project(id).await {
                Ok(project) => Some(project),
                Err(e) => {
                    auth.report("Error fetching project", &e);
                    None
                }
            }
        },
    );

    let remove_member = move |project_id: i64, user_id: i64| {
        if !confirm("Are you sure you want to remove this member from the project?") {
            return;
        }

        spawn_local(async move {
            match auth.api().remove_member(project_id, user_id).await {
                Ok(_) => project.refetch(),
                Err(e) => {
                    auth.report("Error removing member", &e);
                    alert("Failed to remove member");
                }
            }
        });
    };

    let delete_project = move |project_id: i64| {
        if !confirm("Are you sure you want to delete this project? This cannot be undone.") {
            return;
        }

        let navigate = navigate.clone();
        spawn_local(async move {
            match auth.api().delete_project(project_id).await {
                Ok(_) => navigate(&AppRoute::Dashboard.path(), Default::default()),
                Err(e) => {
                    auth.report("Error deleting project", &e);
                    alert("Failed to delete project");
                }
            }
        });
    };

    let render = move |project: Project| {
        let permissions = Permissions::for_project(auth.user().as_ref(), &project);
        let id = project.id;
        let owner_id = project.owner_id;
        let delete_project = delete_project.clone();

        let owner = project
            .owner
            .as_ref()
            .map(|owner| owner.name.clone())
            .or_else(|| project.owner_name.clone())
            .unwrap_or_default();

        view! {
            <div class="project-header">
                <A href=AppRoute::Dashboard.path()>"Back to Dashboard"</A>
                <h1>{project.name.clone()}</h1>
                {project.description.clone().map(|d| view! { <p class="description">{d}</p> })}

                <div class="project-meta">
                    <span>"Owner: " {owner}</span>
                    <span>"Class: " {project.class_name().to_string()}</span>
                    <span>"Cohort: " {project.cohort_name().to_string()}</span>
                    {project.github_link.clone().filter(|link| !link.is_empty()).map(|link| view! {
                        <a href=link.clone() target="_blank" rel="noopener noreferrer">"GitHub"</a>
                    })}
                </div>

                <Show when=move || permissions.can_edit>
                    <div class="project-actions">
                        <A href=AppRoute::EditProject(id).path()>"Edit Project"</A>
                        <button class="danger" on:click={
                            let delete_project = delete_project.clone();
                            move |_| delete_project(id)
                        }>"Delete Project"</button>
                    </div>
                </Show>
            </div>

            <section class="members">
                <h2>"Team Members"</h2>
                <ul>
                    {project
                        .members
                        .iter()
                        .map(|member| {
                            let member_id = member.id;
                            let pending = member.status == MemberStatus::Pending;
                            view! {
                                <li>
                                    {member.name.clone()}
                                    <Show when=move || pending>
                                        <span class="badge">"Pending"</span>
                                    </Show>
                                    <Show when=move || permissions.can_edit && member_id != owner_id>
                                        <button on:click=move |_| remove_member(id, member_id)>"Remove"</button>
                                    </Show>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </section>

            <KanbanBoard
                project_id=id
                read_only=permissions.read_only()
                can_drag=permissions.can_drag
                members=project.members.clone()
            />
        }
        .into_view()
    };
    let render = store_value(render);

    view! {
        <div class="project-details">
            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || project.get().map(|project| match project {
                    Some(project) => render.with_value(|render| render(project)),
                    None => view! { <p class="error">"Project not found"</p> }.into_view(),
                })}
            </Suspense>
        </div>
    }
}
