use leptos::*;

use super::{alert, confirm, use_auth};
use crate::{
    api::{Member, Task, TaskStatus},
    kanban::{persist_drop, Board, DropSettlement, DropTarget, TaskForm},
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Editor {
    task_id: Option<i64>,
    form: TaskForm,
}

/// Three-column task board for one project.
///
/// Cards are moved with native HTML5 drag events. Hovering moves a card
/// optimistically; the single status write happens on drop.
#[component]
pub fn KanbanBoard(
    project_id: i64,
    #[prop(optional)] read_only: bool,
    #[prop(optional)] can_drag: bool,
    #[prop(optional)] members: Vec<Member>,
) -> impl IntoView {
    let auth = use_auth();

    let board = create_rw_signal(Board::default());
    let loading = create_rw_signal(true);
    let editor = create_rw_signal(None::<Editor>);
    let form_error = create_rw_signal(None::<String>);
    let members = store_value(members);
    // Some(true) while editing, Some(false) while adding.
    let editing = create_memo(move |_| editor.with(|editor| editor.as_ref().map(|e| e.task_id.is_some())));

    let load = move || {
        spawn_local(async move {
            match auth.api().project_tasks(project_id).await {
                Ok(tasks) => board.update(|board| board.replace_tasks(tasks)),
                Err(e) => auth.report("Error fetching tasks", &e),
            }
            loading.set(false);
        })
    };
    load();

    let drag_over = move |target: DropTarget| {
        if board.with_untracked(|board| board.would_move(target)) {
            board.update(|board| {
                board.drag_over(target);
            });
        }
    };

    let drop_on = move |target: DropTarget| {
        let mut change = None;
        board.update(|board| change = board.drag_end(target));

        let Some(change) = change else {
            return;
        };

        spawn_local(async move {
            let settlement = persist_drop(&auth.api(), project_id, change).await;

            if let DropSettlement::ReloadFailed(e) = &settlement {
                auth.report("Error fetching tasks", e);
            }

            board.update(|board| board.settle(settlement));
        });
    };

    let open_new = move |_| {
        form_error.set(None);
        editor.set(Some(Editor {
            task_id: None,
            form: TaskForm::default(),
        }));
    };

    let open_edit = Callback::new(move |task: Task| {
        form_error.set(None);
        editor.set(Some(Editor {
            task_id: Some(task.id),
            form: TaskForm::edit(&task),
        }));
    });

    let delete = Callback::new(move |task_id: i64| {
        if !confirm("Are you sure you want to delete this task?") {
            return;
        }

        spawn_local(async move {
            match auth.api().delete_task(task_id).await {
                Ok(_) => load(),
                Err(e) => {
                    auth.report("Error deleting task", &e);
                    alert("Failed to delete task");
                }
            }
        });
    });

    let save = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(Editor { task_id, form }) = editor.get_untracked() else {
            return;
        };

        let payload = members.with_value(|members| match task_id {
            Some(_) => form.update_payload(members),
            None => form.create_payload(project_id, members),
        });

        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                form_error.set(Some(e.user_message()));
                return;
            }
        };

        spawn_local(async move {
            let api = auth.api();
            let result = match task_id {
                Some(id) => api.update_task(id, &payload).await,
                None => api.create_task(&payload).await,
            };

            match result {
                Ok(_) => {
                    editor.set(None);
                    load();
                }
                Err(e) => {
                    auth.report("Error saving task", &e);
                    alert(if task_id.is_some() {
                        "Failed to update task"
                    } else {
                        "Failed to create task"
                    });
                }
            }
        });
    };

    let edit_form = move |update: fn(&mut TaskForm, String), ev: ev::Event| {
        let value = event_target_value(&ev);
        editor.update(|editor| {
            if let Some(editor) = editor {
                update(&mut editor.form, value);
            }
        });
    };

    let field = move |read: fn(&TaskForm) -> String| {
        move || editor.with(|editor| editor.as_ref().map(|editor| read(&editor.form)).unwrap_or_default())
    };

    view! {
        <div class="kanban">
            <div class="kanban-header">
                <h2>"Tasks"</h2>
                <Show when=move || !read_only>
                    <button class="add-task" on:click=open_new>"+ Add Task"</button>
                </Show>
            </div>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <p>"Loading tasks..."</p> }
            >
                <div class="kanban-columns">
                    {TaskStatus::COLUMNS
                        .into_iter()
                        .map(|status| view! {
                            <div
                                class="kanban-column"
                                on:dragover=move |ev| {
                                    ev.prevent_default();
                                    drag_over(DropTarget::Column(status));
                                }
                                on:drop=move |ev| {
                                    ev.prevent_default();
                                    drop_on(DropTarget::Column(status));
                                }
                            >
                                <h3>
                                    {status.as_str()}
                                    <span class="count">
                                        {move || board.with(|board| board.counts().get(&status).copied().unwrap_or(0))}
                                    </span>
                                </h3>

                                <For
                                    each=move || board.with(|board| board.rendered_column(status))
                                    key=|task| (task.id, task.title.clone(), task.description.clone(), task.assignee_id)
                                    let:task
                                >
                                    <TaskCard
                                        task
                                        column=status
                                        board
                                        can_drag
                                        read_only
                                        members=members.get_value()
                                        on_edit=open_edit
                                        on_delete=delete
                                        on_drag_over=Callback::new(drag_over)
                                        on_drop=Callback::new(drop_on)
                                    />
                                </For>
                            </div>
                        })
                        .collect_view()}
                </div>
            </Show>

            {move || editing.get().map(|editing| view! {
                <div class="modal-overlay">
                    <div class="modal">
                        <h3>{if editing { "Edit Task" } else { "Add New Task" }}</h3>

                        {move || form_error.get().map(|message| view! { <div class="error">{message}</div> })}

                        <form on:submit=save>
                            <input
                                type="text"
                                placeholder="Task title"
                                required
                                prop:value=field(|form| form.title.clone())
                                on:input=move |ev| edit_form(|form, value| form.title = value, ev)
                            />
                            <select
                                prop:value=field(|form| form.assignee_id.clone())
                                on:change=move |ev| edit_form(|form, value| form.assignee_id = value, ev)
                            >
                                <option value="">"Unassigned"</option>
                                {members.with_value(|members| members
                                    .iter()
                                    .map(|member| view! {
                                        <option value=member.id.to_string()>{member.name.clone()}</option>
                                    })
                                    .collect_view())}
                            </select>
                            <textarea
                                placeholder="Description"
                                prop:value=field(|form| form.description.clone())
                                on:input=move |ev| edit_form(|form, value| form.description = value, ev)
                            />
                            <div class="modal-actions">
                                <button type="button" on:click=move |_| editor.set(None)>"Cancel"</button>
                                <button type="submit">{if editing { "Update Task" } else { "Add Task" }}</button>
                            </div>
                        </form>
                    </div>
                </div>
            })}
        </div>
    }
}

#[component]
fn TaskCard(
    task: Task,
    column: TaskStatus,
    board: RwSignal<Board>,
    can_drag: bool,
    read_only: bool,
    members: Vec<Member>,
    #[prop(into)] on_edit: Callback<Task>,
    #[prop(into)] on_delete: Callback<i64>,
    #[prop(into)] on_drag_over: Callback<DropTarget>,
    #[prop(into)] on_drop: Callback<DropTarget>,
) -> impl IntoView {
    let task_id = task.id;

    let assignee = task
        .assignee
        .as_ref()
        .map(|assignee| assignee.name.clone())
        .or_else(|| {
            let id = task.assignee_id?;
            members
                .iter()
                .find(|member| member.id == id)
                .map(|member| member.name.clone())
        });

    let edit_task = task.clone();
    // Hovering the source copy counts as hovering its column.
    let target = move || {
        if board.with_untracked(|board| board.is_drag_source(task_id, column)) {
            DropTarget::Column(column)
        } else {
            DropTarget::Task(task_id)
        }
    };

    view! {
        <div
            class="task-card"
            class:dragging=move || board.with(|board| board.active().is_some_and(|t| t.id == task_id))
            class:pending=move || board.with(|board| board.is_pending(task_id))
            class:source=move || board.with(|board| board.is_drag_source(task_id, column))
            draggable=if can_drag { "true" } else { "false" }
            on:dragstart=move |ev| {
                if !can_drag {
                    return;
                }
                if let Some(transfer) = ev.data_transfer() {
                    let _ = transfer.set_data("text/plain", &task_id.to_string());
                }
                board.update(|board| board.drag_start(task_id));
            }
            on:dragover=move |ev| {
                ev.prevent_default();
                ev.stop_propagation();
                on_drag_over.call(target());
            }
            on:drop=move |ev| {
                ev.prevent_default();
                ev.stop_propagation();
                on_drop.call(target());
            }
            on:dragend=move |_| board.update(|board| board.cancel_drag())
        >
            <h4>{task.title.clone()}</h4>
            {task.description.clone().filter(|d| !d.is_empty()).map(|d| view! { <p>{d}</p> })}
            {assignee.map(|name| view! { <span class="assignee">{name}</span> })}

            <Show when=move || !read_only>
                <div class="task-actions">
                    <button on:click={
                        let task = edit_task.clone();
                        move |_| on_edit.call(task.clone())
                    }>"Edit"</button>
                    <button on:click=move |_| on_delete.call(task_id)>"Delete"</button>
                </div>
            </Show>
        </div>
    }
}
