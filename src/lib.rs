pub mod api;
pub mod app;
pub mod config;
pub mod forms;
pub mod guard;
pub mod invitations;
pub mod kanban;
pub mod projects;
pub mod session;
pub mod storage;
