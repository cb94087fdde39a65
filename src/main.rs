#[cfg(feature = "csr")]
fn main() {
    use leptos::*;
    use project_planner::app::App;

    console_error_panic_hook::set_once();

    logging::log!(
        "project planner starting against {}",
        project_planner::config::Config::from_env().api_base_url
    );

    mount_to_body(App);
}

#[cfg(not(feature = "csr"))]
pub fn main() {
    // the UI only runs in the browser; build with `trunk serve` (csr feature)
}
