const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Where the REST API lives.
///
/// The base URL is baked in at build time from `PLANNER_API_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl Config {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let mut api_base_url = api_base_url.into();

        while api_base_url.ends_with('/') {
            api_base_url.pop();
        }

        Self { api_base_url }
    }

    pub fn from_env() -> Self {
        match option_env!("PLANNER_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slashes() {
        let config = Config::new("https://api.example.com//");
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(
            config.endpoint("/tasks/project/4"),
            "https://api.example.com/tasks/project/4"
        );
    }

    #[test]
    fn defaults_to_local_api() {
        assert_eq!(Config::default().endpoint("/projects"), "http://127.0.0.1:5000/projects");
    }
}
