use crate::agents::AgentConfig;

/// Every page reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    About,
    Orchestrator,
    Finance,
    Emails,
    Compliance,
    Michael,
}

/// What a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    About,
    Chat(&'static AgentConfig),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::About => "/",
            Route::Orchestrator => "/orchestrator",
            Route::Finance => "/finance",
            Route::Emails => "/emails",
            Route::Compliance => "/compliance",
            Route::Michael => "/michael",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::all().into_iter().find(|r| r.path() == normalized)
    }

    pub fn all() -> Vec<Route> {
        vec![
            Route::About,
            Route::Orchestrator,
            Route::Finance,
            Route::Emails,
            Route::Compliance,
            Route::Michael,
        ]
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            Route::About => "Sobre a Dunder Mifflin",
            Route::Orchestrator => "Converse com DunderAI",
            Route::Finance => "Dunder AI Financeiro",
            Route::Emails => "Dunder AI Emails",
            Route::Compliance => "Dunder AI Compliance",
            Route::Michael => "Converse com o Michael",
        }
    }

    /// Sidebar group heading, if the route starts a new group
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Route::Orchestrator => Some("Sistemas Centrais"),
            Route::Finance => Some("Departamentos"),
            Route::Michael => Some(""),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.page() {
            Page::About => "▣",
            Page::Chat(agent) => agent.icon,
        }
    }

    /// Key of the agent configuration a chat route is bound to
    pub fn agent_key(&self) -> Option<&'static str> {
        match self {
            Route::About => None,
            Route::Orchestrator => Some("orchestrator"),
            Route::Finance => Some("finance"),
            Route::Emails => Some("emails"),
            Route::Compliance => Some("compliance"),
            Route::Michael => Some("michael"),
        }
    }

    pub fn page(&self) -> Page {
        self.agent_key()
            .and_then(AgentConfig::lookup)
            .map_or(Page::About, Page::Chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::all() {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_from_path_normalizes() {
        assert_eq!(Route::from_path(""), Some(Route::About));
        assert_eq!(Route::from_path("/finance/"), Some(Route::Finance));
        assert_eq!(Route::from_path("/sales"), None);
    }

    #[test]
    fn test_pages_bind_endpoints() {
        let endpoint = |r: Route| match r.page() {
            Page::Chat(agent) => Some(agent.endpoint),
            Page::About => None,
        };
        assert_eq!(endpoint(Route::About), None);
        assert_eq!(endpoint(Route::Emails), Some("/api/profiler"));
        assert_eq!(endpoint(Route::Michael), Some("/api/michael/experience"));
    }

    #[test]
    fn test_every_chat_route_resolves_its_agent() {
        for route in Route::all() {
            match (route.agent_key(), route.page()) {
                (None, page) => assert_eq!(page, Page::About),
                (Some(key), Page::Chat(agent)) => assert_eq!(agent.key, key),
                (Some(key), Page::About) => panic!("no agent configured for '{}'", key),
            }
        }
    }
}
