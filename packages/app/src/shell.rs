//! Navigation shell: the screen the learner is on, with the login guard applied.

use nextoddlers_core::CategoryGroup;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Route {
    Login,
    Dashboard,
    Category { group: CategoryGroup },
    Practice { topic: String },
    Complete { stars: u32, topic: String },
    TopicNotFound { topic: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Category { group } => format!("/categories/{}", group.id()),
            Route::Practice { topic } | Route::TopicNotFound { topic } => {
                format!("/practice/{topic}")
            }
            Route::Complete { .. } => "/complete".to_string(),
        }
    }

    /// Unknown paths fall back to the dashboard. `/complete` has no state of
    /// its own, so it opens with zero stars and no topic.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/complete" => Route::Complete {
                stars: 0,
                topic: String::new(),
            },
            _ => {
                if let Some(id) = trimmed.strip_prefix("/categories/") {
                    return CategoryGroup::from_id(id)
                        .map(|group| Route::Category { group })
                        .unwrap_or(Route::Dashboard);
                }
                if let Some(topic) = trimmed.strip_prefix("/practice/") {
                    if !topic.is_empty() && !topic.contains('/') {
                        return Route::Practice {
                            topic: topic.to_string(),
                        };
                    }
                }
                Route::Dashboard
            }
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Resolves where a navigation request actually lands.
pub fn guard(target: Route, authenticated: bool) -> Route {
    match (target, authenticated) {
        (Route::Login, true) => Route::Dashboard,
        (target, false) if target.is_protected() => Route::Login,
        (target, _) => target,
    }
}

#[derive(Debug, Clone)]
pub struct Shell {
    route: Route,
}

impl Shell {
    pub fn new(authenticated: bool) -> Self {
        Self {
            route: guard(Route::Dashboard, authenticated),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn navigate(&mut self, target: Route, authenticated: bool) -> &Route {
        let resolved = guard(target, authenticated);
        debug!(path = %resolved.path(), "navigate");
        self.route = resolved;
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_lands_on_login() {
        assert_eq!(Shell::new(false).route(), &Route::Login);
        assert_eq!(guard(Route::Dashboard, false), Route::Login);
        assert_eq!(
            guard(
                Route::Practice {
                    topic: "colors".into()
                },
                false
            ),
            Route::Login
        );
    }

    #[test]
    fn test_authenticated_login_redirects_home() {
        assert_eq!(Shell::new(true).route(), &Route::Dashboard);
        assert_eq!(guard(Route::Login, true), Route::Dashboard);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::from_path("/"), Route::Dashboard);
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(
            Route::from_path("/categories/letters-reading"),
            Route::Category {
                group: CategoryGroup::LettersReading
            }
        );
        assert_eq!(Route::from_path("/categories/nope"), Route::Dashboard);
        assert_eq!(
            Route::from_path("/practice/spelling"),
            Route::Practice {
                topic: "spelling".into()
            }
        );
        assert_eq!(
            Route::from_path("/complete"),
            Route::Complete {
                stars: 0,
                topic: String::new()
            }
        );
        assert_eq!(Route::from_path("/somewhere/else"), Route::Dashboard);

        let route = Route::Category {
            group: CategoryGroup::People,
        };
        assert_eq!(Route::from_path(&route.path()), route);
    }
}
