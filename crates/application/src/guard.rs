//! Route guard: pure navigation decisions over the session state.

use crate::session::SessionStore;

/// Navigation metadata attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Only authenticated users may enter.
    pub requires_auth: bool,
    /// Only logged-out users may enter (login, register, password reset).
    pub guest_only: bool,
}

impl RouteMeta {
    /// A route requiring authentication.
    #[must_use]
    pub const fn protected() -> Self {
        Self {
            requires_auth: true,
            guest_only: false,
        }
    }

    /// A route for logged-out users only.
    #[must_use]
    pub const fn guest_only() -> Self {
        Self {
            requires_auth: false,
            guest_only: true,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds.
    Allow,
    /// Unauthenticated access to a protected route; the originally
    /// requested path rides along for the post-login redirect.
    RedirectToLogin {
        /// Full path of the request being interrupted.
        redirect: String,
    },
    /// Authenticated users are sent home from guest-only routes.
    RedirectHome,
}

/// Applies the navigation rules to a route.
pub async fn evaluate(session: &SessionStore, meta: RouteMeta, full_path: &str) -> GuardDecision {
    let authenticated = session.is_authenticated().await;
    if meta.requires_auth && !authenticated {
        return GuardDecision::RedirectToLogin {
            redirect: full_path.to_string(),
        };
    }
    if meta.guest_only && authenticated {
        return GuardDecision::RedirectHome;
    }
    GuardDecision::Allow
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::session_store;
    use ladle_domain::TokenPair;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn unauthenticated_protected_route_redirects_with_path() {
        let session = session_store();

        let decision = evaluate(&session, RouteMeta::protected(), "/recipes/7?from=home").await;

        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                redirect: "/recipes/7?from=home".to_string()
            }
        );
    }

    #[tokio::test]
    async fn authenticated_guest_route_redirects_home() {
        let session = session_store();
        session.set_tokens(&TokenPair::access_only("at")).await;

        let decision = evaluate(&session, RouteMeta::guest_only(), "/login").await;

        assert_eq!(decision, GuardDecision::RedirectHome);
    }

    #[tokio::test]
    async fn plain_routes_always_allow() {
        let session = session_store();

        let decision = evaluate(&session, RouteMeta::default(), "/about").await;

        assert_eq!(decision, GuardDecision::Allow);
    }

    #[tokio::test]
    async fn authenticated_protected_route_allows() {
        let session = session_store();
        session.set_tokens(&TokenPair::access_only("at")).await;

        let decision = evaluate(&session, RouteMeta::protected(), "/").await;

        assert_eq!(decision, GuardDecision::Allow);
    }
}
