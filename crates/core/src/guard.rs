//! Per-navigation route authorization.
//!
//! The decision is a pure function of the requested path and whether a session
//! exists. Performing the redirect is left to whoever drives navigation.

pub const LANDING_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Paths reachable without a session.
pub const PUBLIC_PATHS: [&str; 2] = [LANDING_PATH, LOGIN_PATH];

const ASSET_PREFIXES: [&str; 2] = ["/assets/", "/favicon.ico"];
const ASSET_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Whether the caller currently holds a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPresence {
    Present,
    Absent,
}

impl SessionPresence {
    /// Collapse a session lookup into presence.
    ///
    /// A failed lookup counts as no session, so protected routes stay closed
    /// when the backend cannot be reached.
    #[must_use]
    pub fn from_check<S, E>(check: Result<Option<S>, E>) -> Self {
        match check {
            Ok(Some(_)) => Self::Present,
            Ok(None) | Err(_) => Self::Absent,
        }
    }

    #[must_use]
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<bool> for SessionPresence {
    fn from(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }
}

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectLogin,
    RedirectDashboard,
}

impl RouteDecision {
    /// Path to navigate to, or `None` when the request proceeds unmodified.
    #[must_use]
    pub fn target(self) -> Option<&'static str> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::RedirectLogin => Some(LOGIN_PATH),
            RouteDecision::RedirectDashboard => Some(DASHBOARD_PATH),
        }
    }
}

/// Strip query, fragment and a trailing slash so `/login/?next=x` matches `/login`.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.is_empty() {
        return LANDING_PATH;
    }
    match path.strip_suffix('/') {
        Some("") | None => path,
        Some(trimmed) => trimmed,
    }
}

#[must_use]
pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&normalize_path(path))
}

/// Static files never go through the guard.
#[must_use]
pub fn is_guarded(path: &str) -> bool {
    let path = normalize_path(path);
    if ASSET_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return false;
    }
    let lower = path.to_ascii_lowercase();
    !ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Decide what to do with a navigation to `path`.
///
/// Rules, first match wins:
/// 1. no session and a non-public path: go to login
/// 2. a session and the login path: go to the dashboard
/// 3. anything else proceeds
#[must_use]
pub fn decide(path: &str, session: SessionPresence) -> RouteDecision {
    let path = normalize_path(path);
    match session {
        SessionPresence::Absent if !PUBLIC_PATHS.contains(&path) => RouteDecision::RedirectLogin,
        SessionPresence::Present if path == LOGIN_PATH => RouteDecision::RedirectDashboard,
        _ => RouteDecision::Allow,
    }
}

/// `decide`, with asset paths let through untouched.
#[must_use]
pub fn evaluate(path: &str, session: SessionPresence) -> RouteDecision {
    if is_guarded(path) {
        decide(path, session)
    } else {
        RouteDecision::Allow
    }
}
