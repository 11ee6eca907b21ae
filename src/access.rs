//! Route access
//!
//! Pure allow/redirect/deny decisions over an already-resolved identity and a
//! requested path. Route classification is an ordered prefix table so the
//! mapping stays declarative and testable; the gate performs no I/O and must
//! be re-evaluated on every navigation rather than cached.
//!
//! Authorization shortfalls resolve to silent redirects, not errors — the one
//! exception is a manager without an assigned-cinema claim hitting a
//! resource-scoped admin route, which is an outright [`Decision::Deny`].

/// The platform's role taxonomy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    /// Full access to every route.
    Admin,

    /// Admin dashboards scoped to an assigned cinema.
    Manager,

    /// Front-of-house account restricted to an explicit path allow-list.
    Staff,

    /// Authenticated customer.
    Member,

    /// Unauthenticated (or identity still loading).
    Anonymous,
}

/// A resolved identity, passed into the gate explicitly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The identity's role.
    pub role: Role,

    /// Whether a manager identity carries an assigned-cinema claim.
    ///
    /// Assignment resolution lives server-side; the gate only sees the
    /// resolved flag. Meaningless for other roles.
    pub has_resource_claim: bool,
}

impl Identity {
    /// An unauthenticated identity.
    pub fn anonymous() -> Self {
        Self {
            role: Role::Anonymous,
            has_resource_claim: false,
        }
    }

    /// An authenticated customer.
    pub fn member() -> Self {
        Self {
            role: Role::Member,
            has_resource_claim: false,
        }
    }

    /// A front-of-house staff account.
    pub fn staff() -> Self {
        Self {
            role: Role::Staff,
            has_resource_claim: false,
        }
    }

    /// A manager, with or without an assigned-cinema claim.
    pub fn manager(has_resource_claim: bool) -> Self {
        Self {
            role: Role::Manager,
            has_resource_claim,
        }
    }

    /// An administrator.
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            has_resource_claim: true,
        }
    }
}

/// Classification of a requested route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteClass {
    /// Browsable without authentication.
    Public,

    /// Requires any authenticated identity.
    AuthRequired,

    /// Administrators only.
    AdminOnly,

    /// Managers and administrators.
    ManagerOrAdmin {
        /// Whether the route is scoped to an assigned cinema, requiring a
        /// resource claim from managers.
        resource_scoped: bool,
    },
}

/// Outcome of a gate decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the route.
    Allow,

    /// Send the visitor to the login page.
    RedirectToLogin,

    /// Silently send the visitor to a default route.
    RedirectToDefault(&'static str),

    /// Refuse outright.
    Deny,
}

/// Default landing route for identities bounced off a route.
pub const DEFAULT_ROUTE: &str = "/showtimes";

/// Path prefixes a staff account may visit: the booking flow, the ticket
/// scanner, profile/security pages, and session routes.
const STAFF_ALLOWED_PREFIXES: &[&str] = &[
    "/booking",
    "/checkout",
    "/scanner",
    "/profile",
    "/security",
    "/login",
    "/logout",
    "/showtimes",
];

/// Ordered prefix table mapping paths to route classes; first match wins.
/// Paths matching no prefix are public.
const ROUTE_CLASSES: &[(&str, RouteClass)] = &[
    (
        "/admin/cinemas",
        RouteClass::ManagerOrAdmin {
            resource_scoped: true,
        },
    ),
    (
        "/admin/bookings",
        RouteClass::ManagerOrAdmin {
            resource_scoped: true,
        },
    ),
    (
        "/admin/reports",
        RouteClass::ManagerOrAdmin {
            resource_scoped: false,
        },
    ),
    ("/admin", RouteClass::AdminOnly),
    ("/booking", RouteClass::AuthRequired),
    ("/checkout", RouteClass::AuthRequired),
    ("/my-tickets", RouteClass::AuthRequired),
    ("/scanner", RouteClass::AuthRequired),
    ("/profile", RouteClass::AuthRequired),
    ("/security", RouteClass::AuthRequired),
];

/// Classify a path against the route table.
pub fn classify(path: &str) -> RouteClass {
    ROUTE_CLASSES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map_or(RouteClass::Public, |(_, class)| *class)
}

/// Decide whether `identity` may visit `path`.
pub fn authorize(identity: &Identity, path: &str) -> Decision {
    authorize_class(identity, classify(path), path)
}

/// Decide against an already-classified route.
///
/// `path` is still consulted for the staff allow-list, which is keyed on path
/// prefixes rather than route classes.
pub fn authorize_class(identity: &Identity, class: RouteClass, path: &str) -> Decision {
    match identity.role {
        Role::Admin => Decision::Allow,
        Role::Anonymous => match class {
            RouteClass::Public => Decision::Allow,
            _ => Decision::RedirectToLogin,
        },
        Role::Staff => {
            if STAFF_ALLOWED_PREFIXES
                .iter()
                .any(|prefix| path.starts_with(prefix))
                || path == "/"
            {
                Decision::Allow
            } else {
                Decision::RedirectToDefault(DEFAULT_ROUTE)
            }
        }
        Role::Manager => match class {
            RouteClass::Public | RouteClass::AuthRequired => Decision::Allow,
            RouteClass::ManagerOrAdmin { resource_scoped } => {
                if resource_scoped && !identity.has_resource_claim {
                    Decision::Deny
                } else {
                    Decision::Allow
                }
            }
            RouteClass::AdminOnly => Decision::RedirectToDefault(DEFAULT_ROUTE),
        },
        Role::Member => match class {
            RouteClass::Public | RouteClass::AuthRequired => Decision::Allow,
            RouteClass::AdminOnly | RouteClass::ManagerOrAdmin { .. } => {
                Decision::RedirectToDefault(DEFAULT_ROUTE)
            }
        },
    }
}
