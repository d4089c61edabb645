//! Static route table

use crate::types::Role;

/// Page rendered for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Register,
    Dashboard,
    DoctorDashboard,
    Profile,
}

/// Access requirement declared by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone may visit
    Public,
    /// Signed-in users only, optionally restricted to one role
    RequiresAuth { role: Option<Role> },
    /// Only visitors without a session (login, register)
    RequiresGuest,
}

impl Access {
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::RequiresAuth { .. })
    }

    pub const fn requires_guest(self) -> bool {
        matches!(self, Self::RequiresGuest)
    }

    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::RequiresAuth { role } => role,
            _ => None,
        }
    }
}

/// Entry in the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub view: Option<View>,
    pub access: Access,
    /// Static redirect applied before any access check
    pub redirect: Option<&'static str>,
}

impl Route {
    const fn page(path: &'static str, name: &'static str, view: View, access: Access) -> Self {
        Self {
            path,
            name: Some(name),
            view: Some(view),
            access,
            redirect: None,
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name: None,
            view: None,
            access: Access::Public,
            redirect: Some(to),
        }
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const DOCTOR_DASHBOARD_PATH: &str = "/doctor-dashboard";

/// The application's routes
pub static ROUTES: [Route; 6] = [
    Route::redirect("/", LOGIN_PATH),
    Route::page(LOGIN_PATH, "Login", View::Login, Access::RequiresGuest),
    Route::page("/register", "Register", View::Register, Access::RequiresGuest),
    Route::page(
        DASHBOARD_PATH,
        "Dashboard",
        View::Dashboard,
        Access::RequiresAuth {
            role: Some(Role::User),
        },
    ),
    Route::page(
        DOCTOR_DASHBOARD_PATH,
        "DoctorDashboard",
        View::DoctorDashboard,
        Access::RequiresAuth {
            role: Some(Role::Doctor),
        },
    ),
    Route::page(
        "/profile",
        "Profile",
        View::Profile,
        Access::RequiresAuth { role: None },
    ),
];

/// Lookup over a fixed set of routes
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(&ROUTES)
    }
}

impl RouteTable {
    pub const fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    pub const fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Find the route for a location. Query strings, fragments and a
    /// trailing slash are ignored.
    pub fn resolve(&self, location: &str) -> Option<&'static Route> {
        let path = normalize(location);
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&'static Route> {
        self.routes.iter().find(|route| route.name == Some(name))
    }
}

/// Strip query, fragment and trailing slash from a location
pub fn normalize(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let path = &location[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
