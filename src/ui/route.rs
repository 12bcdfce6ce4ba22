//! Screens the console can show, addressable by path.

use crate::api::Resource;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Dashboard,
    Profile,
    List(Resource),
    Detail(Resource, String),
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/admin/users` or `/admin/view/car/abc123`.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["signin"] => Route::SignIn,
            ["view-profile"] => Route::Profile,
            ["admin", "dashboard"] => Route::Dashboard,
            ["admin", name] => match name.parse() {
                Ok(resource) => Route::List(resource),
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["admin", "view", name, id] => match name.parse() {
                Ok(resource) => Route::Detail(resource, id.to_string()),
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::SignIn => "/".to_string(),
            Route::Dashboard => "/admin/dashboard".to_string(),
            Route::Profile => "/view-profile".to_string(),
            Route::List(resource) => format!("/admin/{}", resource.as_str()),
            Route::Detail(resource, id) => format!(
                "/admin/view/{}/{}",
                resource.singular().to_lowercase(),
                id
            ),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::SignIn => "Sign In".to_string(),
            Route::Dashboard => "Dashboard".to_string(),
            Route::Profile => "Profile".to_string(),
            Route::List(resource) => resource.plural().to_string(),
            Route::Detail(resource, _) => format!("{} Details", resource.singular()),
            Route::NotFound(_) => "Not Found".to_string(),
        }
    }

    /// Every screen except sign-in needs an admin session.
    pub fn guard(self, session: Option<&Session>) -> Route {
        let allowed = session.map(|s| s.user.is_admin()).unwrap_or(false);
        match self {
            Route::SignIn | Route::NotFound(_) => self,
            _ if allowed => self,
            _ => Route::SignIn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserIdentity;

    fn admin() -> Session {
        Session::new(
            "tok",
            UserIdentity {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: "admin".to_string(),
            },
        )
    }

    #[test]
    fn parses_list_and_detail_paths() {
        assert_eq!(Route::parse("/admin/users"), Route::List(Resource::User));
        assert_eq!(
            Route::parse("/admin/view/car/abc123"),
            Route::Detail(Resource::Vehicle, "abc123".to_string())
        );
        assert_eq!(Route::parse("/admin/dashboard"), Route::Dashboard);
        assert!(matches!(Route::parse("/nope/at/all"), Route::NotFound(_)));
    }

    #[test]
    fn detail_path_round_trips() {
        let route = Route::Detail(Resource::Auction, "a1".to_string());
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn guard_requires_admin() {
        let route = Route::List(Resource::Bid);
        assert_eq!(route.clone().guard(None), Route::SignIn);
        assert_eq!(route.clone().guard(Some(&admin())), route);

        let mut user = admin();
        user.user.role = "user".to_string();
        assert_eq!(Route::Dashboard.guard(Some(&user)), Route::SignIn);
    }
}
