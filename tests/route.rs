mod common;

use auction_admin::api::Resource;
use auction_admin::session::Session;
use auction_admin::ui::route::Route;
use common::{admin_identity, admin_session};

#[test]
fn test_paths_round_trip() {
    let routes = [
        Route::Dashboard,
        Route::Profile,
        Route::List(Resource::Transaction),
        Route::Detail(Resource::Vehicle, "c42".to_string()),
    ];
    for route in routes {
        assert_eq!(Route::parse(&route.path()), route);
    }
}

#[test]
fn test_unknown_paths_are_not_found() {
    assert_eq!(
        Route::parse("/admin/planes"),
        Route::NotFound("/admin/planes".to_string())
    );
    assert!(matches!(Route::parse("/nowhere/at/all"), Route::NotFound(_)));
}

#[test]
fn test_guard_sends_anonymous_users_to_sign_in() {
    assert_eq!(Route::List(Resource::User).guard(None), Route::SignIn);
    assert_eq!(Route::Profile.guard(None), Route::SignIn);
    assert_eq!(Route::SignIn.guard(None), Route::SignIn);
}

/// A stored session whose role is not admin grants nothing.
#[test]
fn test_guard_rejects_non_admin_session() {
    let mut identity = admin_identity();
    identity.role = "user".to_string();
    let session = Session::new("t", identity);
    assert_eq!(Route::Dashboard.guard(Some(&session)), Route::SignIn);
}

#[test]
fn test_guard_lets_admins_through() {
    let session = admin_session();
    let route = Route::Detail(Resource::Bid, "b1".to_string());
    assert_eq!(route.clone().guard(Some(&session)), route);
}
