//! Tests for the attribute catalogue

use std::collections::HashSet;

use crate::schema::Attribute;

// =============================================================================
// Tree shape
// =============================================================================

#[test]
fn test_roots_have_no_parent() {
    for root in [
        Attribute::Tealium,
        Attribute::Page,
        Attribute::User,
        Attribute::Attribution,
        Attribute::Environment,
        Attribute::Request,
    ] {
        assert!(root.is_root(), "{root:?} should be a root");
        assert_eq!(root.root(), root);
    }
}

#[test]
fn test_every_chain_terminates_at_a_root() {
    for &attribute in Attribute::ALL {
        let mut depth = 0;
        let mut current = attribute;
        while let Some(parent) = current.parent() {
            current = parent;
            depth += 1;
            assert!(depth < 8, "{attribute:?} has a runaway ancestor chain");
        }
        assert!(current.is_root());
        assert_eq!(attribute.root(), current);
    }
}

#[test]
fn test_paths_are_unique() {
    let paths: HashSet<String> = Attribute::ALL.iter().map(|a| a.dotted_path()).collect();
    assert_eq!(paths.len(), Attribute::ALL.len());
}

#[test]
fn test_path_of_root_is_empty() {
    let (root, path) = Attribute::Environment.path();
    assert_eq!(root, Attribute::Environment);
    assert!(path.is_empty());
}

#[test]
fn test_path_of_first_level_child() {
    let (root, path) = Attribute::PageUrl.path();
    assert_eq!(root, Attribute::Page);
    assert_eq!(path, vec![Attribute::PageUrl]);
}

#[test]
fn test_path_of_grandchild() {
    let (root, path) = Attribute::SessionInit.path();
    assert_eq!(root, Attribute::User);
    assert_eq!(path, vec![Attribute::UserSession, Attribute::SessionInit]);
}

#[test]
fn test_dotted_path() {
    assert_eq!(Attribute::Tealium.dotted_path(), "tealium");
    assert_eq!(Attribute::TealiumTraceId.dotted_path(), "tealium.trace_id");
    assert_eq!(Attribute::EmailHidden.dotted_path(), "user.email.hidden");
    assert_eq!(Attribute::DeviceType.to_string(), "user.device.type");
}

#[test]
fn test_from_path() {
    assert_eq!(Attribute::from_path("page.url"), Some(Attribute::PageUrl));
    assert_eq!(
        Attribute::from_path("user.device.os_version"),
        Some(Attribute::DeviceOsVersion)
    );
    assert_eq!(Attribute::from_path("environment"), Some(Attribute::Environment));
    assert_eq!(Attribute::from_path("page.nope"), None);
    assert_eq!(Attribute::from_path(""), None);
}

#[test]
fn test_children() {
    let email: Vec<_> = Attribute::UserEmail.children().collect();
    assert_eq!(
        email,
        vec![
            Attribute::EmailHidden,
            Attribute::EmailStrong,
            Attribute::EmailStronger
        ]
    );
    assert!(Attribute::UserDevice.has_children());
    assert!(!Attribute::PageUrl.has_children());
    assert!(!Attribute::Attribution.has_children());
}

// =============================================================================
// Required fields
// =============================================================================

#[test]
fn test_required_roots_exclude_request() {
    assert_eq!(Attribute::REQUIRED_ROOTS.len(), 5);
    assert!(!Attribute::REQUIRED_ROOTS.contains(&Attribute::Request));
    assert!(!Attribute::Request.is_required());
    assert!(Attribute::Attribution.is_required());
}

#[test]
fn test_required_children() {
    assert_eq!(
        Attribute::Tealium.required_children(),
        &[
            Attribute::TealiumAccount,
            Attribute::TealiumProfile,
            Attribute::TealiumEvent
        ]
    );
    assert_eq!(
        Attribute::Page.required_children(),
        &[Attribute::PageName, Attribute::PageUrl]
    );
    assert_eq!(
        Attribute::User.required_children(),
        &[
            Attribute::UserVisitorType,
            Attribute::UserSignedIn,
            Attribute::UserDevice,
            Attribute::UserChannel
        ]
    );
    assert_eq!(
        Attribute::UserSession.required_children(),
        &[Attribute::SessionInit]
    );
}

#[test]
fn test_leaf_groups_require_nothing() {
    assert!(Attribute::UserEmail.required_children().is_empty());
    assert!(Attribute::UserDevice.required_children().is_empty());
    assert!(Attribute::EmailHidden.required_fields().is_empty());
    assert!(Attribute::DeviceTheme.required_fields().is_empty());
}

#[test]
fn test_required_fields_are_the_group_list() {
    assert_eq!(Attribute::Request.required_fields(), Attribute::REQUIRED_ROOTS);
    assert_eq!(
        Attribute::TealiumTraceId.required_fields(),
        Attribute::Tealium.required_children()
    );
    assert_eq!(
        Attribute::SessionId.required_fields(),
        &[Attribute::SessionInit]
    );
}

#[test]
fn test_required_children_are_children() {
    for &attribute in Attribute::ALL {
        for required in attribute.required_children() {
            assert_eq!(required.parent(), Some(attribute));
        }
    }
}
