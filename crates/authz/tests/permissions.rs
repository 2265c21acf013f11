//! Black-box checks of the authorization engine through its public API.
//!
//! Fixtures are built from API-shaped JSON so the wire normalization is
//! exercised on the way in.

use std::sync::Once;

use spaceauth_authz::{
    K8sCluster, K8sClusterAction, Permissions, Reason, RevokeInvitationContext, Role, Space,
    SpaceAction, TeamAction,
};
use spaceauth_core::{InvitationId, UserId};
use spaceauth_observability::{LogFormat, ObservabilityConfig};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        spaceauth_observability::init_with(&ObservabilityConfig {
            filter: "spaceauth_authz=trace".to_string(),
            format: LogFormat::Pretty,
        });
    });
}

fn uid(raw: &str) -> UserId {
    UserId::from_raw(raw)
}

fn acme(kind: &str) -> Space {
    let json = format!(
        r#"{{
            "id": "spc_acme",
            "name": "acme",
            "kind": "{kind}",
            "teams": [
                {{ "id": "t_owner", "name": "Owners", "kind": "Owner", "spaceId": "spc_acme",
                   "users": [ {{ "id": "alice" }} ] }},
                {{ "id": "t_admin", "name": "Admins", "kind": "Admin", "spaceId": "spc_acme",
                   "users": [ {{ "id": "bob" }} ] }},
                {{ "id": "t_dev", "name": "Developers", "kind": "Normal", "spaceId": "spc_acme",
                   "users": [ {{ "id": "carol" }}, {{ "id": "dave" }}, {{ "id": "alice" }} ] }}
            ]
        }}"#
    );
    Space::from_json(&json).unwrap()
}

fn cluster(created_by: &str, dev_label: Option<&str>) -> K8sCluster {
    let metadata = match dev_label {
        Some(v) => format!(r#", "metadata": {{ "labels": {{ "devCluster": "{v}" }} }}"#),
        None => String::new(),
    };
    let json = format!(
        r#"{{ "id": "k8s_1", "createdById": "{created_by}", "kind": "eks"{metadata} }}"#
    );
    K8sCluster::from_json(&json).unwrap()
}

#[test]
fn space_without_owner_or_teams_has_no_roles() {
    init_tracing();
    let space = Space::from_json(r#"{ "id": "spc_empty", "kind": "Team" }"#).unwrap();
    let p = Permissions::new();
    for user in ["alice", "bob", ""] {
        assert_eq!(p.get_role(&space, &uid(user)), Role::None);
    }
}

#[test]
fn direct_owner_outside_all_teams_is_owner() {
    init_tracing();
    let mut space = acme("Team");
    space.owner_id = Some(uid("zed"));
    assert_eq!(Permissions::new().get_role(&space, &uid("zed")), Role::Owner);
}

#[test]
fn owner_team_outranks_normal_team() {
    init_tracing();
    assert_eq!(Permissions::new().get_role(&acme("Team"), &uid("alice")), Role::Owner);
}

#[test]
fn delete_space_depends_on_space_kind() {
    init_tracing();
    let p = Permissions::new();
    let mut team_space = acme("Team");
    team_space.owner_id = Some(uid("alice"));
    let mut personal = acme("Personal");
    personal.owner_id = Some(uid("alice"));

    assert!(p.can_space(SpaceAction::DeleteSpace, &team_space, &uid("alice"), None));
    assert!(!p.can_space(SpaceAction::DeleteSpace, &personal, &uid("alice"), None));
}

#[test]
fn change_space_plan_excludes_admins() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    assert!(!p.can_space(SpaceAction::ChangeSpacePlan, &space, &uid("bob"), None));
    assert!(p.can_space(SpaceAction::ChangeSpacePlan, &space, &uid("alice"), None));
}

#[test]
fn member_revokes_own_invitation_only() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    let created = RevokeInvitationContext::new("inv_x", [InvitationId::from_raw("inv_x")]);
    let none = RevokeInvitationContext::new("inv_x", []);

    assert!(p.can_space(SpaceAction::RevokeInvitation, &space, &uid("carol"), Some(&created)));
    assert!(!p.can_space(SpaceAction::RevokeInvitation, &space, &uid("carol"), Some(&none)));
}

#[test]
fn outsider_revokes_own_invitation_only() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    let outsider = uid("mallory");
    assert_eq!(p.get_role(&space, &outsider), Role::None);

    let created = RevokeInvitationContext::new("inv_y", [InvitationId::from_raw("inv_y")]);
    let d = p.explain_space(SpaceAction::RevokeInvitation, &space, &outsider, Some(&created));
    assert!(d.granted);
    assert_eq!(d.reason, Reason::InvitationCreator);

    let none = RevokeInvitationContext::new("inv_y", []);
    let d = p.explain_space(SpaceAction::RevokeInvitation, &space, &outsider, Some(&none));
    assert!(!d.granted);
    assert_eq!(d.reason, Reason::InsufficientRole);
}

#[test]
fn admin_team_mutation_depends_on_team_kind() {
    init_tracing();
    let p = Permissions::new();
    let personal = acme("Personal");
    let team_space = acme("Team");

    assert!(!p.can_team(TeamAction::AddUser, &personal, &personal.teams[0], &uid("bob"), None));
    assert!(p.can_team(
        TeamAction::AddUser,
        &team_space,
        &team_space.teams[2],
        &uid("bob"),
        Some(&uid("erin"))
    ));
}

#[test]
fn owner_team_of_personal_space_is_frozen_even_for_owner() {
    init_tracing();
    let p = Permissions::new();
    let personal = acme("Personal");
    for action in TeamAction::ALL {
        assert!(!p.can_team(*action, &personal, &personal.teams[0], &uid("alice"), None));
        assert!(p.can_team(*action, &personal, &personal.teams[1], &uid("alice"), None));
    }
}

#[test]
fn dev_cluster_access_rules() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    let dev = cluster("carol", Some("true"));

    let access = K8sClusterAction::AccessK8sCluster;

    assert!(p.can_k8s_cluster(access, &space, &dev, &uid("carol")));
    assert!(!p.can_k8s_cluster(access, &space, &dev, &uid("dave")));
    assert!(p.can_k8s_cluster(access, &space, &dev, &uid("bob")));
    assert!(p.can_k8s_cluster(access, &space, &dev, &uid("alice")));
}

#[test]
fn non_literal_dev_label_means_shared_cluster() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    let shared = cluster("carol", Some("TRUE"));

    let access = K8sClusterAction::AccessK8sCluster;

    assert!(p.can_k8s_cluster(access, &space, &shared, &uid("dave")));
    assert!(!p.can_k8s_cluster(access, &space, &shared, &uid("mallory")));
}

#[test]
fn unknown_action_names_are_denied_everywhere() {
    init_tracing();
    let p = Permissions::new();
    let space = acme("Team");
    let c = cluster("alice", None);

    for name in ["", "DeleteEverything", "deletespace", "*"] {
        assert!(!p.can_space_named(name, &space, &uid("alice"), None));
        assert!(!p.can_team_named(name, &space, &space.teams[2], &uid("alice"), None));
        assert!(!p.can_k8s_cluster_named(name, &space, &c, &uid("alice")));
    }
}

#[test]
fn partially_loaded_space_only_knows_direct_owner() {
    init_tracing();
    let p = Permissions::new();
    let space =
        Space::from_json(r#"{ "id": "spc_acme", "kind": "Team", "ownerId": "alice" }"#).unwrap();

    assert!(p.can_space(SpaceAction::PatchSpace, &space, &uid("alice"), None));
    assert!(!p.can_space(SpaceAction::PatchSpace, &space, &uid("bob"), None));
}
