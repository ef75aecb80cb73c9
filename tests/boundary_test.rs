// tests/boundary_test.rs
use git_bump::boundary::BoundaryWarning;

#[test]
fn test_boundary_warning_no_anchor_display() {
    let warning = BoundaryWarning::NoAnchorTag {
        prefix: "v".to_string(),
    };
    assert_eq!(
        warning.to_string(),
        "No version tag matching prefix 'v' found in history"
    );
}

#[test]
fn test_boundary_warning_nothing_to_bump_display() {
    let warning = BoundaryWarning::NothingToBump {
        current: "1.4.2".to_string(),
    };
    let msg = warning.to_string();
    assert!(msg.contains("1.4.2"));
    assert!(msg.contains("No bump required"));
}

#[test]
fn test_boundary_warning_head_already_tagged_display() {
    let warning = BoundaryWarning::HeadAlreadyTagged {
        tag: "2.1.1".to_string(),
    };
    assert!(warning.to_string().contains("already tagged '2.1.1'"));
}

#[test]
fn test_boundary_warning_draft_substituted_display() {
    let warning = BoundaryWarning::DraftSubstituted {
        draft: "1.3.0-dev004.deadbeef".to_string(),
        tag: "1.2.0".to_string(),
    };
    let msg = warning.to_string();
    assert!(msg.contains("1.3.0-dev004.deadbeef"));
    assert!(msg.contains("1.2.0"));
}

#[test]
fn test_boundary_warning_serializes_with_kind() {
    let warning = BoundaryWarning::BreakingChangeSuppressed {
        max_major: 3,
        commits: 2,
    };
    let json = serde_json::to_value(&warning).unwrap();
    assert_eq!(json["kind"], "breaking_change_suppressed");
    assert_eq!(json["max_major"], 3);
    assert_eq!(json["commits"], 2);
}

#[test]
fn test_boundary_warning_release_branch_serializes() {
    let warning = BoundaryWarning::ReleaseBranchExists {
        branch: "release/1.3".to_string(),
    };
    let json = serde_json::to_string(&warning).unwrap();
    assert_eq!(json, r#"{"kind":"release_branch_exists","branch":"release/1.3"}"#);
}
