#[cfg(test)]
mod tests {
    use crate::comparator::classify;
    use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};

    const APP_VERSION: i64 = 3;

    fn params() -> RegistrationParameters {
        RegistrationParameters::new("tenant-1", "secret-1", "https://push.example.com", "com.example.app")
            .with_device_alias("alias-1")
            .with_sender_id("sender-1")
            .with_tags(["beta"])
    }

    fn matching_snapshot() -> RegistrationSnapshot {
        RegistrationSnapshot {
            channel_token: Some("tok-1".into()),
            backend_device_id: Some("dev-1".into()),
            platform_identifier: Some("tenant-1".into()),
            platform_secret: Some("secret-1".into()),
            device_alias: Some("alias-1".into()),
            custom_user_id: None,
            server_url: Some("https://push.example.com".into()),
            sender_id: Some("sender-1".into()),
            package_identity: Some("com.example.app".into()),
            app_version: Some(APP_VERSION),
            tags: Some(["beta".to_string()].into_iter().collect()),
        }
    }

    #[test]
    fn matching_state_classifies_as_unchanged() {
        let changes = classify(&matching_snapshot(), &params(), APP_VERSION);

        assert!(!changes.channel_registration_required());
        assert!(!changes.identity_changed());
        assert!(!changes.backend_update_required(false));
        assert!(!changes.backend_create_required());
        assert!(!changes.sender_id_changed);
    }

    #[test]
    fn empty_snapshot_requires_everything() {
        let changes = classify(&RegistrationSnapshot::default(), &params(), APP_VERSION);

        assert!(changes.channel_token_missing);
        assert!(changes.sender_id_missing);
        assert!(changes.channel_registration_required());
        assert!(changes.backend_create_required());
        // No stored sender means nothing to unregister from
        assert!(!changes.sender_id_changed);
        // No stored backend id means update is never the right call
        assert!(!changes.backend_update_required(true));
    }

    #[test]
    fn sender_change_needs_a_previously_stored_sender() {
        let mut snapshot = matching_snapshot();
        let desired = params().with_sender_id("sender-2");

        let changes = classify(&snapshot, &desired, APP_VERSION);
        assert!(changes.sender_id_changed);
        assert!(changes.channel_registration_required());

        snapshot.sender_id = None;
        let changes = classify(&snapshot, &desired, APP_VERSION);
        assert!(!changes.sender_id_changed);
        assert!(changes.sender_id_missing);
        assert!(changes.channel_registration_required());
    }

    #[test]
    fn app_version_bump_requires_channel_registration_only() {
        let changes = classify(&matching_snapshot(), &params(), APP_VERSION + 1);

        assert!(changes.app_version_changed);
        assert!(changes.channel_registration_required());
        assert!(!changes.identity_changed());
    }

    #[test]
    fn alias_change_is_an_identity_change() {
        let desired = params().with_device_alias("alias-2");
        let changes = classify(&matching_snapshot(), &desired, APP_VERSION);

        assert!(changes.alias_changed);
        assert!(changes.identity_changed());
        assert!(changes.backend_update_required(false));
        assert!(!changes.channel_registration_required());
    }

    #[test]
    fn tags_change_is_an_identity_change() {
        let desired = params().with_tags(["beta", "eu"]);
        let changes = classify(&matching_snapshot(), &desired, APP_VERSION);

        assert!(changes.tags_changed);
        assert!(changes.backend_update_required(false));
    }

    #[test]
    fn credential_rotation_is_detected_per_field() {
        let mut desired = params();
        desired.platform_secret = "secret-2".into();
        let changes = classify(&matching_snapshot(), &desired, APP_VERSION);

        assert!(changes.credentials_changed);
        assert!(changes.backend_update_required(false));
    }

    #[test]
    fn server_url_change_flags_both_update_and_create_inputs() {
        let mut desired = params();
        desired.server_url = "https://other.example.com".into();
        let changes = classify(&matching_snapshot(), &desired, APP_VERSION);

        assert!(changes.server_url_changed);
        // Both derived predicates fire; the engine resolves the precedence
        // (a changed server always forces create).
        assert!(changes.backend_update_required(false));
        assert!(changes.backend_create_required());
    }

    #[test]
    fn token_change_alone_updates_an_existing_registration() {
        let changes = classify(&matching_snapshot(), &params(), APP_VERSION);

        assert!(changes.backend_update_required(true));
        assert!(!changes.backend_update_required(false));
    }

    #[test]
    fn partial_backend_state_forces_create() {
        // Channel registered, backend create previously failed: token and
        // sender are stored, all backend fields are absent.
        let snapshot = RegistrationSnapshot {
            channel_token: Some("tok-1".into()),
            sender_id: Some("sender-1".into()),
            app_version: Some(APP_VERSION),
            ..Default::default()
        };
        let changes = classify(&snapshot, &params(), APP_VERSION);

        assert!(!changes.channel_registration_required());
        assert!(!changes.backend_update_required(false));
        assert!(changes.platform_identifier_missing);
        assert!(changes.backend_create_required());
    }
}
