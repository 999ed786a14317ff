#[cfg(test)]
mod tests {
    use crate::comparator::classify;
    use proptest::prelude::*;
    use pushbridge_common::models::{RegistrationParameters, RegistrationSnapshot};

    fn arb_opt_string() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z0-9]{0,8}")
    }

    prop_compose! {
        fn arb_parameters()(
            platform_identifier in "[a-z0-9]{1,8}",
            platform_secret in "[a-z0-9]{1,8}",
            server_url in "https://[a-z]{1,8}\\.example\\.com",
            alias in arb_opt_string(),
            custom_user_id in arb_opt_string(),
            sender_id in arb_opt_string(),
        ) -> RegistrationParameters {
            let mut params = RegistrationParameters::new(
                platform_identifier,
                platform_secret,
                server_url,
                "com.example.app",
            );
            params.device_alias = alias;
            params.custom_user_id = custom_user_id;
            params.sender_id = sender_id;
            params
        }
    }

    prop_compose! {
        fn arb_snapshot()(
            channel_token in arb_opt_string(),
            backend_device_id in arb_opt_string(),
            platform_identifier in arb_opt_string(),
            platform_secret in arb_opt_string(),
            sender_id in arb_opt_string(),
            app_version in proptest::option::of(0i64..5),
        ) -> RegistrationSnapshot {
            RegistrationSnapshot {
                channel_token,
                backend_device_id,
                platform_identifier,
                platform_secret,
                sender_id,
                app_version,
                ..Default::default()
            }
        }
    }

    proptest! {
        // classify is a pure function: same inputs, same classification,
        // however often it is evaluated.
        #[test]
        fn classification_is_deterministic(
            snapshot in arb_snapshot(),
            params in arb_parameters(),
            version in 0i64..5,
        ) {
            let first = classify(&snapshot, &params, version);
            let second = classify(&snapshot, &params, version);
            prop_assert_eq!(first, second);
        }

        // A snapshot that mirrors the parameters exactly never asks for work.
        #[test]
        fn mirrored_snapshot_is_a_noop(params in arb_parameters(), version in 0i64..5) {
            let snapshot = RegistrationSnapshot {
                channel_token: Some("tok".into()),
                backend_device_id: Some("dev".into()),
                platform_identifier: Some(params.platform_identifier.clone()),
                platform_secret: Some(params.platform_secret.clone()),
                device_alias: params.device_alias.clone(),
                custom_user_id: params.custom_user_id.clone(),
                server_url: Some(params.server_url.clone()),
                sender_id: params.sender_id.clone(),
                package_identity: Some(params.package_identity.clone()),
                app_version: Some(version),
                tags: params.tags.clone(),
            };

            let changes = classify(&snapshot, &params, version);
            // The only remaining trigger is a missing sender id, which the
            // channel provider may legitimately require.
            prop_assert!(!changes.identity_changed());
            prop_assert!(!changes.backend_create_required());
            prop_assert!(!changes.backend_update_required(false));
            prop_assert_eq!(
                changes.channel_registration_required(),
                params.sender_id.is_none()
            );
        }

        // Update is only ever required when an id exists to update.
        #[test]
        fn update_requires_a_stored_backend_id(
            snapshot in arb_snapshot(),
            params in arb_parameters(),
            version in 0i64..5,
            token_changed in proptest::bool::ANY,
        ) {
            let changes = classify(&snapshot, &params, version);
            if snapshot.backend_device_id.is_none() {
                prop_assert!(!changes.backend_update_required(token_changed));
            }
        }

        // A missing sender can never classify as a changed sender, so the
        // unregister-first branch only fires with a stored sender.
        #[test]
        fn sender_change_implies_stored_sender(
            snapshot in arb_snapshot(),
            params in arb_parameters(),
            version in 0i64..5,
        ) {
            let changes = classify(&snapshot, &params, version);
            if changes.sender_id_changed {
                prop_assert!(snapshot.sender_id.is_some());
            }
        }
    }
}
