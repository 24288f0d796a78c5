//! Property-based tests using proptest
//!
//! These tests verify the logical id normalizer, comma-list splitting and
//! record rendering using randomized inputs.

use gluegen::naming::{logical_id, split_list};
use gluegen::resource::{
    BucketRef, ConnectionBuilder, JobBuilder, TempLocation, TriggerAction, TriggerBuilder,
};
use proptest::prelude::*;

/// Names with at least one alphanumeric character
fn arb_name() -> impl Strategy<Value = String> {
    "[ -~]{0,20}[a-zA-Z0-9][ -~]{0,20}"
}

/// Comma-free list items (may be empty)
fn arb_items() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9-]{0,12}", 1..10)
}

proptest! {
    /// Output only contains letters and digits
    #[test]
    fn logical_id_has_no_separators(name in arb_name()) {
        let id = logical_id(&name).unwrap();
        prop_assert!(!id.is_empty());
        prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    /// Normalizing twice gives the same result
    #[test]
    fn logical_id_is_idempotent(name in arb_name()) {
        let once = logical_id(&name).unwrap();
        let twice = logical_id(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Same input, same output
    #[test]
    fn logical_id_is_deterministic(name in arb_name()) {
        prop_assert_eq!(logical_id(&name).unwrap(), logical_id(&name).unwrap());
    }

    /// Strings without any alphanumeric character are rejected
    #[test]
    fn logical_id_rejects_separator_only(name in "[ ,._/-]{0,10}") {
        prop_assert!(logical_id(&name).is_err());
    }

    /// Splitting a joined list gives back the same items in the same order
    #[test]
    fn split_list_preserves_order(items in arb_items()) {
        let joined = items.join(",");
        prop_assert_eq!(split_list(&joined), items);
    }

    /// Rendering an unmutated job twice is byte-identical
    #[test]
    fn job_render_is_idempotent(
        name in "[a-z][a-z0-9-]{0,20}",
        role in prop::option::of("[a-zA-Z0-9:/-]{1,30}"),
        workers in prop::option::of(1u32..100),
        temp in any::<bool>(),
    ) {
        let mut builder = JobBuilder::new(name.clone(), format!("s3://b/{}.py", name));
        if let Some(role) = &role {
            builder.set_role(role.clone());
        }
        if let Some(workers) = workers {
            builder.set_number_of_workers(workers);
        }
        if temp {
            builder.set_temp_location(TempLocation::for_job(BucketRef::Synthesized, None, &name));
        }
        let job = builder.build();

        prop_assert_eq!(job.render().to_string(), job.render().to_string());

        let doc = job.render();
        let props = doc["Properties"].as_object().unwrap();
        prop_assert_eq!(props.contains_key("Role"), role.is_some());
        prop_assert_eq!(props.contains_key("NumberOfWorkers"), workers.is_some());
        prop_assert_eq!(props.contains_key("DefaultArguments"), temp);
        prop_assert!(!props.contains_key("GlueVersion"));
        prop_assert!(props.values().all(|v| !v.is_null()));
    }

    /// Unset connection attributes never appear in the rendered input
    #[test]
    fn connection_omits_unset_attributes(
        description in prop::option::of("[a-z ]{1,20}"),
        groups in prop::option::of(arb_items()),
    ) {
        let mut builder = ConnectionBuilder::new("conn", "123456789012");
        if let Some(description) = &description {
            builder.set_description(description.clone());
        }
        if let Some(groups) = &groups {
            builder.set_security_groups(groups.clone());
        }
        let connection = builder.build();
        let doc = connection.render();
        let input = doc["Properties"]["ConnectionInput"].as_object().unwrap();

        prop_assert_eq!(connection.render(), doc.clone());
        prop_assert_eq!(input.contains_key("Description"), description.is_some());
        prop_assert_eq!(input.contains_key("PhysicalConnectionRequirements"), groups.is_some());
        prop_assert!(!input.contains_key("MatchCriteria"));
        prop_assert!(!input.contains_key("ConnectionType"));
    }

    /// Rendering a trigger twice is identical; unset action keys are omitted
    #[test]
    fn trigger_render_is_idempotent(
        name in "[a-z][a-z0-9-]{0,20}",
        schedule in prop::option::of("cron\\([0-9 *?]{1,15}\\)"),
        actions in prop::collection::vec(
            (
                "[a-z][a-z0-9-]{0,12}",
                prop::option::of(prop::collection::btree_map("--[a-z]{1,8}", "[a-z0-9]{0,8}", 0..4)),
                prop::option::of(1u32..2880),
            ),
            0..5,
        ),
    ) {
        let built: Vec<TriggerAction> = actions
            .iter()
            .map(|(job, args, timeout)| {
                let mut action = TriggerAction::new(job.clone());
                if let Some(args) = args {
                    action.set_arguments(args.clone());
                }
                if let Some(timeout) = timeout {
                    action.set_timeout(*timeout);
                }
                action
            })
            .collect();
        let mut builder = TriggerBuilder::new(name, schedule.clone());
        builder.set_actions(built);
        let trigger = builder.build();

        let doc = trigger.render();
        prop_assert_eq!(trigger.render().to_string(), doc.to_string());

        let props = doc["Properties"].as_object().unwrap();
        prop_assert_eq!(props.contains_key("Schedule"), schedule.is_some());
        let rendered = props["Actions"].as_array().unwrap();
        prop_assert_eq!(rendered.len(), actions.len());
        for (action, (job, args, timeout)) in rendered.iter().zip(&actions) {
            let action = action.as_object().unwrap();
            prop_assert_eq!(action["JobName"].as_str(), Some(job.as_str()));
            prop_assert_eq!(action.contains_key("Arguments"), args.is_some());
            prop_assert_eq!(action.contains_key("Timeout"), timeout.is_some());
        }
    }
}
