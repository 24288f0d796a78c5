//! Glue trigger record

use super::{insert_opt, resource_document};
use serde_json::{Map as JsonMap, Value};
use std::collections::BTreeMap;

/// One job launched by a trigger. The job is referenced by name only and
/// resolved by the provisioning engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerAction {
    job_name: String,
    arguments: Option<BTreeMap<String, String>>,
    timeout: Option<u32>,
}

impl TriggerAction {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            arguments: None,
            timeout: None,
        }
    }

    pub fn set_arguments(&mut self, arguments: BTreeMap<String, String>) -> &mut Self {
        self.arguments = Some(arguments);
        self
    }

    /// Timeout in minutes
    pub fn set_timeout(&mut self, minutes: u32) -> &mut Self {
        self.timeout = Some(minutes);
        self
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn render(&self) -> Value {
        let mut action = JsonMap::new();
        action.insert("JobName".to_string(), Value::String(self.job_name.clone()));
        insert_opt(
            &mut action,
            "Arguments",
            self.arguments.as_ref().map(|args| {
                Value::Object(
                    args.iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                )
            }),
        );
        insert_opt(&mut action, "Timeout", self.timeout);
        Value::Object(action)
    }
}

/// Mutable trigger record used while compiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerBuilder {
    name: String,
    schedule: Option<String>,
    actions: Vec<TriggerAction>,
}

impl TriggerBuilder {
    /// Without a schedule the trigger is rendered as on-demand
    pub fn new(name: impl Into<String>, schedule: Option<String>) -> Self {
        Self {
            name: name.into(),
            schedule,
            actions: Vec::new(),
        }
    }

    pub fn set_actions(&mut self, actions: Vec<TriggerAction>) -> &mut Self {
        self.actions = actions;
        self
    }

    pub fn build(self) -> Trigger {
        Trigger { inner: self }
    }
}

/// Frozen trigger record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    inner: TriggerBuilder,
}

impl Trigger {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn actions(&self) -> &[TriggerAction] {
        &self.inner.actions
    }

    pub fn render(&self) -> Value {
        let trigger = &self.inner;
        let trigger_type = if trigger.schedule.is_some() {
            "SCHEDULED"
        } else {
            "ON_DEMAND"
        };

        let mut props = JsonMap::new();
        props.insert("Name".to_string(), Value::String(trigger.name.clone()));
        props.insert("Type".to_string(), Value::String(trigger_type.to_string()));
        insert_opt(&mut props, "Schedule", trigger.schedule.clone());
        props.insert(
            "Actions".to_string(),
            Value::Array(trigger.actions.iter().map(TriggerAction::render).collect()),
        );

        resource_document("AWS::Glue::Trigger", props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scheduled_trigger_keeps_action_order() {
        let mut first = TriggerAction::new("extract");
        first.set_timeout(30);
        let mut second = TriggerAction::new("load");
        second.set_arguments(BTreeMap::from([("--day".to_string(), "1".to_string())]));

        let mut builder = TriggerBuilder::new("nightly", Some("cron(0 2 * * ? *)".into()));
        builder.set_actions(vec![first, second]);
        let doc = builder.build().render();

        assert_eq!(doc["Type"], "AWS::Glue::Trigger");
        assert_eq!(doc["Properties"]["Type"], "SCHEDULED");
        assert_eq!(doc["Properties"]["Schedule"], "cron(0 2 * * ? *)");
        assert_eq!(
            doc["Properties"]["Actions"],
            json!([
                { "JobName": "extract", "Timeout": 30 },
                { "JobName": "load", "Arguments": { "--day": "1" } }
            ])
        );
    }

    #[test]
    fn test_on_demand_trigger_has_no_schedule() {
        let doc = TriggerBuilder::new("manual", None).build().render();
        let props = doc["Properties"].as_object().unwrap();
        assert_eq!(props["Type"], "ON_DEMAND");
        assert!(!props.contains_key("Schedule"));
        assert_eq!(props["Actions"], json!([]));
    }
}
