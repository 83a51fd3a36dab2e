use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Producers in other languages emit `null` for empty lists and maps
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Email switch for a single workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEmailPreference {
    pub enabled: bool,
}

/// Per-organization notification recipients and workflow switches
///
/// Not used by the publisher; shared with services that read the same
/// payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationNotificationPreferences {
    pub id: String,
    pub org_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub internal_emails: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub external_emails: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub workflows: HashMap<String, WorkflowEmailPreference>,
}

impl OrganizationNotificationPreferences {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            ..Default::default()
        }
    }

    /// Unknown workflows count as disabled
    pub fn is_workflow_enabled(&self, workflow_id: &str) -> bool {
        self.workflows
            .get(workflow_id)
            .is_some_and(|pref| pref.enabled)
    }

    pub fn set_workflow_enabled(&mut self, workflow_id: impl Into<String>, enabled: bool) {
        self.workflows
            .insert(workflow_id.into(), WorkflowEmailPreference { enabled });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> OrganizationNotificationPreferences {
        OrganizationNotificationPreferences {
            internal_emails: vec!["admin@company.com".to_string(), "dev@company.com".to_string()],
            external_emails: vec!["client@external.com".to_string()],
            ..OrganizationNotificationPreferences::new("org1")
        }
    }

    #[test]
    fn test_unknown_workflow_is_disabled() {
        assert!(!prefs().is_workflow_enabled("wf-1"));
    }

    #[test]
    fn test_workflow_can_be_toggled() {
        let mut prefs = prefs();
        prefs.set_workflow_enabled("wf-2", true);
        assert!(prefs.is_workflow_enabled("wf-2"));
        prefs.set_workflow_enabled("wf-2", false);
        assert!(!prefs.is_workflow_enabled("wf-2"));
    }

    #[test]
    fn test_json_keeps_email_lists_and_workflows() {
        let mut prefs = prefs();
        prefs.set_workflow_enabled("wf-3", true);

        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("\"internal_emails\""));
        assert!(json.contains("\"workflows\":{\"wf-3\":{\"enabled\":true}}"));

        let out: OrganizationNotificationPreferences = serde_json::from_str(&json).unwrap();
        assert_eq!(out, prefs);
        assert_eq!(out.internal_emails.len(), 2);
        assert_eq!(out.external_emails.len(), 1);
    }

    #[test]
    fn test_null_workflows_decode_as_empty() {
        let out: OrganizationNotificationPreferences =
            serde_json::from_str(r#"{"org_id":"org2","internal_emails":null,"workflows":null}"#)
                .unwrap();
        assert_eq!(out.org_id, "org2");
        assert!(out.internal_emails.is_empty());
        assert!(out.external_emails.is_empty());
        assert!(out.workflows.is_empty());
    }
}
