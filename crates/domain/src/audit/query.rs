use super::entity::AuditEvent;

/// Optional filters for looking up audit events. Unset filters match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Exact principal match.
    pub principal: Option<String>,
    /// Lower time bound (inclusive, nanoseconds since epoch).
    pub after_ns: Option<u64>,
    /// Exact action tag match.
    pub event_type: Option<String>,
}

impl AuditFilter {
    #[must_use]
    pub fn principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    #[must_use]
    pub fn after(mut self, after_ns: u64) -> Self {
        self.after_ns = Some(after_ns);
        self
    }

    #[must_use]
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Check whether an `AuditEvent` matches all active filters.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(ref principal) = self.principal
            && event.principal != *principal
        {
            return false;
        }
        if let Some(after) = self.after_ns
            && event.timestamp_ns < after
        {
            return false;
        }
        if let Some(ref event_type) = self.event_type
            && event.event_type != *event_type
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entity::{AuditCommand, AuditStatus};

    fn make_event(action: &str, ts: u64) -> AuditEvent {
        AuditEvent::from_command(AuditCommand::new(action, AuditStatus::Success).at(ts))
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = AuditFilter::default();
        assert!(f.matches(&make_event("CREATE_CUSTOMER", 1)));
    }

    #[test]
    fn after_is_inclusive() {
        let f = AuditFilter::default().after(500);
        assert!(!f.matches(&make_event("X", 499)));
        assert!(f.matches(&make_event("X", 500)));
        assert!(f.matches(&make_event("X", 501)));
    }

    #[test]
    fn principal_filter() {
        let f = AuditFilter::default().principal("SYSTEM");
        assert!(f.matches(&make_event("X", 1)));

        let mut other = make_event("X", 1);
        other.principal = "alice".to_string();
        assert!(!f.matches(&other));
    }

    #[test]
    fn type_filter() {
        let f = AuditFilter::default().event_type("DELETE_CUSTOMER");
        assert!(f.matches(&make_event("DELETE_CUSTOMER", 1)));
        assert!(!f.matches(&make_event("CREATE_CUSTOMER", 1)));
    }

    #[test]
    fn combined_filters() {
        let f = AuditFilter::default()
            .principal("SYSTEM")
            .after(100)
            .event_type("UPDATE_CUSTOMER");
        assert!(f.matches(&make_event("UPDATE_CUSTOMER", 300)));
        assert!(!f.matches(&make_event("UPDATE_CUSTOMER", 50)));
        assert!(!f.matches(&make_event("CREATE_CUSTOMER", 300)));
    }
}
