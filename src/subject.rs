//! Subject construction for per-client routing
//!
//! Notifications for a client are published on `{prefix}.{client_id}`.
//! Consumers subscribe per client with the same pattern.

/// Characters with routing meaning in NATS subjects
const RESERVED: [char; 4] = [' ', '.', '*', '>'];

/// Default subject prefix
pub const DEFAULT_PREFIX: &str = "notifications";

/// Replace separator and wildcard characters with `_` so the input stays a
/// single literal subject token
pub fn sanitize_for_subject(input: &str) -> String {
    input.replace(RESERVED, "_")
}

/// Build the subject for a client
pub fn build_subject(prefix: &str, client_id: &str) -> String {
    format!("{}.{}", prefix, sanitize_for_subject(client_id))
}

/// Reject subjects NATS will not route
///
/// The prefix is not sanitized, so a prefix containing a space fails here.
pub fn validate_subject(subject: &str) -> bool {
    !subject.is_empty() && !subject.contains(' ')
}
