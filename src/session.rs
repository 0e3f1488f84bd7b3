//! Monitoring session identity.

use log::{debug, warn};
use uuid::Uuid;

use crate::api::ApiClient;

/// Locally-unique session identifier, usable before the service is reached.
pub fn generate_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

/// Establish a session with the service. On success the server-issued id
/// wins; on failure the local id stands so monitoring can proceed offline.
pub async fn establish(api: &ApiClient, user_identifier: Option<&str>) -> String {
    let local_id = generate_session_id();

    match api.create_session(user_identifier).await {
        Ok(record) => {
            debug!("session registered as {}", record.session_id);
            record.session_id
        }
        Err(err) => {
            warn!("session registration failed, continuing with local id: {err:#}");
            local_id
        }
    }
}

/// Close the session server-side, best-effort.
pub async fn end(api: &ApiClient, session_id: &str) {
    if let Err(err) = api.end_session(session_id).await {
        warn!("failed to end session {session_id}: {err:#}");
    }
}
