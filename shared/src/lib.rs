pub mod models {
    pub mod game;
    pub mod participant;
    pub mod tab;
}

pub mod dto {
    pub mod removal;
}

pub mod config;
pub mod error;
pub mod placement;


// Re-export commonly used items
pub use error::{SharedError, Result};

pub use models::{
    game::{GameCard, GameQuery},
    participant::{Participant, ParticipantId, RemovalKind},
    tab::{ActiveTab, TabSet},
};

pub use dto::removal::{interpret_reply, HttpReply, RemovalAck, RemovalResponse, GENERIC_FAILURE};

pub use config::{
    ClientConfig, Deployment, Endpoint, EndpointPolicy, EndpointTemplate, GameFilterSelectors,
    ResponseShape,
};

pub use placement::{clamp_to_viewport, Point, Size};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_removal_endpoint_for_each_deployment() {
        let policy = EndpointPolicy::default();
        let id = ParticipantId::new("42").unwrap();

        let hosted = policy.api_endpoint(RemovalKind::Complete, Deployment::Hosted, &id);
        assert_eq!(hosted.url, "/api/complete-remove-user/42");

        let local = policy.api_endpoint(RemovalKind::Complete, Deployment::Local, &id);
        assert_eq!(local.url, "/admin/api-complete-remove-user/42");
    }

    #[test]
    fn test_partial_removal_ignores_deployment() {
        let policy = EndpointPolicy::default();
        let id = ParticipantId::new("42").unwrap();
        for deployment in [Deployment::Local, Deployment::Hosted] {
            let endpoint = policy.api_endpoint(RemovalKind::Partial, deployment, &id);
            assert_eq!(endpoint.url, "/api/remove-user/42");
            assert_eq!(endpoint.shape, ResponseShape::Json);
        }
    }

    #[test]
    fn test_fallback_form_carries_tab() {
        let policy = EndpointPolicy::default();
        let id = ParticipantId::new("9").unwrap();
        let tab = TabSet::default().resolve([Some("gamesctl")]);
        let endpoint = policy.fallback_form_endpoint(&id, &tab);
        assert_eq!(endpoint.url, "/admin/user/remove/9?tab=gamesctl");
        assert_eq!(endpoint.shape, ResponseShape::Redirect);
        assert_eq!(policy.form_action(&id), "/admin/user/remove/9");
    }
}
