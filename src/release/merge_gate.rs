//! Production gate on open merge requests

use crate::error::Result;
use crate::gateway::MergeRequestGateway;
use crate::interaction::{ProgressDisplay, Prompter};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Blocked { open_merge_requests: usize },
}

/// Re-queries the gateway every time the operator claims the merge requests
/// are handled, until the count is zero or the operator gives up.
pub struct MergeGate {
    gateway: Arc<dyn MergeRequestGateway>,
    prompter: Arc<dyn Prompter>,
    display: Arc<dyn ProgressDisplay>,
    merge_requests_url: String,
}

impl MergeGate {
    pub fn new(
        gateway: Arc<dyn MergeRequestGateway>,
        prompter: Arc<dyn Prompter>,
        display: Arc<dyn ProgressDisplay>,
        merge_requests_url: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            prompter,
            display,
            merge_requests_url: merge_requests_url.into(),
        }
    }

    pub async fn clearance(&self) -> Result<GateDecision> {
        let mut round = 1usize;
        loop {
            let open = self.gateway.open_merge_requests().await?;
            tracing::debug!("Merge gate round {}: {} open", round, open);

            if open == 0 {
                return Ok(GateDecision::Proceed);
            }

            self.display.warning(&format!(
                "{open} open merge request(s) must be handled before releasing: {}",
                self.merge_requests_url
            ));

            if !self
                .prompter
                .confirm("Have all merge requests been merged?")
                .await?
            {
                return Ok(GateDecision::Blocked {
                    open_merge_requests: open,
                });
            }
            round += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::gateway::GatewayError;
    use crate::testing::{Answer, RecordingDisplay, ScriptedPrompter, StubGateway};

    fn gate(gateway: &StubGateway, prompter: &ScriptedPrompter, display: &RecordingDisplay) -> MergeGate {
        MergeGate::new(
            Arc::new(gateway.clone()),
            Arc::new(prompter.clone()),
            Arc::new(display.clone()),
            "https://gitlab.example.com/team/web-app/-/merge_requests",
        )
    }

    #[tokio::test]
    async fn test_zero_open_requests_proceeds_without_prompt() {
        let gateway = StubGateway::counts([0]);
        let prompter = ScriptedPrompter::default();
        let display = RecordingDisplay::new();

        let decision = gate(&gateway, &prompter, &display).clearance().await.unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(gateway.calls(), 1);
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_gate_requeries_until_clear() {
        let gateway = StubGateway::counts([3, 1, 0]);
        let prompter = ScriptedPrompter::new([Answer::Confirm(true), Answer::Confirm(true)]);
        let display = RecordingDisplay::new();

        let decision = gate(&gateway, &prompter, &display).clearance().await.unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(gateway.calls(), 3);
        assert_eq!(prompter.remaining(), 0);
        assert!(display.contains("3 open merge request(s)"));
        assert!(display.contains("/-/merge_requests"));
    }

    #[tokio::test]
    async fn test_declining_blocks_after_one_query() {
        let gateway = StubGateway::counts([3]);
        let prompter = ScriptedPrompter::new([Answer::Confirm(false)]);
        let display = RecordingDisplay::new();

        let decision = gate(&gateway, &prompter, &display).clearance().await.unwrap();

        assert_eq!(
            decision,
            GateDecision::Blocked {
                open_merge_requests: 3
            }
        );
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_fatal() {
        let gateway = StubGateway::failing(GatewayError::Unauthorized(401));
        let prompter = ScriptedPrompter::default();
        let display = RecordingDisplay::new();

        let err = gate(&gateway, &prompter, &display).clearance().await.unwrap_err();

        assert!(matches!(err, ReleaseError::Gateway(GatewayError::Unauthorized(401))));
        assert_eq!(err.exit_code(), 5);
    }
}
