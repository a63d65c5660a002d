use tokio::sync::{Mutex, MutexGuard};

/// Identifies one invocation of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Tracks the newest invocation of one kind of remote request.
///
/// Starting a new invocation invalidates every older token, so a response
/// that arrives after a newer request was issued can be told apart and
/// dropped instead of overwriting fresher state.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: Mutex<u64>,
}

/// Held while a current invocation commits its result; newer invocations
/// cannot start until it is released.
pub struct Commit<'a> {
    _guard: MutexGuard<'a, u64>,
}

impl RequestGate {
    pub async fn begin(&self) -> RequestToken {
        let mut latest = self.latest.lock().await;
        *latest += 1;
        RequestToken(*latest)
    }

    /// Returns a commit guard if `token` is still the newest invocation.
    pub async fn claim(&self, token: RequestToken) -> Option<Commit<'_>> {
        let latest = self.latest.lock().await;
        (*latest == token.0).then(|| Commit { _guard: latest })
    }
}

#[derive(Debug, Default)]
pub struct Gates {
    pub analysis: RequestGate,
    pub challenges: RequestGate,
    pub prompt: RequestGate,
    pub examples: RequestGate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newer_token_invalidates_older() {
        let gate = RequestGate::default();
        let first = gate.begin().await;
        let second = gate.begin().await;

        assert!(gate.claim(first).await.is_none());
        assert!(gate.claim(second).await.is_some());
    }

    #[tokio::test]
    async fn token_stays_current_without_newer_requests() {
        let gate = RequestGate::default();
        let token = gate.begin().await;
        {
            let commit = gate.claim(token).await;
            assert!(commit.is_some());
        }
        assert!(gate.claim(token).await.is_some());
    }

    #[tokio::test]
    async fn gates_are_independent_per_kind() {
        let gates = Gates::default();
        let analysis = gates.analysis.begin().await;
        gates.examples.begin().await;
        assert!(gates.analysis.claim(analysis).await.is_some());
    }
}
