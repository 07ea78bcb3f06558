use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Outcome of comparing a submitted photo against the stored reference.
#[derive(Debug, Clone)]
pub struct Verification {
    /// Match confidence in [0, 1]
    pub confidence: f32,
    /// Roll number of the closest stored embedding, if any
    pub matched_roll_no: Option<String>,
}

impl Verification {
    /// A mark passes as non-proxy only when the matched identity is the
    /// claimed one AND confidence clears the threshold.
    pub fn accepts(&self, expected_roll_no: &str, threshold: f32) -> bool {
        self.confidence >= threshold
            && self.matched_roll_no.as_deref() == Some(expected_roll_no)
    }
}

/// Narrow face-verification capability. Embedding generation, storage and
/// matching live behind this boundary; the attendance core only consumes
/// confidence scores.
#[async_trait]
pub trait PhotoVerifier: Send + Sync {
    /// Store a reference photo for a student.
    async fn enroll(&self, roll_no: &str, photo_base64: &str) -> anyhow::Result<()>;

    /// Compare a submitted photo against the stored reference.
    async fn verify(&self, roll_no: &str, photo_base64: &str) -> anyhow::Result<Verification>;

    /// Drop a student's stored embedding.
    async fn remove(&self, roll_no: &str) -> anyhow::Result<()>;
}

/// Stand-in used when no vector backend is configured: every photo passes at
/// fixed confidence, so nothing is flagged. Real providers (Qdrant etc.)
/// would implement `PhotoVerifier` and be selected here.
pub struct UnconfiguredVerifier;

#[async_trait]
impl PhotoVerifier for UnconfiguredVerifier {
    async fn enroll(&self, roll_no: &str, _photo_base64: &str) -> anyhow::Result<()> {
        warn!(roll_no, "Verifier not configured; photo enrollment skipped");
        Ok(())
    }

    async fn verify(&self, roll_no: &str, _photo_base64: &str) -> anyhow::Result<Verification> {
        warn!(roll_no, "Verifier not configured; accepting photo at fixed confidence");
        Ok(Verification {
            confidence: 0.95,
            matched_roll_no: Some(roll_no.to_string()),
        })
    }

    async fn remove(&self, roll_no: &str) -> anyhow::Result<()> {
        warn!(roll_no, "Verifier not configured; embedding removal skipped");
        Ok(())
    }
}

/// Build the verifier selected by `VERIFIER_PROVIDER`.
pub fn from_provider(provider: &str) -> Arc<dyn PhotoVerifier> {
    match provider {
        "none" => Arc::new(UnconfiguredVerifier),
        other => {
            warn!(provider = other, "Unknown verifier provider; falling back to none");
            Arc::new(UnconfiguredVerifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 0.85;

    fn verification(confidence: f32, matched: Option<&str>) -> Verification {
        Verification {
            confidence,
            matched_roll_no: matched.map(str::to_string),
        }
    }

    #[test]
    fn accepts_matching_identity_above_threshold() {
        assert!(verification(0.95, Some("S001")).accepts("S001", THRESHOLD));
        assert!(verification(0.85, Some("S001")).accepts("S001", THRESHOLD));
    }

    #[test]
    fn rejects_low_confidence() {
        assert!(!verification(0.40, Some("S001")).accepts("S001", THRESHOLD));
        assert!(!verification(0.8499, Some("S001")).accepts("S001", THRESHOLD));
    }

    #[test]
    fn rejects_identity_mismatch() {
        assert!(!verification(0.99, Some("S002")).accepts("S001", THRESHOLD));
        assert!(!verification(0.99, None).accepts("S001", THRESHOLD));
    }
}
