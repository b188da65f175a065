use crate::errors::ProviderError;
use crate::judge::Grader;
use crate::model::QualityVerdict;

pub(crate) enum AttemptOutcome {
    Verdict(QualityVerdict),
    /// The call succeeded but no verdict could be extracted.
    Unparseable { response_chars: usize },
    /// The call itself failed or timed out.
    Failed(anyhow::Error),
}

pub(crate) async fn call_grader_impl(grader: &Grader, prompt: &str) -> AttemptOutcome {
    let timeout = grader.config.timeout();
    let result = match tokio::time::timeout(timeout, grader.client.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            provider: grader.client.provider_name().to_string(),
            timeout,
        }
        .into()),
    };

    match result {
        Ok(resp) => match super::extract::extract(&resp.text) {
            Some(verdict) => AttemptOutcome::Verdict(verdict),
            None => AttemptOutcome::Unparseable {
                response_chars: resp.text.len(),
            },
        },
        Err(e) => AttemptOutcome::Failed(e),
    }
}
