//! crates/juris_resumo_core/src/summarize.rs
//!
//! Fans a text out to the technical and simplified generators concurrently and
//! reconciles the two results according to a `FanOutPolicy`.

use crate::domain::{GenerationOptions, Summaries, SummaryKind};
use crate::ports::{ProviderError, SummaryGenerator};
use futures::future::{join, try_join};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the two concurrent requests are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOutPolicy {
    /// Both requested summaries or none: the first failure fails the operation.
    #[default]
    AllOrNothing,
    /// Keep whichever requested summaries succeeded; fail only if all failed.
    BestEffort,
}

impl FromStr for FanOutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" => Ok(FanOutPolicy::AllOrNothing),
            "best_effort" => Ok(FanOutPolicy::BestEffort),
            other => Err(format!("unknown fan-out policy '{other}'")),
        }
    }
}

pub struct SummarizationClient {
    generator: Arc<dyn SummaryGenerator>,
    policy: FanOutPolicy,
}

impl SummarizationClient {
    pub fn new(generator: Arc<dyn SummaryGenerator>, policy: FanOutPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn policy(&self) -> FanOutPolicy {
        self.policy
    }

    async fn generate_if(
        &self,
        wanted: bool,
        text: &str,
        kind: SummaryKind,
        options: &GenerationOptions,
    ) -> Result<Option<String>, ProviderError> {
        if !wanted {
            return Ok(None);
        }
        debug!("Requesting {} summary ({} chars)", kind, text.chars().count());
        self.generator.generate(text, kind, options.size).await.map(Some)
    }

    /// Generates the requested summaries. No network call is made when nothing
    /// is requested.
    pub async fn generate_summaries(
        &self,
        text: &str,
        options: &GenerationOptions,
    ) -> Result<Summaries, ProviderError> {
        if options.is_empty() {
            return Ok(Summaries::default());
        }

        let technical =
            self.generate_if(options.generate_technical, text, SummaryKind::Technical, options);
        let simplified =
            self.generate_if(options.generate_simplified, text, SummaryKind::Simplified, options);

        match self.policy {
            FanOutPolicy::AllOrNothing => {
                let (technical, simplified) = try_join(technical, simplified).await?;
                Ok(Summaries { technical, simplified })
            }
            FanOutPolicy::BestEffort => {
                let (technical, simplified) = join(technical, simplified).await;
                match (technical, simplified) {
                    (Err(e), Err(_)) | (Err(e), Ok(None)) | (Ok(None), Err(e)) => Err(e),
                    (technical, simplified) => Ok(Summaries {
                        technical: keep_success(SummaryKind::Technical, technical),
                        simplified: keep_success(SummaryKind::Simplified, simplified),
                    }),
                }
            }
        }
    }
}

fn keep_success(
    kind: SummaryKind,
    result: Result<Option<String>, ProviderError>,
) -> Option<String> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Dropping failed {} summary: {}", kind, e);
            None
        }
    }
}
