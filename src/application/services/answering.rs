use std::sync::Arc;

use crate::application::ports::generation_provider::{ChatMessage, GenerationProvider};
use crate::application::services::retrieval::RetrievedContext;
use crate::domain::entities::{Answer, AnswerMode, Citation};
use crate::domain::repositories::chunk_repository::RankedChunk;

const GROUNDED_TEMPERATURE: f32 = 0.3;
const CONVERSATIONAL_TEMPERATURE: f32 = 0.7;
const SNIPPET_CHARS: usize = 200;

const GROUNDED_SYSTEM_PROMPT: &str = "You answer questions using only the numbered sources \
provided in the context. If the context does not contain the answer, say explicitly that the \
documents do not contain enough information. Cite the sources you used inline as [Source n].";

const CONVERSATIONAL_SYSTEM_PROMPT: &str = "You are a helpful assistant. No workspace documents \
are being used for this conversation; answer from general knowledge and keep a natural tone.";

const NO_CONTEXT_ANSWER: &str = "I couldn't find any information in this workspace's documents \
to answer that. Try uploading relevant documents first.";

const GENERATION_FAILED_ANSWER: &str = "I ran into a problem while generating an answer. \
Please try again.";

/// Builds the grounded context, asks the generation provider, and binds
/// citations. Per the error policy of the query path this service never
/// returns an error: every failure becomes a user-safe degraded answer
/// with the cause recorded in `Answer::failure`.
pub struct AnswerService {
    generation_provider: Arc<dyn GenerationProvider>,
    max_tokens: u32,
}

impl AnswerService {
    pub fn new(generation_provider: Arc<dyn GenerationProvider>, max_tokens: u32) -> Self {
        Self {
            generation_provider,
            max_tokens,
        }
    }

    pub async fn answer(
        &self,
        question: &str,
        context: &RetrievedContext,
        requested_mode: Option<AnswerMode>,
    ) -> Answer {
        let mode = requested_mode.unwrap_or(AnswerMode::Grounded);

        if mode == AnswerMode::Conversational {
            return self.converse(question, context.degraded).await;
        }

        if context.is_empty() {
            // Nothing to ground on: a flagged, citation-free reply, not an error.
            return Answer {
                text: NO_CONTEXT_ANSWER.to_string(),
                mode: AnswerMode::Grounded,
                citations: Vec::new(),
                insufficient_context: true,
                degraded: context.degraded,
                failure: None,
            };
        }

        let context_block = build_context_block(&context.chunks);
        let citations = map_citations(&context.chunks);

        let messages = [
            ChatMessage::system(GROUNDED_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Context:\n{}\n\nQuestion: {}",
                context_block, question
            )),
        ];

        match self
            .generation_provider
            .complete(&messages, GROUNDED_TEMPERATURE, self.max_tokens)
            .await
        {
            Ok(text) => Answer {
                text,
                mode: AnswerMode::Grounded,
                citations,
                insufficient_context: false,
                degraded: context.degraded,
                failure: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "grounded generation failed");
                Answer {
                    text: GENERATION_FAILED_ANSWER.to_string(),
                    mode: AnswerMode::Grounded,
                    citations: Vec::new(),
                    insufficient_context: false,
                    degraded: true,
                    failure: Some(error.to_string()),
                }
            }
        }
    }

    async fn converse(&self, question: &str, retrieval_degraded: bool) -> Answer {
        let messages = [
            ChatMessage::system(CONVERSATIONAL_SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];

        match self
            .generation_provider
            .complete(&messages, CONVERSATIONAL_TEMPERATURE, self.max_tokens)
            .await
        {
            Ok(text) => Answer {
                text,
                mode: AnswerMode::Conversational,
                citations: Vec::new(),
                insufficient_context: false,
                degraded: retrieval_degraded,
                failure: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "conversational generation failed");
                Answer {
                    text: GENERATION_FAILED_ANSWER.to_string(),
                    mode: AnswerMode::Conversational,
                    citations: Vec::new(),
                    insufficient_context: false,
                    degraded: true,
                    failure: Some(error.to_string()),
                }
            }
        }
    }
}

/// Concatenate retrieved chunks under numbered headers, in retrieval
/// order, so `[Source n]` references resolve against the citation list.
fn build_context_block(chunks: &[RankedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, ranked)| {
            format!(
                "Source {} ({}):\n{}",
                i + 1,
                ranked.document_title,
                ranked.chunk.chunk_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One citation per context chunk, indexed 1-based in assembly order.
fn map_citations(chunks: &[RankedChunk]) -> Vec<Citation> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, ranked)| Citation {
            index: i + 1,
            chunk_id: ranked.chunk.id(),
            document_id: ranked.chunk.document_id(),
            document_title: ranked.document_title.clone(),
            snippet: snippet_of(ranked.chunk.chunk_text()),
        })
        .collect()
}

fn snippet_of(text: &str) -> String {
    let mut chars = text.chars();
    let preview: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", preview)
    } else {
        preview
    }
}
