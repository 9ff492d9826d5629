use super::error::ScriptGenerationError;
use super::prompts::{self, EDITOR_SYSTEM_PROMPT, HOST_SYSTEM_PROMPT};
use super::{ChunkFailurePolicy, GenerationMode, GenerationRequest};
use crate::domain::content::length::SINGLE_PASS_INSTRUCTION;
use crate::domain::content::{classify, Chunker, ContentCategory, LengthPlanner, LengthTier, TextChunk};
use crate::infrastructure::repositories::TextGenerationRepository;
use std::sync::Arc;

/// Below this many characters (after trimming) there is not enough signal for a script
pub const MIN_SCRIPT_CONTENT_LENGTH: usize = 50;

const SCRIPT_TEMPERATURE: f32 = 0.7;
const COMBINE_TEMPERATURE: f32 = 0.6;
const SMOKE_TEST_MAX_TOKENS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScript {
    pub script: String,
    pub category: ContentCategory,
    pub tier: LengthTier,
    pub chunk_count: usize,
    /// Chunks whose generation failed and were left out of the script
    pub dropped_chunks: Vec<usize>,
}

/// Turns extracted text into a spoken podcast script
pub struct ScriptGenerator {
    backend: Option<Arc<dyn TextGenerationRepository>>,
    planner: LengthPlanner,
    chunker: Chunker,
    mode: GenerationMode,
    failure_policy: ChunkFailurePolicy,
    max_output_tokens: Option<u32>,
}

impl ScriptGenerator {
    pub fn new(
        backend: Option<Arc<dyn TextGenerationRepository>>,
        planner: LengthPlanner,
        chunker: Chunker,
        mode: GenerationMode,
        failure_policy: ChunkFailurePolicy,
    ) -> Self {
        Self {
            backend,
            planner,
            chunker,
            mode,
            failure_policy,
            max_output_tokens: None,
        }
    }

    /// Cap every request's budget at the backend model's completion limit
    pub fn with_max_output_tokens(mut self, limit: u32) -> Self {
        self.max_output_tokens = Some(limit);
        self
    }

    fn budget(&self, tokens: u32) -> u32 {
        match self.max_output_tokens {
            Some(limit) => tokens.min(limit),
            None => tokens,
        }
    }

    /// Name and model of the configured backend, if any
    pub fn backend_info(&self) -> Option<(&'static str, String)> {
        self.backend
            .as_ref()
            .map(|backend| (backend.name(), backend.model().to_string()))
    }

    /// Generate a podcast script for `text`.
    ///
    /// Short input is rejected before any backend call is made.
    pub async fn generate(&self, text: &str) -> Result<GeneratedScript, ScriptGenerationError> {
        let trimmed_length = text.trim().chars().count();
        if trimmed_length < MIN_SCRIPT_CONTENT_LENGTH {
            tracing::info!(
                trimmed_length = trimmed_length,
                minimum = MIN_SCRIPT_CONTENT_LENGTH,
                "Text too short for script generation"
            );
            return Err(ScriptGenerationError::InsufficientContent {
                minimum: MIN_SCRIPT_CONTENT_LENGTH,
                actual: trimmed_length,
            });
        }

        let backend = self
            .backend
            .as_ref()
            .ok_or(ScriptGenerationError::BackendUnavailable)?;

        let category = classify(text);
        let plan = self.planner.plan(text.len());

        tracing::info!(
            content_type = %category,
            length_tier = %plan.tier,
            max_tokens = plan.max_tokens,
            text_length = text.len(),
            mode = ?self.mode,
            "Planning podcast script"
        );

        if self.mode == GenerationMode::SinglePass {
            let request = GenerationRequest {
                system_prompt: HOST_SYSTEM_PROMPT.to_string(),
                user_prompt: prompts::script_prompt(SINGLE_PASS_INSTRUCTION, category, text, None),
                max_tokens: self.budget(self.planner.max_budget()),
                temperature: SCRIPT_TEMPERATURE,
                stream: true,
            };
            let script = backend
                .generate(&request)
                .await
                .map_err(ScriptGenerationError::GenerationFailed)?;

            return Ok(GeneratedScript {
                script,
                category,
                tier: plan.tier,
                chunk_count: 1,
                dropped_chunks: Vec::new(),
            });
        }

        let chunks = self.chunker.chunk(text);
        tracing::info!(chunk_count = chunks.len(), "Content chunked");

        if chunks.len() == 1 {
            let request = GenerationRequest {
                system_prompt: HOST_SYSTEM_PROMPT.to_string(),
                user_prompt: prompts::script_prompt(plan.instruction, category, &chunks[0].text, None),
                max_tokens: self.budget(plan.max_tokens),
                temperature: SCRIPT_TEMPERATURE,
                stream: false,
            };
            let script = backend
                .generate(&request)
                .await
                .map_err(ScriptGenerationError::GenerationFailed)?;

            return Ok(GeneratedScript {
                script,
                category,
                tier: plan.tier,
                chunk_count: 1,
                dropped_chunks: Vec::new(),
            });
        }

        let (segments, dropped_chunks) = self
            .generate_segments(
                backend.as_ref(),
                &chunks,
                plan.instruction,
                category,
                self.budget(plan.max_tokens),
            )
            .await?;

        if segments.is_empty() {
            return Err(ScriptGenerationError::GenerationFailed(format!(
                "all {} chunks failed to generate",
                chunks.len()
            )));
        }

        let script = self
            .combine_segments(backend.as_ref(), &segments, self.budget(plan.max_tokens))
            .await;

        Ok(GeneratedScript {
            script,
            category,
            tier: plan.tier,
            chunk_count: chunks.len(),
            dropped_chunks,
        })
    }

    /// One call per chunk, strictly in order. Returns the successful segments
    /// and the 1-based indices of dropped chunks.
    async fn generate_segments(
        &self,
        backend: &dyn TextGenerationRepository,
        chunks: &[TextChunk],
        length_instruction: &str,
        category: ContentCategory,
        max_tokens: u32,
    ) -> Result<(Vec<String>, Vec<usize>), ScriptGenerationError> {
        let total = chunks.len();
        let per_chunk_tokens = max_tokens / total as u32;
        let mut segments = Vec::with_capacity(total);
        let mut dropped = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            let part = index + 1;
            let request = GenerationRequest {
                system_prompt: HOST_SYSTEM_PROMPT.to_string(),
                user_prompt: prompts::script_prompt(
                    length_instruction,
                    category,
                    &chunk.text,
                    Some((part, total)),
                ),
                max_tokens: per_chunk_tokens,
                temperature: SCRIPT_TEMPERATURE,
                stream: false,
            };

            match backend.generate(&request).await {
                Ok(segment) => {
                    tracing::info!(
                        part = part,
                        total = total,
                        segment_length = segment.len(),
                        "Chunk script generated"
                    );
                    segments.push(segment);
                }
                Err(e) => match self.failure_policy {
                    ChunkFailurePolicy::DropAndContinue => {
                        tracing::warn!(
                            part = part,
                            total = total,
                            chunk_length = chunk.body().len(),
                            error = %e,
                            "Chunk generation failed, dropping its content"
                        );
                        dropped.push(part);
                    }
                    ChunkFailurePolicy::AbortOnFirstFailure => {
                        tracing::error!(
                            part = part,
                            total = total,
                            error = %e,
                            "Chunk generation failed, aborting"
                        );
                        return Err(ScriptGenerationError::GenerationFailed(format!(
                            "chunk {} of {} failed: {}",
                            part, total, e
                        )));
                    }
                },
            }
        }

        Ok((segments, dropped))
    }

    /// Combination pass. Falls back to a plain join if the call fails.
    async fn combine_segments(
        &self,
        backend: &dyn TextGenerationRepository,
        segments: &[String],
        max_tokens: u32,
    ) -> String {
        let request = GenerationRequest {
            system_prompt: EDITOR_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::combine_prompt(segments),
            max_tokens,
            temperature: COMBINE_TEMPERATURE,
            stream: false,
        };

        match backend.generate(&request).await {
            Ok(script) => script,
            Err(e) => {
                tracing::warn!(
                    segment_count = segments.len(),
                    error = %e,
                    "Combination pass failed, joining segments directly"
                );
                segments.join("\n\n")
            }
        }
    }

    /// Tiny round trip to check the backend answers
    pub async fn smoke_test(&self) -> Result<String, ScriptGenerationError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(ScriptGenerationError::BackendUnavailable)?;

        let request = GenerationRequest {
            system_prompt: HOST_SYSTEM_PROMPT.to_string(),
            user_prompt: prompts::SMOKE_TEST_PROMPT.to_string(),
            max_tokens: SMOKE_TEST_MAX_TOKENS,
            temperature: SCRIPT_TEMPERATURE,
            stream: false,
        };

        backend
            .generate(&request)
            .await
            .map_err(ScriptGenerationError::GenerationFailed)
    }
}
