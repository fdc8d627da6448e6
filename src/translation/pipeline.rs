/*!
 * Streaming translation of a whole subtitle file.
 *
 * A job moves through `Loading -> Streaming -> Finalizing -> Done`, or ends
 * in `Failed` (error event, no file) or `Cancelled` (receiver dropped, no
 * file, no further events). Blocks are translated strictly one after the
 * other in source order, with a fixed pause after each block.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dictionary::Dictionary;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{self, join_blocks};
use super::chunk::{ChunkTranslator, TranslationRequestContext};
use super::events::TranslationEvent;

/// Where a job currently is, or how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Loading,
    Streaming,
    Finalizing,
    Done,
    Failed,
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// Settings that stay fixed across jobs
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Dictionary file, read at the start of every job
    pub dictionary_path: PathBuf,
    /// Directory receiving translated files
    pub output_dir: PathBuf,
    /// Language code appended to output file names
    pub target_language: String,
    /// Pause after each translated block
    pub inter_block_delay: Duration,
    /// Emit `skipped` events for unparsable blocks
    pub report_skipped_blocks: bool,
}

/// Summary of a finished job
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Terminal state reached
    pub state: PipelineState,
    /// Progress events emitted
    pub translated_blocks: usize,
    /// Candidates that did not parse
    pub skipped_blocks: usize,
    /// Written file, on success only
    pub output_path: Option<PathBuf>,
}

/// Signals that the receiving side went away
struct Cancelled;

/// Sequential, streaming subtitle translator
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    translator: ChunkTranslator,
    settings: PipelineSettings,
}

impl TranslationPipeline {
    pub fn new(translator: ChunkTranslator, settings: PipelineSettings) -> Self {
        Self { translator, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the job on a background task and hand back the event receiver.
    ///
    /// Dropping the receiver cancels the job.
    pub fn spawn(
        self: Arc<Self>,
        source: PathBuf,
        request: TranslationRequestContext,
        capacity: usize,
    ) -> (mpsc::Receiver<TranslationEvent>, JoinHandle<PipelineReport>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(async move { self.run(&source, &request, sender).await });
        (receiver, handle)
    }

    /// Translate `source`, pushing events into `events`.
    ///
    /// Exactly one terminal event is sent unless the receiver is dropped
    /// first. The sender is consumed so the stream ends with the job.
    pub async fn run(
        &self,
        source: &Path,
        request: &TranslationRequestContext,
        events: mpsc::Sender<TranslationEvent>,
    ) -> PipelineReport {
        let mut report = PipelineReport {
            state: PipelineState::Loading,
            translated_blocks: 0,
            skipped_blocks: 0,
            output_path: None,
        };

        info!("Translating {} with {}", source.display(), self.translator.provider_name());

        let outcome = self.execute(source, request, &events, &mut report).await;
        let terminal = match outcome {
            Ok(Ok(output_path)) => {
                let output_filename = output_path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                report.output_path = Some(output_path);
                Self::transition(&mut report, PipelineState::Done);
                TranslationEvent::Done { output_filename }
            }
            Ok(Err(e)) => {
                warn!("Translation of {} failed: {}", source.display(), e);
                Self::transition(&mut report, PipelineState::Failed);
                TranslationEvent::Error { message: e.user_message() }
            }
            Err(Cancelled) => {
                Self::transition(&mut report, PipelineState::Cancelled);
                info!("Client went away, translation of {} cancelled", source.display());
                return report;
            }
        };

        if events.send(terminal).await.is_err() {
            debug!("Receiver dropped before the terminal event");
        }

        report
    }

    async fn execute(
        &self,
        source: &Path,
        request: &TranslationRequestContext,
        events: &mpsc::Sender<TranslationEvent>,
        report: &mut PipelineReport,
    ) -> Result<Result<PathBuf, PipelineError>, Cancelled> {
        // Loading
        let dictionary = match Dictionary::load(&self.settings.dictionary_path) {
            Ok(dictionary) => dictionary,
            Err(e) => return Ok(Err(e.into())),
        };
        let content = match FileManager::read_source(source) {
            Ok(content) => content,
            Err(e) => return Ok(Err(e.into())),
        };

        Self::transition(report, PipelineState::Streaming);
        let mut rendered_blocks = Vec::new();

        for candidate in subtitle_processor::parse_candidates(&content) {
            let Some(block) = candidate.block else {
                report.skipped_blocks += 1;
                if self.settings.report_skipped_blocks {
                    let skipped = TranslationEvent::Skipped {
                        index: candidate.index,
                        raw: candidate.raw.to_string(),
                    };
                    Self::emit(events, skipped).await?;
                }
                continue;
            };

            if events.is_closed() {
                return Err(Cancelled);
            }

            let translated = match self.translator.translate_chunk(&block.original_text, request, &dictionary).await {
                Ok(text) => text,
                Err(e) => return Ok(Err(e.into())),
            };

            rendered_blocks.push(block.render_with_text(&translated));
            Self::emit(events, TranslationEvent::progress(&block, &translated)).await?;
            report.translated_blocks += 1;

            self.pace(events).await?;
        }

        // Finalizing
        Self::transition(report, PipelineState::Finalizing);
        if events.is_closed() {
            return Err(Cancelled);
        }

        let output_path = FileManager::generate_output_path(
            source,
            &self.settings.output_dir,
            &self.settings.target_language,
        );
        if let Err(e) = FileManager::write_atomic(&output_path, &join_blocks(&rendered_blocks)) {
            return Ok(Err(PipelineError::Output(e.to_string())));
        }

        info!(
            "Wrote {} translated blocks to {}",
            report.translated_blocks,
            output_path.display()
        );
        Ok(Ok(output_path))
    }

    /// Cooperative pause between blocks; wakes early if the receiver goes away
    async fn pace(&self, events: &mpsc::Sender<TranslationEvent>) -> Result<(), Cancelled> {
        if self.settings.inter_block_delay.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(self.settings.inter_block_delay) => Ok(()),
            _ = events.closed() => Err(Cancelled),
        }
    }

    async fn emit(events: &mpsc::Sender<TranslationEvent>, event: TranslationEvent) -> Result<(), Cancelled> {
        events.send(event).await.map_err(|_| Cancelled)
    }

    fn transition(report: &mut PipelineReport, next: PipelineState) {
        debug!("Pipeline state {:?} -> {:?}", report.state, next);
        report.state = next;
    }
}
