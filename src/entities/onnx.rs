// Local ONNX entity recognizer using bert-base-NER (CoNLL-2003 labels).
//
// The whole document is tokenized once without special tokens, split into
// windows that fit the model's 512-token limit, and each window is wrapped in
// [CLS] ... [SEP]. Windows run in batches of at most MAX_WINDOWS_PER_RUN.
// Per-token argmax labels are decoded from BIO tags back into spans of the
// original text using the tokenizer's byte offsets, so entity text is exactly
// what appears in the document.
//
// Model: Xenova/bert-base-NER (quantized ONNX export of dslim/bert-base-NER)

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::{Entity, EntityRecognizer};

/// Output labels in model order.
pub const LABELS: [&str; 9] = [
    "O", "B-MISC", "I-MISC", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC",
];

/// Model sequence limit including [CLS] and [SEP].
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Windows per forward pass. Long documents run as several passes so
/// activation memory stays bounded.
const MAX_WINDOWS_PER_RUN: usize = 8;

/// A token's span in the source text and its predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTag {
    /// Byte offset where the token starts
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
    /// Index of the word this token belongs to; subwords share it
    pub word: Option<u32>,
    /// Index into `LABELS`
    pub label: usize,
}

/// ONNX-backed recognizer. Session and tokenizer sit behind Arcs so inference
/// can move onto spawn_blocking.
pub struct OnnxEntityRecognizer {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    cls_id: u32,
    sep_id: u32,
}

impl OnnxEntityRecognizer {
    /// Load `model_quantized.onnx` and `tokenizer.json` from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model_quantized.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "NER model not found: {}\nRun `lectern download-models` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "NER tokenizer not found: {}\nRun `lectern download-models` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load NER model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load NER tokenizer: {}", e))?;
        // Windowing is done here, so the tokenizer must hand back every token
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("Failed to disable tokenizer truncation: {}", e))?;
        tokenizer.with_padding(None);

        let cls_id = tokenizer
            .token_to_id("[CLS]")
            .context("NER tokenizer has no [CLS] token")?;
        let sep_id = tokenizer
            .token_to_id("[SEP]")
            .context("NER tokenizer has no [SEP] token")?;

        debug!("Loaded NER model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            cls_id,
            sep_id,
        })
    }
}

#[async_trait]
impl EntityRecognizer for OnnxEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();
        let (cls_id, sep_id) = (self.cls_id, self.sep_id);

        tokio::task::spawn_blocking(move || {
            let tags = tag_sync(&session, &tokenizer, &text, cls_id, sep_id)?;
            Ok(decode_entities(&text, &tags))
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Tokenize, window, run inference, and return one tag per token.
fn tag_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    text: &str,
    cls_id: u32,
    sep_id: u32,
) -> Result<Vec<TokenTag>> {
    let encoding = tokenizer
        .encode(text, false)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    let ids = encoding.get_ids();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let offsets = encoding.get_offsets();
    let word_ids = encoding.get_word_ids();

    let window = MAX_SEQUENCE_LENGTH - 2;
    let windows: Vec<&[u32]> = ids.chunks(window).collect();

    let mut tags = Vec::with_capacity(ids.len());
    for group in windows.chunks(MAX_WINDOWS_PER_RUN) {
        let batch = WindowBatch::build(group, cls_id, sep_id);
        let max_len = batch.max_len;
        let logits = run_batch(session, batch)?;
        let first_token = tags.len();
        tags.extend(tags_from_logits(
            &logits,
            group,
            first_token,
            max_len,
            offsets,
            word_ids,
        )?);
    }

    debug!(tokens = tags.len(), windows = windows.len(), "Tagged tokens");
    Ok(tags)
}

/// Padded model inputs for one group of windows.
#[derive(Debug)]
struct WindowBatch {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    batch_size: usize,
    /// Row length including [CLS] and [SEP]
    max_len: usize,
}

impl WindowBatch {
    fn build(windows: &[&[u32]], cls_id: u32, sep_id: u32) -> Self {
        let batch_size = windows.len();
        let max_len = windows.iter().map(|w| w.len()).max().unwrap_or(0) + 2;

        let mut input_ids = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask = Vec::with_capacity(batch_size * max_len);

        for w in windows {
            input_ids.push(cls_id as i64);
            input_ids.extend(w.iter().map(|&id| id as i64));
            input_ids.push(sep_id as i64);
            attention_mask.extend(std::iter::repeat_n(1i64, w.len() + 2));

            let pad_len = max_len - (w.len() + 2);
            input_ids.extend(std::iter::repeat_n(0i64, pad_len));
            attention_mask.extend(std::iter::repeat_n(0i64, pad_len));
        }

        Self {
            input_ids,
            attention_mask,
            batch_size,
            max_len,
        }
    }
}

/// One forward pass; returns the flat [batch, seq_len, labels] logits.
fn run_batch(session: &Arc<Mutex<Session>>, batch: WindowBatch) -> Result<Vec<f32>> {
    let shape = [batch.batch_size as i64, batch.max_len as i64];
    let token_type_ids = vec![0i64; batch.batch_size * batch.max_len];

    let input_ids_tensor =
        Tensor::from_array((shape, batch.input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, batch.attention_mask))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids))
        .context("Failed to create token_type_ids tensor")?;

    let mut session = session
        .lock()
        .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

    let outputs = session
        .run(ort::inputs! {
            "input_ids" => input_ids_tensor,
            "attention_mask" => attention_mask_tensor,
            "token_type_ids" => token_type_ids_tensor
        })
        .context("NER ONNX inference failed")?;

    let (_shape, data) = outputs[0]
        .try_extract_tensor::<f32>()
        .context("Failed to extract NER output tensor")?;

    Ok(data.to_vec())
}

/// Map a group's logits back onto document tokens.
///
/// `first_token` is the document index of the group's first token; windows
/// are consecutive, so token indices continue across rows and groups.
fn tags_from_logits(
    logits: &[f32],
    windows: &[&[u32]],
    first_token: usize,
    max_len: usize,
    offsets: &[(usize, usize)],
    word_ids: &[Option<u32>],
) -> Result<Vec<TokenTag>> {
    let num_labels = LABELS.len();
    let expected = windows.len() * max_len * num_labels;
    if logits.len() != expected {
        anyhow::bail!(
            "NER output has {} values, expected {}",
            logits.len(),
            expected
        );
    }

    let mut tags = Vec::new();
    let mut token_index = first_token;
    for (b, w) in windows.iter().enumerate() {
        for j in 0..w.len() {
            // +1 skips [CLS]
            let offset = (b * max_len + j + 1) * num_labels;
            let label = argmax(&logits[offset..offset + num_labels]);
            let (start, end) = *offsets
                .get(token_index)
                .context("NER token index past the encoding")?;
            tags.push(TokenTag {
                start,
                end,
                word: word_ids.get(token_index).copied().flatten(),
                label,
            });
            token_index += 1;
        }
    }
    Ok(tags)
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0
}

/// Collapse BIO token tags into entity spans.
///
/// Subword tokens of a word already inside an entity extend it whatever their
/// own label. An `I-X` that doesn't continue an `X` entity starts a new one.
pub fn decode_entities(text: &str, tags: &[TokenTag]) -> Vec<Entity> {
    struct Open {
        kind: &'static str,
        start: usize,
        end: usize,
        word: Option<u32>,
    }

    fn close(text: &str, open: Option<Open>, out: &mut Vec<Entity>) {
        if let Some(o) = open {
            if let Some(span) = text.get(o.start..o.end) {
                let span = span.trim();
                if !span.is_empty() {
                    out.push(Entity::new(span, o.kind));
                }
            }
        }
    }

    let mut entities = Vec::new();
    let mut current: Option<Open> = None;

    for tag in tags {
        if let Some(open) = current.as_mut() {
            if tag.word.is_some() && tag.word == open.word {
                open.end = open.end.max(tag.end);
                continue;
            }
        }

        let label = LABELS.get(tag.label).copied().unwrap_or("O");
        let (prefix, kind) = match label.split_once('-') {
            Some((p, k)) => (p, k),
            None => {
                close(text, current.take(), &mut entities);
                continue;
            }
        };

        let continues = prefix == "I" && current.as_ref().is_some_and(|o| o.kind == kind);
        if continues {
            if let Some(open) = current.as_mut() {
                open.end = open.end.max(tag.end);
                open.word = tag.word;
            }
        } else {
            close(text, current.take(), &mut entities);
            current = Some(Open {
                kind,
                start: tag.start,
                end: tag.end,
                word: tag.word,
            });
        }
    }
    close(text, current.take(), &mut entities);

    entities
}
