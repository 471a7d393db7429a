use crate::config::EmbeddingSettings;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{
    BertModel, Config as BertConfig, HiddenAct, PositionEmbeddingType,
};
use once_cell::sync::OnceCell;
use std::path::Path;
use thiserror::Error;
use tokenizers::Tokenizer;
use tracing::{debug, info};

/// Errors that can occur when producing or comparing embeddings
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model is not available (looked for {0})")]
    ModelNotReady(String),

    #[error("failed to read model weights: {0}")]
    Io(#[from] std::io::Error),

    #[error("model error: {0}")]
    Model(#[from] candle_core::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("embedding dimensions don't match: {0} vs {1}")]
    DimensionMismatch(usize, usize),

    #[error("zero magnitude embedding vector")]
    ZeroMagnitude,
}

struct LoadedModel {
    model: BertModel,
    tokenizer: Tokenizer,
}

/// Sentence-embedding engine wrapping a MiniLM BERT encoder.
///
/// Constructed once by the composition root and shared via `Arc`. The model
/// weights are loaded lazily on first use; the load is serialized and the
/// result reused by every subsequent call. Two embeddings are only comparable
/// when produced by the same engine instance.
pub struct EmbeddingEngine {
    settings: EmbeddingSettings,
    device: Device,
    loaded: OnceCell<LoadedModel>,
    cache: moka::sync::Cache<String, Vec<f32>>,
}

impl EmbeddingEngine {
    pub fn new(settings: EmbeddingSettings) -> Self {
        let cache = moka::sync::Cache::new(settings.cache_size);
        Self {
            settings,
            device: Device::Cpu,
            loaded: OnceCell::new(),
            cache,
        }
    }

    /// Eagerly load model and tokenizer. Idempotent; safe to call from a
    /// warm-up task while requests are already being served.
    pub fn load(&self) -> Result<(), EmbeddingError> {
        self.ensure_loaded().map(|_| ())
    }

    /// Whether the model has been loaded successfully
    pub fn is_ready(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn dimensions(&self) -> usize {
        self.settings.dimensions
    }

    fn ensure_loaded(&self) -> Result<&LoadedModel, EmbeddingError> {
        self.loaded.get_or_try_init(|| {
            if !Path::new(&self.settings.model_path).exists()
                || !Path::new(&self.settings.tokenizer_path).exists()
            {
                return Err(EmbeddingError::ModelNotReady(format!(
                    "{}, {}",
                    self.settings.model_path, self.settings.tokenizer_path
                )));
            }

            info!("Loading embedding model from {}", self.settings.model_path);

            let bert_config = BertConfig {
                hidden_size: self.settings.dimensions,
                intermediate_size: self.settings.dimensions * 4,
                max_position_embeddings: 512,
                num_attention_heads: 12,
                num_hidden_layers: 6,
                vocab_size: 30522,
                layer_norm_eps: 1e-12,
                pad_token_id: 0,
                hidden_act: HiddenAct::Gelu,
                hidden_dropout_prob: 0.0,
                type_vocab_size: 2,
                initializer_range: 0.02,
                position_embedding_type: PositionEmbeddingType::Absolute,
                use_cache: false,
                classifier_dropout: None,
                model_type: None,
            };

            let tensors = candle_core::safetensors::load_buffer(
                &std::fs::read(&self.settings.model_path)?,
                &self.device,
            )?;
            let vb = VarBuilder::from_tensors(tensors, DType::F32, &self.device);
            let model = BertModel::load(vb, &bert_config)?;

            let tokenizer = Tokenizer::from_file(&self.settings.tokenizer_path)
                .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

            info!(
                "Embedding model loaded ({} dimensions)",
                self.settings.dimensions
            );

            Ok(LoadedModel { model, tokenizer })
        })
    }

    /// Embed a rendered profile text into a normalized fixed-size vector.
    ///
    /// Inference is CPU-bound and synchronous; callers on async paths should
    /// treat this as a blocking call.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(vector) = self.cache.get(text) {
            return Ok(vector);
        }

        let loaded = self.ensure_loaded()?;

        let encoding = loaded
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        // Truncate to max_length - 1 to avoid index boundary issues
        let max_len = self.settings.max_length - 1;
        let input_ids: Vec<i64> = encoding
            .get_ids()
            .iter()
            .take(max_len)
            .map(|&x| x as i64)
            .collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .take(max_len)
            .map(|&x| x as i64)
            .collect();

        let input_ids = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(attention_mask, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden_state = loaded
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over valid tokens
        let mask_f = attention_mask.to_dtype(DType::F32)?;
        let mask_expanded = mask_f.unsqueeze(2)?.expand(hidden_state.shape())?;
        let masked_hidden = hidden_state.mul(&mask_expanded)?;
        let summed_hidden = masked_hidden.sum(1)?;
        let valid_token_counts = mask_f.sum(1)?.unsqueeze(1)?.clamp(1.0, f32::MAX)?;
        let mean_pooled =
            summed_hidden.div(&valid_token_counts.expand(summed_hidden.shape())?)?;

        // L2 normalize
        let norm = mean_pooled.sqr()?.sum(1)?.sqrt()?.unsqueeze(1)?;
        let normalized = mean_pooled.div(&norm.expand(mean_pooled.shape())?)?;

        let vector = normalized.squeeze(0)?.to_vec1::<f32>()?;

        if vector.len() != self.settings.dimensions {
            return Err(EmbeddingError::DimensionMismatch(
                vector.len(),
                self.settings.dimensions,
            ));
        }

        debug!(
            text_len = text.len(),
            dimensions = vector.len(),
            "embedding generated"
        );

        self.cache.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    /// Cosine similarity between two embeddings, in [-1, 1]
    pub fn similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
        if a.len() != b.len() {
            return Err(EmbeddingError::DimensionMismatch(a.len(), b.len()));
        }

        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a < 0.001 || mag_b < 0.001 {
            return Err(EmbeddingError::ZeroMagnitude);
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        Ok(dot / (mag_a * mag_b))
    }

    /// All-pairs similarity matrix, rows × columns
    pub fn batch_similarity(
        rows: &[Vec<f32>],
        columns: &[Vec<f32>],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        rows.iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| Self::similarity(row, column))
                    .collect()
            })
            .collect()
    }
}
