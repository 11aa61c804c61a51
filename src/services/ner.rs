use std::collections::HashMap;

use candle_core::{Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use hf_hub::{Cache, Repo, RepoType};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;
use tokenizers::Tokenizer;

use crate::core::{merge_token_tags, TokenTag};
use crate::models::EntityMatch;

/// Errors that can occur while loading or running the NER model
#[derive(Debug, Error)]
pub enum NerError {
    #[error("Model artifact '{file}' for '{model_id}' not found in the local Hugging Face cache")]
    MissingArtifact { model_id: String, file: String },

    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("Unsupported checkpoint: {0}")]
    UnsupportedCheckpoint(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference error: {0}")]
    Inference(#[from] candle_core::Error),
}

/// Seam for the entity extraction stage, so tests can substitute a fake.
pub trait EntityTagger {
    /// Return the entities found in `text`, in order of appearance. An empty
    /// vector is a valid result; errors carry a descriptive message.
    fn extract(&self, text: &str) -> Result<Vec<EntityMatch>, NerError>;
}

/// Label map sidecar read from the checkpoint's config.json, next to the
/// fields `BertConfig` itself deserializes.
#[derive(Deserialize)]
struct NerConfigJson {
    hidden_size: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// BERT token-classification model: the pretrained encoder plus the
/// fine-tuned classifier head from the same checkpoint.
pub struct BertNerModel {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    device: Device,
}

impl BertNerModel {
    /// Load a token-classification checkpoint by model id.
    ///
    /// Artifacts are resolved from the local Hugging Face cache only; this
    /// never fetches over the network. A missing artifact is reported as
    /// [`NerError::MissingArtifact`].
    pub fn load(model_id: &str, device: Device) -> Result<Self, NerError> {
        let repo = Cache::default().repo(Repo::new(model_id.to_string(), RepoType::Model));

        let missing = |file: &str| NerError::MissingArtifact {
            model_id: model_id.to_string(),
            file: file.to_string(),
        };

        let config_path = repo.get("config.json").ok_or_else(|| missing("config.json"))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .ok_or_else(|| missing("tokenizer.json"))?;
        let weights_path = repo
            .get("model.safetensors")
            .or_else(|| repo.get("pytorch_model.bin"))
            .ok_or_else(|| missing("model.safetensors"))?;

        let config_str = std::fs::read_to_string(&config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)?;
        let ner_config: NerConfigJson = serde_json::from_str(&config_str)?;

        if ner_config.id2label.is_empty() {
            return Err(NerError::UnsupportedCheckpoint(format!(
                "'{model_id}' has no id2label map; a token-classification checkpoint is required"
            )));
        }

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DTYPE, &device)?
        };

        // BertModel::load resolves both bare and "bert."-prefixed tensor
        // names; the classifier head sits at the checkpoint root.
        let model = BertModel::load(vb.clone(), &config)?;
        let classifier = candle_nn::linear(
            ner_config.hidden_size,
            ner_config.id2label.len(),
            vb.pp("classifier"),
        )?;

        Ok(Self {
            model,
            classifier,
            tokenizer,
            id2label: ner_config.id2label,
            device,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Tag every token of `text` and merge the BIO tags into entity spans.
    pub fn predict(&self, text: &str) -> Result<Vec<EntityMatch>, NerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| NerError::Tokenizer(e.to_string()))?;
        if encoding.get_ids().is_empty() {
            return Ok(Vec::new());
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let logits = self.classifier.forward(&hidden)?;
        let predictions = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;

        let offsets = encoding.get_offsets();
        let special = encoding.get_special_tokens_mask();

        let mut tags = Vec::with_capacity(predictions.len());
        for (i, prediction) in predictions.iter().enumerate() {
            if special.get(i).copied().unwrap_or(1) == 1 {
                continue;
            }
            let (start, end) = offsets[i];
            let tag = self
                .id2label
                .get(&prediction.to_string())
                .cloned()
                .unwrap_or_else(|| "O".to_string());
            tags.push(TokenTag { start, end, tag });
        }

        Ok(merge_token_tags(text, &tags))
    }
}

/// Entity extractor holding a lazily loaded model handle.
///
/// Construction is cheap; the checkpoint is loaded on first use and then
/// reused for the life of the process. A failed load is reported on every
/// call and retried on the next one.
pub struct EntityExtractor {
    model_id: String,
    device: Device,
    model: OnceCell<BertNerModel>,
}

impl EntityExtractor {
    pub fn new(model_id: String, device: Device) -> Self {
        Self {
            model_id,
            device,
            model: OnceCell::new(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn model(&self) -> Result<&BertNerModel, NerError> {
        self.model.get_or_try_init(|| {
            tracing::info!("Loading NER model '{}'", self.model_id);
            BertNerModel::load(&self.model_id, self.device.clone())
        })
    }
}

impl EntityTagger for EntityExtractor {
    fn extract(&self, text: &str) -> Result<Vec<EntityMatch>, NerError> {
        self.model()?.predict(text)
    }
}
