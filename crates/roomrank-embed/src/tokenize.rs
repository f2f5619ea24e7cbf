use anyhow::{anyhow, ensure, Result};
use candle_core::{Device, Tensor};
use tokenizers::{Tokenizer, TruncationParams};

/// Let the tokenizer truncate to `max_len` tokens. Its post-processor then
/// reserves room for the special tokens, so `[CLS]` and `[SEP]` survive.
pub fn configure_truncation(tokenizer: &mut Tokenizer, max_len: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Failed to set truncation to {max_len}: {}", e))?;
    Ok(())
}

/// Encode a batch into `[B, T]` id and mask tensors.
///
/// Truncation is left to the tokenizer (see [`configure_truncation`]); the
/// batch is right-padded with `pad_id` to its longest member, so short
/// captions do not pay for a full window.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], pad_id: u32, device: &Device) -> Result<(Tensor, Tensor)> {
    ensure!(!texts.is_empty(), "cannot tokenize an empty batch");
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let width = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0).max(1);

    let mut ids = Vec::with_capacity(texts.len() * width);
    let mut mask = Vec::with_capacity(texts.len() * width);
    for enc in &encodings {
        let len = enc.get_ids().len();
        ids.extend_from_slice(enc.get_ids());
        mask.extend_from_slice(enc.get_attention_mask());
        ids.extend(std::iter::repeat(pad_id).take(width - len));
        mask.extend(std::iter::repeat(0u32).take(width - len));
    }
    let input_ids = Tensor::from_vec(ids, (texts.len(), width), device)?;
    let attention_mask = Tensor::from_vec(mask, (texts.len(), width), device)?;
    Ok((input_ids, attention_mask))
}
