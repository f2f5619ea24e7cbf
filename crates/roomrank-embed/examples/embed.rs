use roomrank_core::traits::Embedder;
use roomrank_embed::get_default_embedder;

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder()?;
    let texts = vec!["double room with sea view".to_string(), "room with a desk".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("model={} B={} dim={}", embedder.name(), embs.len(), embedder.dim());
    Ok(())
}
