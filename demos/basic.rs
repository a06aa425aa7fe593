use tf_idf_related::{RelatedConfig, RelatedEngine};

fn main() -> tf_idf_related::Result<()> {
    // ingest
    let mut engine = RelatedEngine::new();
    engine.add_document("/rust.html", "Rust", "ownership borrowing and fearless concurrency in rust");
    engine.add_document("/threads.html", "Threads", "concurrency with threads channels and locks");
    engine.add_document("/bread.html", "Bread", "flour water salt and yeast make bread");
    engine.add_document("/cake.html", "Cake", "flour sugar eggs and butter make a cake");

    // exact build, then a latent one
    let config = RelatedConfig::default().with_max_count(2);
    let posts = engine.build(&config)?;
    println!("Related: \n{}", posts);

    let lsi = engine.build(&config.clone().with_accuracy(0.5))?;
    println!("Related (lsi): \n{}", lsi);
    println!("{}", lsi.to_json_pretty()?);
    Ok(())
}
