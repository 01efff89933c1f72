use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::corpus::{CORPUS_EXTENSION, list_corpora, load_corpora};
use rs_markov_core::{Chain, Error, GenerationConfig, Generator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Every ".txt" file of the "data" directory is a corpus, one source per line
    let names = list_corpora("./data", CORPUS_EXTENSION)?;
    let sources = load_corpora("./data", &names)?;
    println!("Loaded {} lines from {:?}", sources.len(), names);

    // Train a trigram chain: 2 words of context predict the next one
    let chain = Chain::train(&sources, 3)?;
    println!("Chain: {} prefixes, {} transitions", chain.len(), chain.transitions());

    // A gram size of 2 or less is rejected
    match Chain::train(&sources, 2) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // The default generator uses the thread-local random source
    let mut generator = Generator::new(&chain);
    println!("Starting rule: {:?}", generator.start_rule());

    // An empty data directory gives an empty chain, reported as such
    match generator.sentence(25) {
        Ok(sentence) => println!("Sentence: {sentence}"),
        Err(Error::EmptyChain) => {
            println!("Nothing to generate from, add some .txt files to ./data");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    // Paragraph of [2, 2 + 4 - 1] sentences
    println!("Paragraph: {}", generator.paragraph(2, 4)?);

    // Inverted bounds are rejected before anything is generated
    match generator.paragraph(5, 1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // A seeded generator is reproducible
    let config = GenerationConfig {
        min_paragraphs: 2,
        max_paragraphs: 2,
        max_length: 15,
        separator: "\n---\n".to_owned(),
        ..Default::default()
    };
    let first = Generator::with_rng(&chain, StdRng::seed_from_u64(42)).generate(&config)?;
    let second = Generator::with_rng(&chain, StdRng::seed_from_u64(42)).generate(&config)?;
    assert_eq!(first, second);
    println!("{first}");

    Ok(())
}
