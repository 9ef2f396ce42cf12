use phrase_gen_core::model::chain::ChainOptions;
use phrase_gen_core::model::generator::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows how the chain was built
    env_logger::init();

    // Load all corpora from the "data" directory (.dat files, one phrase per line)
    // Only word pairs that opened a phrase are used as starting points
    let app = Generator::new("./data", &ChainOptions::default())?;
    println!("Loaded models: {}", app.model_names().join(", "));
    println!("Word pairs learned: {}", app.chain().len());

    // Create a prediction input with default values
    let mut input = app.make_prediction_input();

    // Number of retries if the generated phrase is already in the corpus
    input.nb_try = 100;

    // Maximum number of tokens of a phrase, longer walks are cut
    input.set_max_tokens(40)?;

    // Test invalid token caps
    match input.set_max_tokens(1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Generate 10 phrases using the input settings
    for i in 0..10 {
        println!("Generated phrase {}: {}", i + 1, app.predict(&input)?);
    }

    // Same seed, same phrase
    input.seed = Some(42);
    let first = app.predict(&input)?;
    let second = app.predict(&input)?;
    println!("Seeded phrase: {} (reproducible: {})", first, first == second);

    Ok(())
}
