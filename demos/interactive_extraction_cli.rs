use std::io;
use std::io::Write;
use std::sync::Arc;

use clap::{App, Arg};
use frames_extractor::{
    tokenize, EmbeddingsEncoder, EmbeddingsMap, FramesExtractorModel, TextFramesExtractor,
};

fn main() {
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .init();

    let matches = App::new("frames-extractor")
        .about("Interactive CLI extracting intents and slots from sentences")
        .arg(
            Arg::with_name("MODEL_PATH")
                .required(true)
                .takes_value(true)
                .index(1)
                .help("path to the json frames extractor model"),
        )
        .arg(
            Arg::with_name("EMBEDDINGS_PATH")
                .required(true)
                .takes_value(true)
                .index(2)
                .help("path to the word embeddings, in word2vec text format"),
        )
        .arg(
            Arg::with_name("json")
                .short("j")
                .long("--json")
                .help("output the extracted frames as json"),
        )
        .get_matches();
    let model_path = matches.value_of("MODEL_PATH").unwrap();
    let embeddings_path = matches.value_of("EMBEDDINGS_PATH").unwrap();
    let json_output = matches.is_present("json");

    println!("\nLoading the frames extractor...");
    let model = FramesExtractorModel::from_path(model_path).unwrap();
    let embeddings = EmbeddingsMap::from_path(embeddings_path).unwrap();
    let encoder = EmbeddingsEncoder::new(Arc::new(embeddings));
    let extractor = TextFramesExtractor::new(Arc::new(model), Box::new(encoder)).unwrap();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut query = String::new();
        io::stdin().read_line(&mut query).unwrap();
        let query = query.trim();
        if query.is_empty() {
            break;
        }
        let tokens = tokenize(query);
        if tokens.is_empty() {
            continue;
        }
        match extractor.extract_frames(&tokens) {
            Ok(frame) if json_output => {
                println!("{}", serde_json::to_string_pretty(&frame).unwrap())
            }
            Ok(frame) => println!("{}", frame.render(&tokens)),
            Err(error) => eprintln!("Error: {}", error),
        }
    }
}
