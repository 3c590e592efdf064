//! Encode command implementation.

use super::TrainingArgs;
use clap::Parser;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Text to encode ("-" reads stdin)
    #[arg(short, long)]
    pub text: String,

    /// Wrap the output in the sequence-start and sequence-end tokens
    #[arg(short, long, default_value_t = false)]
    pub special_tokens: bool,
}

use anyhow::Result as AnyhowResult;

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    let corpus = cmd.training.load_corpus()?;
    let artifacts = cmd.training.trainer()?.train_corpus(&corpus)?;
    let encoder = artifacts.encoder();

    // Read input text (from stdin if "-")
    let input_text = if cmd.text == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.text
    };

    let ids = if cmd.special_tokens {
        encoder.encode_with_specials(&input_text)?
    } else {
        encoder.encode(&input_text)?
    };

    let ids_str: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    println!("{}", ids_str.join(" "));

    Ok(())
}
