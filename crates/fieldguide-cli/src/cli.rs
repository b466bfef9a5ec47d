use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fieldguide_lib::config::{
    DEFAULT_MAX_NEW_TOKENS, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TEMPERATURE,
};

#[derive(Parser, Debug)]
#[command(
    name = "fieldguide",
    about = "Identify species from photos and answer questions from a snippet folder"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Identify the species shown in an image with the remote classifier.
    Identify {
        /// Path to the image file, or `-` to read it from stdin.
        image: PathBuf,
    },

    /// Answer a question with the text generation model, grounded on context.
    Ask {
        /// The question to answer.
        question: String,
        /// Context text to ground the answer on.
        #[arg(long, required_unless_present = "snippets", conflicts_with = "snippets")]
        context: Option<String>,
        /// Folder of `.txt` snippets; the most relevant one becomes the context.
        #[arg(long)]
        snippets: Option<PathBuf>,
        /// Similarity below which keyword matching is tried.
        #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD, allow_negative_numbers = true)]
        threshold: f32,
        /// Maximum number of tokens to generate.
        #[arg(long, default_value_t = DEFAULT_MAX_NEW_TOKENS)]
        max_new_tokens: u32,
        /// Sampling temperature.
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f32,
    },

    /// Print the snippet most relevant to a query.
    Search {
        /// The search query.
        query: String,
        /// Folder of `.txt` snippets.
        #[arg(long)]
        snippets: PathBuf,
        /// Similarity below which keyword matching is tried.
        #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD, allow_negative_numbers = true)]
        threshold: f32,
        /// Also print the snippet name and similarity score.
        #[arg(long)]
        score: bool,
    },

    /// List the snippets found in a folder.
    Snippets {
        /// Folder of `.txt` snippets.
        dir: PathBuf,
    },

    /// Manage the embedding model.
    Model {
        #[command(subcommand)]
        model_command: ModelCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelCommand {
    /// Download the embedding model files from Hugging Face.
    Download {
        /// Force re-download even if files already exist.
        #[arg(long)]
        force: bool,
    },
}
