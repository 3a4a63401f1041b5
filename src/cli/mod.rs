use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Load, embed, and index the document corpus
    Ingest {
        /// Drop the existing index and rebuild it from scratch
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a question; the agent routes it to the right tool or to retrieval
    Ask {
        question: String,

        /// Opaque session identifier passed through to the answer
        #[arg(short, long)]
        session: Option<String>,
    },

    Stats,
}
