use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL", global = true)]
    pub start: Option<String>,

    /// Eliminate left recursion before using the grammar
    #[arg(short = 'l', long, global = true)]
    pub anti_left_recurse: bool,

    /// Log more (repeat for more detail, RUST_LOG also works)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the grammar
    Show {
        /// Highlight nonterminal references
        #[arg(long)]
        color: bool
    },

    /// Parse text and print its syntax tree
    Parse {
        /// Text to parse (default: every line of stdin)
        input: Option<String>,

        /// Take the longest token instead of the first one that fits
        #[arg(long)]
        longest_match: bool,

        /// Deepest nonterminal nesting before giving up (default: unlimited)
        #[arg(long, value_name = "DEPTH")]
        max_depth: Option<usize>
    },

    /// Print the grammar with left recursion eliminated
    Transform,

    /// Generate random sentences
    Generate {
        /// Amount to generate
        #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 1)]
        amount: u32,

        /// Nesting after which only nonterminal-free productions are picked
        #[arg(long, value_name = "DEPTH", default_value_t = 8)]
        depth: usize
    }
}
