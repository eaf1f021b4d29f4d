pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::advisor::QuestionKind;

#[derive(Parser)]
#[command(name = "studypilot")]
#[command(about = "Coursework aggregation and study guidance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List applications available in the portal directory
    Apps,
    /// List assignments from a platform
    Assignments {
        /// Which platform to scrape
        #[arg(value_enum)]
        platform: PlatformArg,
    },
    /// List course materials from McGraw Hill
    Materials,
    /// Show video progress from Edpuzzle
    Progress,
    /// Analyze an assignment and print study guidance
    Guide {
        /// The assignment text or description
        description: String,
        /// Additional context about the course or subject
        #[arg(short, long, default_value = "")]
        context: String,
    },
    /// Get help understanding a question without the answer
    Question {
        /// The question text
        question: String,
        /// Type of question
        #[arg(short = 't', long, value_enum, default_value = "multiple-choice")]
        question_type: QuestionKind,
    },
    /// Generate study notes for a topic
    Notes {
        /// The topic to generate notes for
        topic: String,
        /// Specific points to include
        #[arg(short, long)]
        point: Vec<String>,
    },
    /// Check credential and service availability
    Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Edpuzzle,
    McgrawHill,
}
