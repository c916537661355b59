//! Interactive mood loop: describe, listen, rate, repeat.

use anyhow::Result;
use colored::Colorize;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    api::{ApiClient, FeedbackRequest, SearchRequest, SearchResult},
    output,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackChoice {
    Like,
    Dislike,
    Skip,
}

impl FeedbackChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "like" | "l" => Some(FeedbackChoice::Like),
            "2" | "dislike" | "d" => Some(FeedbackChoice::Dislike),
            "3" | "skip" | "s" | "" => Some(FeedbackChoice::Skip),
            _ => None,
        }
    }

    fn as_feedback(&self) -> Option<&'static str> {
        match self {
            FeedbackChoice::Like => Some("like"),
            FeedbackChoice::Dislike => Some("dislike"),
            FeedbackChoice::Skip => None,
        }
    }
}

/// `Ok(None)` for "no particular video", `Err(())` for out-of-range input.
fn parse_video_choice(input: &str, count: usize) -> Result<Option<usize>, ()> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(()),
    }
}

fn wants_to_continue(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn is_exit(input: &str) -> bool {
    matches!(input, "quit" | "exit" | "q" | "/quit" | "/exit")
}

pub struct MoodRepl {
    api: ApiClient,
    editor: DefaultEditor,
    genre: Option<String>,
    industry: Option<String>,
}

impl MoodRepl {
    pub fn new(api: ApiClient, genre: Option<String>, industry: Option<String>) -> Result<Self> {
        Ok(Self {
            api,
            editor: DefaultEditor::new()?,
            genre,
            industry,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        output::print_banner(self.api.base_url());

        if let Err(e) = self.api.health().await {
            output::warn(&format!("{e:#}"));
        }

        loop {
            let Some(mood) = self.prompt(&format!("{} ", "How are you feeling?".cyan()))? else {
                break;
            };
            let mood = mood.trim().to_string();
            if mood.is_empty() {
                continue;
            }
            if is_exit(&mood) {
                break;
            }
            let _ = self.editor.add_history_entry(&mood);

            match self.search(&mood).await {
                Ok(result) => {
                    output::print_results(&result);
                    if !result.videos.is_empty() && !self.collect_feedback(&result).await? {
                        break;
                    }
                }
                Err(e) => output::error(&format!("{e:#}")),
            }

            println!("{}", "=".repeat(60).cyan());
            match self.prompt("Would you like to search for more music? (y/n): ")? {
                Some(answer) if wants_to_continue(&answer) => println!(),
                _ => break,
            }
        }

        output::goodbye();
        Ok(())
    }

    async fn search(&self, mood: &str) -> Result<SearchResult> {
        tracing::debug!("Searching for mood '{}'", mood);
        self.api
            .search(&SearchRequest {
                mood_description: mood.to_string(),
                genre: self.genre.clone(),
                industry: self.industry.clone(),
            })
            .await
    }

    /// Returns `false` when the user ended input mid-way.
    async fn collect_feedback(&mut self, result: &SearchResult) -> Result<bool> {
        output::print_feedback_menu();

        let choice = loop {
            let Some(input) = self.prompt("Enter your choice (1-3): ")? else {
                return Ok(false);
            };
            match FeedbackChoice::parse(&input) {
                Some(choice) => break choice,
                None => output::warn("Invalid choice. Please enter 1, 2, or 3."),
            }
        };

        let Some(feedback) = choice.as_feedback() else {
            return Ok(true);
        };

        let count = result.videos.len();
        let video = loop {
            let question = format!("Which video? (1-{count}, Enter for the whole list): ");
            let Some(input) = self.prompt(&question)? else {
                return Ok(false);
            };
            match parse_video_choice(&input, count) {
                Ok(index) => break index.map(|i| &result.videos[i]),
                Err(()) => output::warn(&format!("Please enter a number from 1 to {count}.")),
            }
        };

        let request = FeedbackRequest {
            mood_description: result.mood_description.clone(),
            feedback: feedback.to_string(),
            query: result.query.clone(),
            video_id: video.map(|v| v.video_id.clone()),
            video_title: video.map(|v| v.title.clone()),
        };

        match self.api.send_feedback(&request).await {
            Ok(message) => output::success(&format!(
                "{message} I'll remember your preference."
            )),
            Err(e) => output::error(&format!("{e:#}")),
        }
        Ok(true)
    }

    /// `None` on Ctrl-C / Ctrl-D.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
