//! Terminal rendering.

use colored::Colorize;

use crate::api::{SearchResult, VideoSummary};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_banner(server_url: &str) {
    println!();
    println!("{}", rule().bright_cyan());
    println!("{}", "  MoodTune - music for how you feel".bright_cyan().bold());
    println!("{}", rule().bright_cyan());
    println!("  {} {}", "Server:".dimmed(), server_url.dimmed());
    println!(
        "  {}",
        "Describe your mood in your own words. Type 'quit' to leave.".dimmed()
    );
    println!();
}

pub fn print_results(result: &SearchResult) {
    println!();
    println!("{} {}", "Mood:".bright_white().bold(), result.mood_label.bright_magenta());
    println!("{} {}", "Reading:".bright_white().bold(), result.interpretation);
    println!("{} {}", "Searching for:".yellow(), result.query.yellow());

    if result.videos.is_empty() {
        println!("{}", "No videos found. Try a different mood!".red());
        return;
    }

    println!();
    println!("{}", rule().green());
    println!(
        "{}",
        format!("Here are some {} music suggestions:", result.mood_description).green()
    );
    println!("{}", rule().green());
    println!();

    for (i, video) in result.videos.iter().enumerate() {
        println!("{}", video_line(i + 1, video));
        println!("   {} {}", "URL:".yellow(), video.url.yellow());
        println!();
    }
}

fn video_line(index: usize, video: &VideoSummary) -> String {
    if video.channel.is_empty() {
        format!("{}. {}", index.to_string().cyan(), video.title.bright_white())
    } else {
        format!(
            "{}. {} {}",
            index.to_string().cyan(),
            video.title.bright_white(),
            format!("({})", video.channel).dimmed()
        )
    }
}

pub fn print_feedback_menu() {
    println!("{}", "How do you like these suggestions?".cyan());
    println!("1. Like - I'll remember this preference");
    println!("2. Dislike - I'll adjust for next time");
    println!("3. Skip - No feedback");
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message.red());
}

pub fn goodbye() {
    println!("{}", "Thanks for using MoodTune! Goodbye!".yellow());
}
