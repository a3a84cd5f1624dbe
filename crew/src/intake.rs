//! Interactive campaign intake
//!
//! Asks for each request field in turn. Required fields and unparseable
//! channel/tone answers are asked again; an empty answer to an optional
//! question takes its default.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{CampaignChannel, CampaignRequest, CopyTone, ValidationError};

/// Channel used when the channel question is left blank
pub const DEFAULT_CHANNEL: CampaignChannel = CampaignChannel::SocialMedia;

/// Blank means the default channel; anything else must parse strictly
pub fn parse_channels_answer(answer: &str) -> Result<Vec<CampaignChannel>, ValidationError> {
    if answer.trim().is_empty() {
        return Ok(vec![DEFAULT_CHANNEL]);
    }
    CampaignChannel::parse_list(answer)
}

/// Blank means the default tone
pub fn parse_tone_answer(answer: &str) -> Result<CopyTone, ValidationError> {
    if answer.trim().is_empty() {
        return Ok(CopyTone::default());
    }
    answer.parse()
}

fn optional(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Gather a request by asking questions through `ask`
///
/// Returns `Ok(None)` when the user cancels with Ctrl-C or Ctrl-D.
pub fn gather_request_with<F>(mut ask: F) -> Result<Option<CampaignRequest>, ReadlineError>
where
    F: FnMut(&str) -> Result<String, ReadlineError>,
{
    debug!("gather_request_with: called");
    let mut ask = |prompt: &str| match ask(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e),
    };

    macro_rules! answer {
        ($prompt:expr) => {
            match ask($prompt)? {
                Some(line) => line,
                None => return Ok(None),
            }
        };
    }

    let product_name = loop {
        let line = answer!("Product / brand name: ");
        if !line.trim().is_empty() {
            break line.trim().to_string();
        }
        println!("{}", "Product name is required.".yellow());
    };
    let product_description = answer!("Describe the product (1-2 sentences): ").trim().to_string();
    let target_audience = answer!("Target audience: ").trim().to_string();
    let campaign_goals = answer!("Campaign goals / KPIs: ").trim().to_string();
    let budget_range = optional(answer!("Budget range (optional): "));

    println!("{} {}", "Available channels:".dimmed(), CampaignChannel::valid_list());
    let channels = loop {
        match parse_channels_answer(&answer!("Channels, comma-separated [social_media]: ")) {
            Ok(channels) => break channels,
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    };

    println!("{} {}", "Available tones:".dimmed(), CopyTone::valid_list());
    let brand_voice = loop {
        match parse_tone_answer(&answer!("Brand voice / tone [professional]: ")) {
            Ok(tone) => break tone,
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    };

    let additional_context = optional(answer!("Additional context (optional, Enter to skip): "));

    Ok(Some(CampaignRequest {
        product_name,
        product_description,
        target_audience,
        campaign_goals,
        budget_range,
        channels,
        brand_voice,
        additional_context,
    }))
}

/// Gather a request from the terminal with line editing
pub fn gather_request() -> Result<Option<CampaignRequest>, ReadlineError> {
    debug!("gather_request: called");
    let mut rl = DefaultEditor::new()?;
    println!();
    println!("{}", "Campaign Setup".bright_cyan().bold());
    println!("Answer the following questions to brief the crew.");
    println!();
    gather_request_with(|prompt| rl.readline(&format!("{} {}", ">".bright_green(), prompt)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn scripted(answers: &[&str]) -> impl FnMut(&str) -> Result<String, ReadlineError> {
        let mut queue: VecDeque<String> = answers.iter().map(|s| s.to_string()).collect();
        move |_prompt| queue.pop_front().ok_or(ReadlineError::Eof)
    }

    #[test]
    fn test_defaults_for_blank_answers() {
        let request = gather_request_with(scripted(&["Lumen Lamp", "A lamp", "Readers", "Sell lamps", "", "", "", ""]))
            .unwrap()
            .unwrap();

        assert_eq!(request.product_name, "Lumen Lamp");
        assert_eq!(request.budget_range, None);
        assert_eq!(request.channels, vec![CampaignChannel::SocialMedia]);
        assert_eq!(request.brand_voice, CopyTone::Professional);
        assert_eq!(request.additional_context, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_reprompts_on_invalid_answers() {
        let request = gather_request_with(scripted(&[
            "   ",
            "Lumen Lamp",
            "A lamp",
            "Readers",
            "Sell lamps",
            "$5k",
            "email, carrier_pigeon",
            "Email, video",
            "sarcastic",
            "Playful",
            "Holiday launch",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(request.product_name, "Lumen Lamp");
        assert_eq!(request.budget_range.as_deref(), Some("$5k"));
        assert_eq!(request.channels, vec![CampaignChannel::Email, CampaignChannel::Video]);
        assert_eq!(request.brand_voice, CopyTone::Playful);
        assert_eq!(request.additional_context.as_deref(), Some("Holiday launch"));
    }

    #[test]
    fn test_cancel_returns_none() {
        let result = gather_request_with(scripted(&["Lumen Lamp", "A lamp"])).unwrap();
        assert!(result.is_none());

        let result = gather_request_with(|_| Err(ReadlineError::Interrupted)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_answers() {
        assert_eq!(parse_channels_answer("").unwrap(), vec![DEFAULT_CHANNEL]);
        assert!(parse_channels_answer("fax").is_err());
        assert_eq!(parse_tone_answer(" ").unwrap(), CopyTone::Professional);
        assert_eq!(parse_tone_answer("LUXURY").unwrap(), CopyTone::Luxury);
    }
}
