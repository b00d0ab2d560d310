//! Prompt templates for remote fact generation.
//!
//! Each known category has several alternative phrasings; one is chosen at
//! random per attempt so retries do not resend identical wording. Categories
//! without phrasings get a generic template.

use rand::seq::SliceRandom;
use rand::Rng;

/// System instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a creative fact generator. \
Always provide fresh, unique, accurate and interesting facts. \
Never repeat the same information. Be engaging and educational. \
Answer with exactly one sentence.";

/// Appended to every user prompt.
pub const UNIQUENESS_SUFFIX: &str =
    "Make it unique and different from common knowledge. Respond in exactly one sentence.";

const HACKING: &[&str] = &[
    "Generate one fascinating, lesser-known cybersecurity or hacking fact that most people don't know.",
    "Share an interesting fact about cyber attacks, data breaches, or hacking techniques.",
    "Tell me a surprising fact about cybersecurity, hackers, or digital security that's educational.",
    "Give me a unique fact about the world of hacking, cyber crime, or information security.",
    "Share an amazing fact about famous hackers, security vulnerabilities, or cyber warfare.",
];

const FUN: &[&str] = &[
    "Generate one mind-blowing, surprising fun fact that will amaze people.",
    "Share a fascinating and unusual fact about nature, science, or the world around us.",
    "Tell me an incredible fact that sounds unbelievable but is actually true.",
    "Give me a weird and wonderful fact about animals, space, history, or science.",
    "Share an amazing fact that most people have never heard before.",
];

const ATTITUDE: &[&str] = &[
    "Share an inspiring quote about mindset, success, and positive thinking.",
    "Give me a motivational fact about attitude, personal growth, or achieving goals.",
    "Share wisdom about developing a winning mindset and strong character.",
    "Tell me an empowering fact about confidence, determination, or self-improvement.",
    "Give me an inspiring insight about attitude, resilience, or mental strength.",
];

const LAZY: &[&str] = &[
    "Share a funny, relatable quote or fact about procrastination and laziness.",
    "Give me a humorous fact about being lazy, avoiding work, or procrastinating.",
    "Tell me a witty observation about laziness, comfort zones, or taking it easy.",
    "Share a clever joke or fact about the art of doing nothing productively.",
    "Give me a funny insight about lazy people, rest, or avoiding effort.",
];

const MOTIVATION: &[&str] = &[
    "Generate an inspiring motivational quote or fact.",
    "Share a powerful quote about perseverance and never giving up.",
    "Tell me an encouraging fact about how small daily habits lead to big results.",
    "Give me an uplifting insight about starting something new despite fear.",
    "Share a motivational thought about discipline, focus, and finishing what you start.",
];

/// Alternative phrasings registered for a category.
pub fn phrasings(category: &str) -> Option<&'static [&'static str]> {
    match category.trim().to_ascii_lowercase().as_str() {
        "hacking" => Some(HACKING),
        "fun" => Some(FUN),
        "attitude" => Some(ATTITUDE),
        "lazy" => Some(LAZY),
        "motivation" => Some(MOTIVATION),
        _ => None,
    }
}

/// Template used for categories without registered phrasings.
pub fn generic_prompt(category: &str) -> String {
    format!("Generate one interesting {} fact.", category.trim())
}

/// Build the user prompt for one attempt.
pub fn user_prompt<R: Rng + ?Sized>(category: &str, rng: &mut R) -> String {
    let base = phrasings(category)
        .and_then(|p| p.choose(rng))
        .map(|s| s.to_string())
        .unwrap_or_else(|| generic_prompt(category));
    format!("{base} {UNIQUENESS_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_known_categories_have_phrasings() {
        for info in crate::category::CATEGORIES.iter() {
            let p = phrasings(info.key).unwrap();
            assert!(!p.is_empty(), "{} has no phrasings", info.key);
        }
    }

    #[test]
    fn test_generic_template_for_unknown_category() {
        let mut rng = StdRng::seed_from_u64(1);
        let prompt = user_prompt("space", &mut rng);
        assert!(prompt.starts_with("Generate one interesting space fact."));
        assert!(prompt.ends_with(UNIQUENESS_SUFFIX));
    }

    #[test]
    fn test_prompt_drawn_from_category_phrasings() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let prompt = user_prompt("lazy", &mut rng);
            assert!(LAZY.iter().any(|p| prompt.starts_with(p)));
        }
    }

    #[test]
    fn test_phrasing_varies_across_attempts() {
        let mut rng = StdRng::seed_from_u64(42);
        let prompts: std::collections::HashSet<_> =
            (0..50).map(|_| user_prompt("fun", &mut rng)).collect();
        assert!(prompts.len() > 1);
    }
}
