//! Study guidance oracle.
//!
//! A thin boundary around an OpenAI-style chat-completions endpoint.
//! The oracle consumes free text (assignment descriptions scraped by
//! the platform layer) and returns a mapping of named sections. It is
//! deliberately failure-proof: when the endpoint is unconfigured,
//! unreachable, or returns something unusable, callers get a static
//! fallback structure tagged `AI_UNAVAILABLE` instead of an error.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::{Result, StudyPilotError};

/// A mapping of named guidance sections.
pub type Guidance = serde_json::Map<String, Value>;

/// Configuration for the guidance oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Chat-completions endpoint
    pub endpoint: String,

    /// Model name (default: gpt-3.5-turbo)
    pub model: String,

    /// Sampling temperature (default: 0.7)
    pub temperature: f32,

    /// Response token budget (default: 1500)
    pub max_tokens: u32,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            timeout_secs: 30,
        }
    }
}

/// Question categories the oracle tailors its breakdown to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QuestionKind {
    MultipleChoice,
    Essay,
    Math,
    TrueFalse,
    ShortAnswer,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Essay => "essay",
            QuestionKind::Math => "math",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::ShortAnswer => "short_answer",
        };
        f.write_str(label)
    }
}

pub struct Advisor {
    client: Client,
    config: AdvisorConfig,
    api_key: Option<String>,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("studypilot/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, study guidance will use fallbacks");
        }

        Self {
            client,
            config,
            api_key,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Analyze an assignment and return structured study guidance.
    pub async fn analyze_assignment(&self, description: &str, context: &str) -> Guidance {
        let prompt = format!(
            "You are an educational assistant that helps students understand assignments \
             without doing the work for them. Analyze this assignment and provide helpful guidance.\n\n\
             ASSIGNMENT: {description}\n\
             CONTEXT: {context}\n\n\
             Provide a structured analysis with these sections:\n\
             1. KEY_CONCEPTS: main concepts and topics this assignment covers\n\
             2. LEARNING_OBJECTIVES: what the student should learn from it\n\
             3. STEP_BY_STEP_APPROACH: a suggested approach to complete it\n\
             4. COMMON_MISTAKES: common errors with this type of assignment\n\
             5. RESOURCES: recommended learning resources\n\
             6. TIME_ESTIMATE: estimated time needed\n\
             7. DIFFICULTY_LEVEL: Easy/Medium/Hard with explanation\n\n\
             Return your response as valid JSON with these exact keys."
        );

        self.guided(
            "You are an experienced educator and tutor. Provide helpful, structured \
             guidance without completing the assignment for the student.",
            &prompt,
            self.config.temperature,
            self.config.max_tokens,
            "analysis",
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!("assignment analysis failed: {e}");
            fallback_analysis()
        })
    }

    /// Explain a question without revealing its answer.
    pub async fn question_help(&self, question: &str, kind: QuestionKind) -> Guidance {
        let prompt = format!(
            "You are a tutor helping a student understand a {kind} question without \
             giving away the answer.\n\n\
             QUESTION: {question}\n\
             QUESTION_TYPE: {kind}\n\n\
             Provide guidance with these sections:\n\
             1. QUESTION_BREAKDOWN: what the question asks, in simpler terms\n\
             2. KEY_CONCEPTS: concepts needed to answer it\n\
             3. THINKING_PROCESS: step-by-step approach for this type of question\n\
             4. RELATED_EXAMPLES: similar examples or practice problems\n\
             5. CHECKING_WORK: how to verify the answer is correct\n\
             6. LEARNING_TIPS: strategies for mastering this type of question\n\n\
             Return your response as valid JSON with these exact keys. \
             Do not provide the direct answer to the question."
        );

        self.guided(
            "You are a patient tutor who explains concepts clearly without giving \
             away answers. Encourage learning and understanding.",
            &prompt,
            self.config.temperature,
            1200,
            "explanation",
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!("question help failed: {e}");
            fallback_question_help(question)
        })
    }

    /// Generate organized study notes for a topic.
    pub async fn study_notes(&self, topic: &str, key_points: &[String]) -> Guidance {
        let key_points_text = if key_points.is_empty() {
            "Cover the most important aspects.".to_string()
        } else {
            key_points.join("\n")
        };

        let prompt = format!(
            "Create comprehensive study notes for the following topic:\n\n\
             TOPIC: {topic}\n\
             KEY_POINTS_TO_COVER: {key_points_text}\n\n\
             Organize the notes with these sections:\n\
             1. OVERVIEW: brief introduction to the topic\n\
             2. KEY_DEFINITIONS: important terms and definitions\n\
             3. MAIN_CONCEPTS: core concepts explained clearly\n\
             4. EXAMPLES: relevant examples and applications\n\
             5. FORMULAS_EQUATIONS: important formulas, if applicable\n\
             6. STUDY_TIPS: effective ways to study this topic\n\
             7. PRACTICE_SUGGESTIONS: ideas for practice and application\n\n\
             Return as valid JSON with these exact keys."
        );

        // Lower temperature keeps study materials consistent.
        self.guided(
            "You are an expert educator who creates clear, organized, and effective \
             study materials.",
            &prompt,
            0.5,
            2000,
            "study_notes",
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!("study note generation failed: {e}");
            fallback_notes(topic)
        })
    }

    /// One round trip: complete, then parse the reply as a JSON map,
    /// wrapping free text under `text_key` when it is not.
    async fn guided(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        text_key: &str,
    ) -> Result<Guidance> {
        let reply = self.complete(system, prompt, temperature, max_tokens).await?;
        match serde_json::from_str::<Value>(&reply) {
            Ok(Value::Object(map)) => Ok(map),
            _ => {
                tracing::warn!("oracle reply was not a JSON object, returning as text");
                let mut map = Guidance::new();
                map.insert(text_key.to_string(), Value::String(reply));
                Ok(map)
            }
        }
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StudyPilotError::Advisor("no API key configured".into()))?;

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let reply: Value = response.json().await?;
        reply["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| StudyPilotError::Advisor("malformed completion response".into()))
    }
}

fn fallback_analysis() -> Guidance {
    as_map(json!({
        "KEY_CONCEPTS": ["Review the assignment instructions carefully"],
        "LEARNING_OBJECTIVES": "Understand and complete the assignment requirements",
        "STEP_BY_STEP_APPROACH": [
            "1. Read the assignment carefully",
            "2. Identify key requirements",
            "3. Research necessary information",
            "4. Create an outline",
            "5. Complete each section",
            "6. Review and revise",
        ],
        "COMMON_MISTAKES": ["Not following instructions", "Poor time management"],
        "RESOURCES": ["Course textbook", "Class notes", "Online educational resources"],
        "TIME_ESTIMATE": "Varies based on assignment complexity",
        "DIFFICULTY_LEVEL": "Review assignment to determine difficulty",
        "AI_UNAVAILABLE": true,
    }))
}

fn fallback_question_help(question: &str) -> Guidance {
    as_map(json!({
        "QUESTION_BREAKDOWN": format!("Read the question carefully: {question}"),
        "KEY_CONCEPTS": ["Review related course materials"],
        "THINKING_PROCESS": [
            "Understand what the question is asking",
            "Recall relevant information",
            "Apply appropriate methods",
            "Verify your approach",
        ],
        "RELATED_EXAMPLES": "Check your textbook or notes for similar examples",
        "CHECKING_WORK": "Review each step of your solution",
        "LEARNING_TIPS": ["Practice similar problems", "Study key concepts"],
        "AI_UNAVAILABLE": true,
    }))
}

fn fallback_notes(topic: &str) -> Guidance {
    as_map(json!({
        "OVERVIEW": format!("Study notes for {topic} require the guidance service."),
        "STUDY_TIPS": ["Review class materials on this topic", "Summarize in your own words"],
        "AI_UNAVAILABLE": true,
    }))
}

fn as_map(value: Value) -> Guidance {
    match value {
        Value::Object(map) => map,
        _ => Guidance::new(),
    }
}
